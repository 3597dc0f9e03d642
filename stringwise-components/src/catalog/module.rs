use serde::Serialize;
use stringwise_core::constraint::StrictlyPositive;
use uom::si::{
    electric_current::ampere,
    electric_potential::volt,
    f64::{ElectricCurrent, ElectricPotential, Power},
    power::watt,
};

use super::{
    Alias, CatalogError, CatalogRecord, FieldSpec, Positive, RecordKind, Resolved,
    ResolutionPolicy, TemperatureCoefficient,
    field::FieldResolver,
};

const VOC_ALIASES: &[Alias] = &[
    Alias::new("voc_v"),
    Alias::new("voc"),
    Alias::new("open_circuit_voltage"),
];
const VMP_ALIASES: &[Alias] = &[
    Alias::new("vmp_v"),
    Alias::new("vmp"),
    Alias::new("max_power_voltage"),
];
const ISC_ALIASES: &[Alias] = &[
    Alias::new("isc_a"),
    Alias::new("isc"),
    Alias::new("short_circuit_current"),
];
const IMP_ALIASES: &[Alias] = &[
    Alias::new("imp_a"),
    Alias::new("imp"),
    Alias::new("max_power_current"),
];
const POWER_ALIASES: &[Alias] = &[
    Alias::new("pmax_w"),
    Alias::new("power"),
    Alias::new("max_power"),
];
const COEFF_VOC_ALIASES: &[Alias] = &[
    Alias::new("temp_coeff_voc_percent_c"),
    Alias::new("temperature_coefficient_voc"),
];
const COEFF_PMAX_ALIASES: &[Alias] = &[
    Alias::new("temp_coeff_pmax_percent_c"),
    Alias::new("temperature_coefficient_pmax"),
];
const COEFF_VMP_ALIASES: &[Alias] = &[
    Alias::new("temp_coeff_vmp_percent_c"),
    Alias::new("temperature_coefficient_vmp"),
];
const COEFF_ISC_ALIASES: &[Alias] = &[
    Alias::new("temp_coeff_isc_percent_c"),
    Alias::new("temperature_coefficient_isc"),
];

const VOC: FieldSpec = FieldSpec::positive("open_circuit_voltage", VOC_ALIASES).or_default(45.0);
const VMP: FieldSpec = FieldSpec::positive("max_power_voltage", VMP_ALIASES).or_default(37.0);
const ISC: FieldSpec = FieldSpec::positive("short_circuit_current", ISC_ALIASES).or_default(11.0);
const IMP: FieldSpec = FieldSpec::positive("max_power_current", IMP_ALIASES).or_default(10.0);
const POWER: FieldSpec = FieldSpec::positive("rated_power", POWER_ALIASES).or_default(400.0);
const COEFF_VOC: FieldSpec =
    FieldSpec::signed("temp_coefficient_voc", COEFF_VOC_ALIASES).or_default(-0.25);
const COEFF_PMAX: FieldSpec =
    FieldSpec::signed("temp_coefficient_pmax", COEFF_PMAX_ALIASES).or_default(-0.35);
const COEFF_VMP: FieldSpec = FieldSpec::signed("temp_coefficient_vmp", COEFF_VMP_ALIASES);
const COEFF_ISC: FieldSpec = FieldSpec::signed("temp_coefficient_isc", COEFF_ISC_ALIASES);

/// Electrical datasheet values of one PV module at standard test conditions.
///
/// Derived fresh from a [`CatalogRecord`] for every sizing request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModuleElectricalParameters {
    pub open_circuit_voltage: Positive<ElectricPotential>,
    pub max_power_voltage: Positive<ElectricPotential>,
    pub short_circuit_current: Positive<ElectricCurrent>,
    pub max_power_current: Positive<ElectricCurrent>,
    pub rated_power: Positive<Power>,
    pub temp_coefficient_voc: TemperatureCoefficient,
    pub temp_coefficient_pmax: TemperatureCoefficient,
    /// Dedicated Vmp coefficient, when the catalog publishes one.
    pub temp_coefficient_vmp: Option<TemperatureCoefficient>,
    /// Isc coefficient, when the catalog publishes one.
    pub temp_coefficient_isc: Option<TemperatureCoefficient>,
}

impl ModuleElectricalParameters {
    /// Resolves module parameters from a raw catalog record.
    ///
    /// Under [`ResolutionPolicy::Lenient`] this only fails on malformed
    /// values; missing fields take typical crystalline-silicon defaults
    /// (Voc 45 V, Vmp 37 V, Isc 11 A, Imp 10 A, 400 W, −0.25 %/°C Voc,
    /// −0.35 %/°C Pmax) and are listed in the returned provenance.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a field is non-numeric, a positive
    /// quantity is negative, or a field is missing under
    /// [`ResolutionPolicy::Strict`].
    ///
    /// # Example
    ///
    /// ```
    /// use stringwise_components::{CatalogRecord, ModuleElectricalParameters, ResolutionPolicy};
    /// use uom::si::electric_potential::volt;
    ///
    /// let record = CatalogRecord::new().with("voc_v", 49.5).with("vmp", 41.3);
    /// let resolved = ModuleElectricalParameters::resolve(&record, ResolutionPolicy::Lenient)?;
    ///
    /// assert_eq!(resolved.parameters.open_circuit_voltage.get().get::<volt>(), 49.5);
    /// assert_eq!(resolved.data_quality_issues().len(), 5);
    /// # Ok::<(), stringwise_components::CatalogError>(())
    /// ```
    pub fn resolve(
        record: &CatalogRecord,
        policy: ResolutionPolicy,
    ) -> Result<Resolved<Self>, CatalogError> {
        let mut fields = FieldResolver::new(record, RecordKind::Module, policy);

        let voc = fields.required(&VOC)?;
        let vmp = fields.required(&VMP)?;
        let isc = fields.required(&ISC)?;
        let imp = fields.required(&IMP)?;
        let power = fields.required(&POWER)?;
        let coeff_voc = fields.required(&COEFF_VOC)?;
        let coeff_pmax = fields.required(&COEFF_PMAX)?;
        let coeff_vmp = fields.optional(&COEFF_VMP)?;
        let coeff_isc = fields.optional(&COEFF_ISC)?;

        let parameters = Self {
            open_circuit_voltage: positive(ElectricPotential::new::<volt>(voc)),
            max_power_voltage: positive(ElectricPotential::new::<volt>(vmp)),
            short_circuit_current: positive(ElectricCurrent::new::<ampere>(isc)),
            max_power_current: positive(ElectricCurrent::new::<ampere>(imp)),
            rated_power: positive(Power::new::<watt>(power)),
            temp_coefficient_voc: TemperatureCoefficient::percent_per_kelvin(coeff_voc),
            temp_coefficient_pmax: TemperatureCoefficient::percent_per_kelvin(coeff_pmax),
            temp_coefficient_vmp: coeff_vmp.map(TemperatureCoefficient::percent_per_kelvin),
            temp_coefficient_isc: coeff_isc.map(TemperatureCoefficient::percent_per_kelvin),
        };

        Ok(Resolved {
            parameters,
            record: RecordKind::Module,
            fields: fields.finish(),
        })
    }
}

/// Wraps a value the resolver has already checked to be finite and above zero.
pub(super) fn positive<Q>(quantity: Q) -> Positive<Q>
where
    Q: PartialOrd + num_traits::Zero + std::fmt::Debug,
{
    StrictlyPositive::new(quantity).expect("resolver only yields finite values above zero")
}
