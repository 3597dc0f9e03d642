use std::num::NonZeroU32;

use serde::Serialize;
use uom::si::{
    electric_current::ampere,
    electric_potential::volt,
    f64::{ElectricCurrent, ElectricPotential, Power},
    power::kilowatt,
};

use super::{
    Alias, CatalogError, CatalogRecord, FieldSpec, Positive, RecordKind, Resolved,
    ResolutionPolicy, field::FieldResolver, module::positive,
};

/// Absolute DC voltage ceiling assumed when the catalog does not state one.
pub const DEFAULT_MAX_DC_VOLTAGE_V: f64 = 1000.0;

const MPPT_MIN_ALIASES: &[Alias] = &[
    Alias::new("min_mpp_voltage_v"),
    Alias::new("mppt_min_voltage"),
    Alias::new("min_mppt_voltage"),
];
const MPPT_MAX_ALIASES: &[Alias] = &[
    Alias::new("max_mpp_voltage_v"),
    Alias::new("max_dc_voltage_v"),
    Alias::new("mppt_max_voltage"),
];
const MAX_DC_ALIASES: &[Alias] = &[
    Alias::new("max_dc_voltage_v"),
    Alias::new("max_input_voltage_v"),
    Alias::new("max_dc_voltage"),
];
const STRING_INPUT_ALIASES: &[Alias] = &[
    Alias::new("total_string_inputs"),
    Alias::new("total_strings"),
    Alias::new("max_string_inputs"),
];
const MPPT_ALIASES: &[Alias] = &[
    Alias::new("total_mppt"),
    Alias::new("mppt_inputs"),
    Alias::new("number_of_mppt_inputs"),
];
const AC_POWER_ALIASES: &[Alias] = &[
    Alias::new("nominal_ac_power_kw"),
    Alias::scaled("ac_power_rating_w", 1e-3),
    Alias::scaled("power_rating", 1e-3),
];
const MPPT_CURRENT_ALIASES: &[Alias] = &[
    Alias::new("max_input_current_per_mppt_a"),
    Alias::new("max_mppt_current_a"),
    Alias::new("max_dc_current_per_mppt"),
];

const MPPT_MIN: FieldSpec = FieldSpec::positive("mppt_voltage_min", MPPT_MIN_ALIASES).or_default(125.0);
const MPPT_MAX: FieldSpec = FieldSpec::positive("mppt_voltage_max", MPPT_MAX_ALIASES).or_default(850.0);
const MAX_DC: FieldSpec =
    FieldSpec::positive("max_dc_voltage", MAX_DC_ALIASES).or_default(DEFAULT_MAX_DC_VOLTAGE_V);
const STRING_INPUTS: FieldSpec =
    FieldSpec::positive("total_string_inputs", STRING_INPUT_ALIASES).or_default(20.0);
const MPPT_CHANNELS: FieldSpec =
    FieldSpec::positive("total_mppt_channels", MPPT_ALIASES).or_default(2.0);
const AC_POWER: FieldSpec = FieldSpec::positive("nominal_ac_power", AC_POWER_ALIASES);
const MPPT_CURRENT: FieldSpec = FieldSpec::positive("max_current_per_mppt", MPPT_CURRENT_ALIASES);

/// Input limits of one inverter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InverterElectricalParameters {
    /// Lower edge of the MPPT operating window.
    pub mppt_voltage_min: Positive<ElectricPotential>,
    /// Upper edge of the MPPT operating window.
    pub mppt_voltage_max: Positive<ElectricPotential>,
    /// Hard ceiling on open-circuit string voltage.
    pub max_dc_voltage: Positive<ElectricPotential>,
    /// Physical string inputs. For central inverters this is the number of
    /// DCDB connections.
    pub total_string_inputs: NonZeroU32,
    pub total_mppt_channels: NonZeroU32,
    pub nominal_ac_power: Option<Positive<Power>>,
    pub max_current_per_mppt: Option<Positive<ElectricCurrent>>,
}

impl InverterElectricalParameters {
    /// Resolves inverter limits from a raw catalog record.
    ///
    /// Missing fields default to an MPPT window of 125–850 V, a
    /// [1000 V](DEFAULT_MAX_DC_VOLTAGE_V) DC ceiling, 20 string inputs and
    /// 2 MPPT channels under [`ResolutionPolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for malformed values, non-integral counts,
    /// an inverted MPPT window, or a missing field under
    /// [`ResolutionPolicy::Strict`].
    pub fn resolve(
        record: &CatalogRecord,
        policy: ResolutionPolicy,
    ) -> Result<Resolved<Self>, CatalogError> {
        let mut fields = FieldResolver::new(record, RecordKind::Inverter, policy);

        let mppt_min = fields.required(&MPPT_MIN)?;
        let mppt_max = fields.required(&MPPT_MAX)?;
        let max_dc = fields.required(&MAX_DC)?;
        let string_inputs = fields.count(&STRING_INPUTS)?;
        let mppt_channels = fields.count(&MPPT_CHANNELS)?;
        let ac_power_kw = fields.optional(&AC_POWER)?;
        let mppt_current = fields.optional(&MPPT_CURRENT)?;

        if mppt_min > mppt_max {
            return Err(CatalogError::InvertedMpptWindow {
                min_v: mppt_min,
                max_v: mppt_max,
            });
        }

        let parameters = Self {
            mppt_voltage_min: positive(ElectricPotential::new::<volt>(mppt_min)),
            mppt_voltage_max: positive(ElectricPotential::new::<volt>(mppt_max)),
            max_dc_voltage: positive(ElectricPotential::new::<volt>(max_dc)),
            total_string_inputs: string_inputs,
            total_mppt_channels: mppt_channels,
            nominal_ac_power: ac_power_kw.map(|kw| positive(Power::new::<kilowatt>(kw))),
            max_current_per_mppt: mppt_current
                .map(|amps| positive(ElectricCurrent::new::<ampere>(amps))),
        };

        Ok(Resolved {
            parameters,
            record: RecordKind::Inverter,
            fields: fields.finish(),
        })
    }
}
