//! End-to-end sizing pipelines.
//!
//! [`size_strings`] covers string inverters and [`size_central`] adds DCDB and
//! MPPT distribution for central inverters. [`StringSizing`] and
//! [`CentralInverterSizing`] expose the same pipelines as [`Component`]s.

mod error;
mod request;

use std::num::NonZeroU32;

use serde::Serialize;
use stringwise_core::Component;
use uom::si::{
    f64::{ElectricCurrent, ElectricPotential},
    power::watt,
};

use crate::{
    catalog::{
        DataQualityIssue, InverterElectricalParameters, ModuleElectricalParameters, Resolved,
    },
    dcdb::{Advisory, DcdbAllocation, MpptCurrentCheck, advisories, recommend_dcdb_size},
    string_count::{CapacityReport, StringCount},
    string_length::StringLength,
    thermal::{CorrectedVoltages, correct_for_temperature},
};

pub use error::{ErrorKind, SizingError};
pub use request::{CentralSizingRequest, SizingOptions, SizingRequest};

/// Sized strings for one module and inverter pairing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringSizingResult {
    pub modules_per_string: NonZeroU32,
    pub total_string_count: u32,
    pub total_modules: u32,
    /// `modules_per_string × vmp` at standard test conditions.
    pub average_string_voltage: ElectricPotential,
    /// Strings are in series, so this is the module's `imp`.
    pub average_string_current: ElectricCurrent,
    /// `modules_per_string × voc_at_coldest`; never above the DC ceiling.
    pub string_voc_at_coldest: ElectricPotential,
    pub string_vmp_at_hottest: ElectricPotential,
    pub string_length: StringLength,
    pub corrected: CorrectedVoltages,
    pub capacity: CapacityReport,
    pub module: Resolved<ModuleElectricalParameters>,
    pub inverter: Resolved<InverterElectricalParameters>,
    /// Every catalog field that fell back to a default, module first.
    pub data_quality_issues: Vec<DataQualityIssue>,
}

/// Sized strings plus their distribution over a central-inverter plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralSizingResult {
    #[serde(flatten)]
    pub strings: StringSizingResult,
    pub allocation: DcdbAllocation,
    pub mppt_current: MpptCurrentCheck,
    /// Installed DC capacity over total nominal AC capacity, when the inverter
    /// record states its AC rating.
    pub dc_ac_ratio: Option<f64>,
    pub recommended_dcdb_size: Option<u32>,
    pub advisories: Vec<Advisory>,
}

impl CentralSizingResult {
    /// Whether the allocation fits its DCDBs.
    ///
    /// Callers must check this before using the counts for procurement.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.allocation.is_valid
    }
}

/// Sizes strings for a string-inverter system.
///
/// # Errors
///
/// Returns a [`SizingError`] of kind [`ErrorKind::MalformedInput`] when a
/// catalog record or the target cannot be used, or of kind
/// [`ErrorKind::InvalidConfiguration`] when no string length is both safe and
/// within the MPPT window.
pub fn size_strings(request: &SizingRequest) -> Result<StringSizingResult, SizingError> {
    let options = &request.options;

    let module = ModuleElectricalParameters::resolve(&request.module, options.policy)?;
    let inverter = InverterElectricalParameters::resolve(&request.inverter, options.policy)?;
    let params = module.parameters;

    let corrected = correct_for_temperature(&params, &request.site, options.vmp_coefficient)?;
    let string_length = StringLength::select(
        &corrected,
        &inverter.parameters,
        options.max_dc_voltage_override.map(|v| v.get()),
    )?;
    let modules_per_string = string_length.modules_per_string;

    let count = StringCount::compute(request.target, params.rated_power, modules_per_string)?;
    let capacity = CapacityReport::new(request.target, &count, params.rated_power, modules_per_string);

    let mut data_quality_issues = module.data_quality_issues();
    data_quality_issues.extend(inverter.data_quality_issues());

    Ok(StringSizingResult {
        modules_per_string,
        total_string_count: count.total_string_count,
        total_modules: count.total_modules,
        average_string_voltage: string_length.string_voltage(params.max_power_voltage.get()),
        average_string_current: params.max_power_current.get(),
        string_voc_at_coldest: string_length.string_voltage(corrected.voc_at_coldest),
        string_vmp_at_hottest: string_length.string_voltage(corrected.vmp_at_hottest),
        string_length,
        corrected,
        capacity,
        module,
        inverter,
        data_quality_issues,
    })
}

/// Sizes strings and distributes them over DCDBs and MPPT channels.
///
/// An allocation that overfills its DCDBs is returned with
/// [`CentralSizingResult::is_valid`] false rather than as an error.
///
/// # Errors
///
/// Everything [`size_strings`] returns, plus an
/// [`AllocationError`](crate::dcdb::AllocationError) when the layout has no
/// physical capacity per MPPT channel.
pub fn size_central(request: &CentralSizingRequest) -> Result<CentralSizingResult, SizingError> {
    let strings = size_strings(&request.sizing)?;
    let inverter = &strings.inverter.parameters;

    let allocation =
        DcdbAllocation::allocate(strings.total_string_count, &request.layout, inverter)?;
    let mppt_current = MpptCurrentCheck::new(
        allocation.strings_per_mppt,
        strings.corrected.isc_at_hottest,
        inverter.max_current_per_mppt,
    );
    let dc_ac_ratio = inverter.nominal_ac_power.map(|ac| {
        let total_ac = ac.get().get::<watt>() * f64::from(request.layout.total_inverters.get());
        strings.capacity.installed_capacity.get::<watt>() / total_ac
    });
    let advisories = advisories(strings.total_string_count, &allocation, &mppt_current);

    Ok(CentralSizingResult {
        recommended_dcdb_size: recommend_dcdb_size(allocation.strings_per_dcdb),
        strings,
        allocation,
        mppt_current,
        dc_ac_ratio,
        advisories,
    })
}

/// The string-inverter pipeline as a [`Component`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringSizing;

impl Component for StringSizing {
    type Input = SizingRequest;
    type Output = StringSizingResult;
    type Error = SizingError;

    fn call(&self, request: Self::Input) -> Result<Self::Output, Self::Error> {
        size_strings(&request)
    }
}

/// The central-inverter pipeline as a [`Component`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CentralInverterSizing;

impl Component for CentralInverterSizing {
    type Input = CentralSizingRequest;
    type Output = CentralSizingResult;
    type Error = SizingError;

    fn call(&self, request: Self::Input) -> Result<Self::Output, Self::Error> {
        size_central(&request)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use stringwise_core::constraint::StrictlyPositive;
    use uom::si::{electric_current::ampere, electric_potential::volt, power::kilowatt};

    use super::*;
    use crate::{
        catalog::{CatalogError, CatalogRecord, ResolutionPolicy},
        dcdb::CentralLayout,
        string_count::TargetCapacity,
        string_length::StringLengthError,
        thermal::{SiteThermalEnvironment, VmpCoefficient},
    };

    fn module() -> CatalogRecord {
        CatalogRecord::new()
            .with("voc_v", 48.2)
            .with("vmp_v", 40.5)
            .with("isc_a", 11.0)
            .with("imp_a", 10.5)
            .with("pmax_w", 400)
            .with("temp_coeff_voc_percent_c", -0.3)
            .with("temp_coeff_pmax_percent_c", -0.35)
    }

    fn inverter() -> CatalogRecord {
        CatalogRecord::new()
            .with("min_mpp_voltage_v", 200)
            .with("max_mpp_voltage_v", 850)
            .with("total_string_inputs", 12)
            .with("total_mppt", 2)
            .with("nominal_ac_power_kw", 80)
    }

    fn request(capacity_kw: f64) -> SizingRequest {
        SizingRequest {
            module: module(),
            inverter: inverter(),
            site: SiteThermalEnvironment::from_celsius(-5.0, 45.0).unwrap(),
            target: TargetCapacity::from_kilowatts(capacity_kw).unwrap(),
            options: SizingOptions::default(),
        }
    }

    #[test]
    fn string_inverter_pipeline() -> Result<(), SizingError> {
        let result = size_strings(&request(100.0))?;

        assert_relative_eq!(result.corrected.voc_at_coldest.get::<volt>(), 52.538, epsilon = 1e-9);
        assert_eq!(result.string_length.bounds.max_by_safety, 19);
        assert_eq!(result.modules_per_string.get(), 19);
        assert_eq!(result.total_modules, 250);
        assert_eq!(result.total_string_count, 14);

        assert_relative_eq!(result.average_string_voltage.get::<volt>(), 769.5, epsilon = 1e-9);
        assert_relative_eq!(result.average_string_current.get::<ampere>(), 10.5);
        assert_relative_eq!(
            result.string_voc_at_coldest.get::<volt>(),
            998.222,
            epsilon = 1e-9
        );
        assert!(result.string_voc_at_coldest.get::<volt>() <= 1000.0);

        // 14 × 19 = 266 modules installed against 250 resolved.
        assert_relative_eq!(result.capacity.installed_capacity.get::<kilowatt>(), 106.4, epsilon = 1e-9);

        // Only the inverter's DC ceiling was assumed.
        assert_eq!(result.data_quality_issues.len(), 1);
        assert_eq!(result.data_quality_issues[0].field, "max_dc_voltage");
        Ok(())
    }

    #[test]
    fn strict_policy_surfaces_missing_ceiling() {
        let mut request = request(100.0);
        request.options.policy = ResolutionPolicy::Strict;

        let err = size_strings(&request).unwrap_err();
        assert!(matches!(
            err,
            SizingError::Catalog(CatalogError::MissingField {
                field: "max_dc_voltage",
                ..
            })
        ));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn dc_ceiling_override_tightens_safety_bound() -> Result<(), SizingError> {
        let mut request = request(100.0);
        request.options.max_dc_voltage_override =
            Some(StrictlyPositive::new(ElectricPotential::new::<volt>(600.0)).unwrap());

        let result = size_strings(&request)?;
        assert_eq!(result.string_length.bounds.max_by_safety, 11);
        assert_eq!(result.modules_per_string.get(), 11);
        Ok(())
    }

    #[test]
    fn dedicated_vmp_coefficient_changes_the_mppt_bounds() -> Result<(), SizingError> {
        let mut request = request(100.0);
        request.module.insert("temp_coeff_vmp_percent_c", -0.45);

        let shared = size_strings(&request)?;
        request.options.vmp_coefficient = VmpCoefficient::DedicatedWhenAvailable;
        let dedicated = size_strings(&request)?;

        assert!(dedicated.corrected.vmp_at_hottest < shared.corrected.vmp_at_hottest);
        assert!(
            dedicated.string_length.bounds.max_by_mppt_upper
                >= shared.string_length.bounds.max_by_mppt_upper
        );
        Ok(())
    }

    #[test]
    fn unreachable_mppt_window_is_invalid_configuration() {
        let mut request = request(100.0);
        request.inverter = inverter()
            .with("min_mpp_voltage_v", 900)
            .with("max_mpp_voltage_v", 950);

        let err = size_strings(&request).unwrap_err();
        assert!(matches!(
            err,
            SizingError::StringLength(StringLengthError::Conflict { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn central_plant_with_overfull_dcdbs() -> Result<(), SizingError> {
        let result = size_central(&CentralSizingRequest {
            sizing: request(100.0),
            layout: CentralLayout::new(1, Some(2), Some(4))?,
        })?;

        assert_eq!(result.allocation.strings_per_dcdb, 7);
        assert!(!result.is_valid());
        assert_eq!(result.recommended_dcdb_size, Some(8));
        assert!(
            result
                .advisories
                .contains(&Advisory::MpptUtilizationHigh { percent: 175.0 })
        );
        Ok(())
    }

    #[test]
    fn central_plant_reports_current_and_ratio() -> Result<(), SizingError> {
        let mut sizing = request(100.0);
        sizing.inverter.insert("max_input_current_per_mppt_a", 60);

        let result = size_central(&CentralSizingRequest {
            sizing,
            layout: CentralLayout::new(1, Some(4), None)?,
        })?;

        // ceil(14 / 4) = 4 per DCDB, ceil(4 × 4 / 2) = 8 per MPPT.
        assert_eq!(result.allocation.strings_per_mppt, 8);
        assert!(result.is_valid());
        assert_relative_eq!(result.mppt_current.input_current.get::<ampere>(), 88.0, epsilon = 1e-9);
        assert_eq!(result.mppt_current.within_limit, Some(false));
        assert_relative_eq!(result.dc_ac_ratio.unwrap(), 106.4 / 80.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn components_match_free_functions() -> Result<(), SizingError> {
        let sized = StringSizing.call(request(250.0))?;
        assert_eq!(sized, size_strings(&request(250.0))?);

        let central = CentralSizingRequest {
            sizing: request(250.0),
            layout: CentralLayout::new(2, None, None)?,
        };
        assert_eq!(CentralInverterSizing.call(central.clone())?, size_central(&central)?);
        Ok(())
    }
}
