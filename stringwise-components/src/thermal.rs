//! Temperature correction of module voltages.
//!
//! Open-circuit voltage rises as cells get colder than the 25 °C reference,
//! so the coldest design day sets the over-voltage worst case. Maximum-power
//! voltage falls as cells heat up, so the hottest design day sets the risk of
//! dropping below the inverter's MPPT window.

use serde::{Deserialize, Serialize};
use stringwise_core::units::{TemperatureOps, stc_temperature};
use thiserror::Error;
use uom::si::{
    electric_current::ampere,
    electric_potential::volt,
    f64::{ElectricCurrent, ElectricPotential, ThermodynamicTemperature},
    thermodynamic_temperature::degree_celsius,
};

use crate::catalog::{ModuleElectricalParameters, TemperatureCoefficient};

/// Coldest and hottest design temperatures of a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteThermalEnvironment {
    lowest_design_temperature: ThermodynamicTemperature,
    highest_design_temperature: ThermodynamicTemperature,
}

impl SiteThermalEnvironment {
    /// Creates a site environment.
    ///
    /// Equal temperatures are allowed.
    ///
    /// # Errors
    ///
    /// Returns a [`ThermalError`] if either temperature is not finite or the
    /// lowest temperature is above the highest.
    pub fn new(
        lowest: ThermodynamicTemperature,
        highest: ThermodynamicTemperature,
    ) -> Result<Self, ThermalError> {
        let (low_c, high_c) = (
            lowest.get::<degree_celsius>(),
            highest.get::<degree_celsius>(),
        );

        if !low_c.is_finite() || !high_c.is_finite() {
            return Err(ThermalError::NonFiniteTemperature);
        }
        if low_c > high_c {
            return Err(ThermalError::InvertedRange {
                lowest_c: low_c,
                highest_c: high_c,
            });
        }

        Ok(Self {
            lowest_design_temperature: lowest,
            highest_design_temperature: highest,
        })
    }

    /// Creates a site environment from temperatures in °C.
    ///
    /// # Errors
    ///
    /// See [`SiteThermalEnvironment::new`].
    pub fn from_celsius(lowest: f64, highest: f64) -> Result<Self, ThermalError> {
        Self::new(
            ThermodynamicTemperature::new::<degree_celsius>(lowest),
            ThermodynamicTemperature::new::<degree_celsius>(highest),
        )
    }

    pub fn lowest(&self) -> ThermodynamicTemperature {
        self.lowest_design_temperature
    }

    pub fn highest(&self) -> ThermodynamicTemperature {
        self.highest_design_temperature
    }
}

/// Which coefficient corrects Vmp for temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VmpCoefficient {
    /// Reuse the Voc coefficient, the common engineering simplification.
    #[default]
    Voc,
    /// Use the module's Vmp coefficient if the catalog has one, otherwise
    /// fall back to the Voc coefficient.
    #[serde(alias = "dedicated")]
    DedicatedWhenAvailable,
}

/// The coefficient that was actually applied to Vmp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedVmpCoefficient {
    Voc,
    Vmp,
}

/// Module values at the site's design temperature extremes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrectedVoltages {
    pub voc_at_coldest: ElectricPotential,
    pub vmp_at_hottest: ElectricPotential,
    /// Isc at the hottest temperature, or the STC value when the catalog has
    /// no Isc coefficient.
    pub isc_at_hottest: ElectricCurrent,
    pub vmp_coefficient: AppliedVmpCoefficient,
}

/// Errors from temperature correction.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum ThermalError {
    #[error("design temperatures must be finite")]
    NonFiniteTemperature,

    #[error("lowest design temperature {lowest_c} °C is above highest {highest_c} °C")]
    InvertedRange { lowest_c: f64, highest_c: f64 },

    /// The linear correction drove a value to zero or below, which happens
    /// only with coefficients or temperatures far outside datasheet ranges.
    #[error("temperature-corrected {quantity} is not positive ({value})")]
    NonPhysical { quantity: &'static str, value: f64 },
}

/// Projects module voltages and current to the site's design extremes.
///
/// - `voc_at_coldest = voc × (1 + (β_voc / 100) × (T_low − 25 °C))`
/// - `vmp_at_hottest = vmp × (1 + (β / 100) × (T_high − 25 °C))`, where `β`
///   is chosen by `vmp_coefficient`
/// - `isc_at_hottest = isc × (1 + (α_isc / 100) × (T_high − 25 °C))`
///
/// Coefficients are applied with whatever sign the catalog gives.
///
/// # Errors
///
/// Returns [`ThermalError::NonPhysical`] if any corrected value is not
/// strictly positive, since later stages divide by these values.
pub fn correct_for_temperature(
    module: &ModuleElectricalParameters,
    site: &SiteThermalEnvironment,
    vmp_coefficient: VmpCoefficient,
) -> Result<CorrectedVoltages, ThermalError> {
    let cold_delta = site.lowest().minus(stc_temperature());
    let hot_delta = site.highest().minus(stc_temperature());

    let (vmp_beta, applied) = match (vmp_coefficient, module.temp_coefficient_vmp) {
        (VmpCoefficient::DedicatedWhenAvailable, Some(beta)) => (beta, AppliedVmpCoefficient::Vmp),
        (VmpCoefficient::DedicatedWhenAvailable, None) | (VmpCoefficient::Voc, _) => {
            (module.temp_coefficient_voc, AppliedVmpCoefficient::Voc)
        }
    };
    let isc_alpha = module
        .temp_coefficient_isc
        .unwrap_or(TemperatureCoefficient::percent_per_kelvin(0.0));

    let voc_at_coldest =
        module.open_circuit_voltage.get() * module.temp_coefficient_voc.factor(cold_delta);
    let vmp_at_hottest = module.max_power_voltage.get() * vmp_beta.factor(hot_delta);
    let isc_at_hottest = module.short_circuit_current.get() * isc_alpha.factor(hot_delta);

    check_positive("voc_at_coldest", voc_at_coldest.get::<volt>())?;
    check_positive("vmp_at_hottest", vmp_at_hottest.get::<volt>())?;
    check_positive("isc_at_hottest", isc_at_hottest.get::<ampere>())?;

    Ok(CorrectedVoltages {
        voc_at_coldest,
        vmp_at_hottest,
        isc_at_hottest,
        vmp_coefficient: applied,
    })
}

fn check_positive(quantity: &'static str, value: f64) -> Result<(), ThermalError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ThermalError::NonPhysical { quantity, value })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalog::{CatalogRecord, ResolutionPolicy};

    fn module(record: CatalogRecord) -> ModuleElectricalParameters {
        ModuleElectricalParameters::resolve(&record, ResolutionPolicy::Lenient)
            .unwrap()
            .parameters
    }

    fn reference_module() -> ModuleElectricalParameters {
        module(
            CatalogRecord::new()
                .with("voc_v", 48.2)
                .with("vmp_v", 40.5)
                .with("isc_a", 11.0)
                .with("temp_coeff_voc_percent_c", -0.3)
                .with("temp_coeff_vmp_percent_c", -0.4)
                .with("temp_coeff_isc_percent_c", 0.05),
        )
    }

    #[test]
    fn coldest_voc_rises_above_stc() -> Result<(), ThermalError> {
        let site = SiteThermalEnvironment::from_celsius(-5.0, 45.0)?;
        let corrected = correct_for_temperature(&reference_module(), &site, VmpCoefficient::Voc)?;

        // 48.2 × (1 + (−0.003)(−30)) = 48.2 × 1.09
        assert_relative_eq!(corrected.voc_at_coldest.get::<volt>(), 52.538, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn hottest_vmp_uses_voc_coefficient_by_default() -> Result<(), ThermalError> {
        let site = SiteThermalEnvironment::from_celsius(-5.0, 45.0)?;
        let corrected = correct_for_temperature(&reference_module(), &site, VmpCoefficient::Voc)?;

        // 40.5 × (1 + (−0.003)(20)) = 40.5 × 0.94
        assert_relative_eq!(corrected.vmp_at_hottest.get::<volt>(), 38.07, epsilon = 1e-9);
        assert_eq!(corrected.vmp_coefficient, AppliedVmpCoefficient::Voc);
        Ok(())
    }

    #[test]
    fn dedicated_vmp_coefficient_when_requested() -> Result<(), ThermalError> {
        let site = SiteThermalEnvironment::from_celsius(-5.0, 45.0)?;
        let corrected = correct_for_temperature(
            &reference_module(),
            &site,
            VmpCoefficient::DedicatedWhenAvailable,
        )?;

        // 40.5 × (1 + (−0.004)(20)) = 40.5 × 0.92
        assert_relative_eq!(corrected.vmp_at_hottest.get::<volt>(), 37.26, epsilon = 1e-9);
        assert_eq!(corrected.vmp_coefficient, AppliedVmpCoefficient::Vmp);
        Ok(())
    }

    #[test]
    fn dedicated_request_falls_back_without_catalog_value() -> Result<(), ThermalError> {
        let site = SiteThermalEnvironment::from_celsius(-5.0, 45.0)?;
        let plain = module(CatalogRecord::new().with("vmp_v", 40.5));
        let corrected =
            correct_for_temperature(&plain, &site, VmpCoefficient::DedicatedWhenAvailable)?;

        assert_eq!(corrected.vmp_coefficient, AppliedVmpCoefficient::Voc);
        // Default Voc coefficient −0.25 %/°C: 40.5 × 0.95
        assert_relative_eq!(corrected.vmp_at_hottest.get::<volt>(), 38.475, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn isc_correction_uses_its_own_coefficient() -> Result<(), ThermalError> {
        let site = SiteThermalEnvironment::from_celsius(-5.0, 45.0)?;
        let corrected = correct_for_temperature(&reference_module(), &site, VmpCoefficient::Voc)?;
        assert_relative_eq!(corrected.isc_at_hottest.get::<ampere>(), 11.11, epsilon = 1e-9);

        let no_alpha = module(CatalogRecord::new().with("isc_a", 11.0));
        let corrected = correct_for_temperature(&no_alpha, &site, VmpCoefficient::Voc)?;
        assert_relative_eq!(corrected.isc_at_hottest.get::<ampere>(), 11.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn positive_voltage_coefficient_is_not_clipped() -> Result<(), ThermalError> {
        let site = SiteThermalEnvironment::from_celsius(-5.0, 45.0)?;
        let odd = module(
            CatalogRecord::new()
                .with("voc_v", 50.0)
                .with("temp_coeff_voc_percent_c", 0.2),
        );
        let corrected = correct_for_temperature(&odd, &site, VmpCoefficient::Voc)?;

        // 50 × (1 + 0.002 × −30) = 50 × 0.94
        assert_relative_eq!(corrected.voc_at_coldest.get::<volt>(), 47.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn runaway_coefficient_is_non_physical() -> Result<(), ThermalError> {
        let site = SiteThermalEnvironment::from_celsius(-5.0, 45.0)?;
        let broken = module(CatalogRecord::new().with("temp_coeff_voc_percent_c", -6.0));

        assert!(matches!(
            correct_for_temperature(&broken, &site, VmpCoefficient::Voc),
            Err(ThermalError::NonPhysical {
                quantity: "vmp_at_hottest",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn site_range_validation() {
        assert!(SiteThermalEnvironment::from_celsius(20.0, 20.0).is_ok());
        assert_eq!(
            SiteThermalEnvironment::from_celsius(40.0, -10.0),
            Err(ThermalError::InvertedRange {
                lowest_c: 40.0,
                highest_c: -10.0
            })
        );
        assert_eq!(
            SiteThermalEnvironment::from_celsius(f64::NAN, 10.0),
            Err(ThermalError::NonFiniteTemperature)
        );
    }
}
