//! Conversion of a target capacity into modules and strings.

use std::num::NonZeroU32;

use serde::Serialize;
use stringwise_core::constraint::StrictlyPositive;
use thiserror::Error;
use uom::si::{
    f64::Power,
    power::{kilowatt, watt},
};

use crate::catalog::Positive;

/// Requested DC capacity of the array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TargetCapacity(Positive<Power>);

/// Errors from capacity handling.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum CapacityError {
    #[error("target capacity must be positive and finite, got {kilowatts} kW")]
    Invalid { kilowatts: f64 },

    #[error("{modules} modules exceed the countable range")]
    TooManyModules { modules: f64 },
}

impl TargetCapacity {
    /// Creates a target capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::Invalid`] unless the capacity is finite and
    /// greater than zero.
    pub fn new(capacity: Power) -> Result<Self, CapacityError> {
        let invalid = CapacityError::Invalid {
            kilowatts: capacity.get::<kilowatt>(),
        };
        if !capacity.get::<watt>().is_finite() {
            return Err(invalid);
        }
        StrictlyPositive::new(capacity)
            .map(Self)
            .map_err(|_| invalid)
    }

    /// Creates a target capacity from a value in kW.
    ///
    /// # Errors
    ///
    /// See [`TargetCapacity::new`].
    pub fn from_kilowatts(kilowatts: f64) -> Result<Self, CapacityError> {
        Self::new(Power::new::<kilowatt>(kilowatts))
    }

    pub fn power(&self) -> Power {
        self.0.get()
    }
}

/// Modules and strings needed for a target capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StringCount {
    /// `round(target / module_power)`, rounded half away from zero.
    pub total_modules: u32,
    /// `ceil(total_modules / modules_per_string)`; a partial string cannot
    /// be built, so this always rounds up.
    pub total_string_count: u32,
}

impl StringCount {
    /// Counts modules and strings for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::TooManyModules`] when the module count does
    /// not fit in a `u32`.
    pub fn compute(
        target: TargetCapacity,
        module_power: Positive<Power>,
        modules_per_string: NonZeroU32,
    ) -> Result<Self, CapacityError> {
        let modules = (target.power().get::<watt>() / module_power.get().get::<watt>()).round();
        if modules > f64::from(u32::MAX) {
            return Err(CapacityError::TooManyModules { modules });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total_modules = modules as u32;

        Ok(Self {
            total_modules,
            total_string_count: total_modules.div_ceil(modules_per_string.get()),
        })
    }

    /// Modules actually installed once every string is filled.
    #[must_use]
    pub fn installed_modules(&self, modules_per_string: NonZeroU32) -> u64 {
        u64::from(self.total_string_count) * u64::from(modules_per_string.get())
    }
}

/// How closely the layout meets the requested capacity.
///
/// Rounding the module count and filling the last string both move the
/// installed capacity away from the target; the deviations are signed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityReport {
    pub target: Power,
    /// `total_modules × module_power`
    pub resolved_capacity: Power,
    /// `total_string_count × modules_per_string × module_power`
    pub installed_capacity: Power,
    pub resolved_deviation: Power,
    pub installed_deviation: Power,
}

impl CapacityReport {
    #[must_use]
    pub fn new(
        target: TargetCapacity,
        count: &StringCount,
        module_power: Positive<Power>,
        modules_per_string: NonZeroU32,
    ) -> Self {
        let module_power = module_power.get();
        let resolved_capacity = module_power * f64::from(count.total_modules);
        #[allow(clippy::cast_precision_loss)]
        let installed_capacity =
            module_power * count.installed_modules(modules_per_string) as f64;

        Self {
            target: target.power(),
            resolved_capacity,
            installed_capacity,
            resolved_deviation: resolved_capacity - target.power(),
            installed_deviation: installed_capacity - target.power(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn watts(value: f64) -> Positive<Power> {
        StrictlyPositive::new(Power::new::<watt>(value)).unwrap()
    }

    fn per_string(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn hundred_kilowatts_of_400_watt_modules() -> Result<(), CapacityError> {
        let target = TargetCapacity::from_kilowatts(100.0)?;
        let count = StringCount::compute(target, watts(400.0), per_string(18))?;

        assert_eq!(
            count,
            StringCount {
                total_modules: 250,
                total_string_count: 14,
            }
        );
        assert_eq!(count.installed_modules(per_string(18)), 252);
        Ok(())
    }

    #[test]
    fn module_count_rounds_to_nearest() -> Result<(), CapacityError> {
        // 10 000 / 545 = 18.35
        let down = StringCount::compute(TargetCapacity::from_kilowatts(10.0)?, watts(545.0), per_string(20))?;
        assert_eq!(down.total_modules, 18);

        // 10 000 / 530 = 18.87
        let up = StringCount::compute(TargetCapacity::from_kilowatts(10.0)?, watts(530.0), per_string(20))?;
        assert_eq!(up.total_modules, 19);
        Ok(())
    }

    #[test]
    fn string_count_always_rounds_up() -> Result<(), CapacityError> {
        let target = TargetCapacity::from_kilowatts(7.6)?;
        let count = StringCount::compute(target, watts(400.0), per_string(18))?;

        assert_eq!(count.total_modules, 19);
        assert_eq!(count.total_string_count, 2);
        Ok(())
    }

    #[test]
    fn exact_fit_adds_no_extra_string() -> Result<(), CapacityError> {
        let target = TargetCapacity::from_kilowatts(72.0)?;
        let count = StringCount::compute(target, watts(400.0), per_string(18))?;

        assert_eq!(count.total_modules, 180);
        assert_eq!(count.total_string_count, 10);
        Ok(())
    }

    #[test]
    fn tiny_target_rounds_to_no_modules() -> Result<(), CapacityError> {
        let target = TargetCapacity::from_kilowatts(0.1)?;
        let count = StringCount::compute(target, watts(400.0), per_string(18))?;

        assert_eq!(count.total_modules, 0);
        assert_eq!(count.total_string_count, 0);
        Ok(())
    }

    #[test]
    fn report_surfaces_both_deviations() -> Result<(), CapacityError> {
        let target = TargetCapacity::from_kilowatts(100.0)?;
        let count = StringCount::compute(target, watts(400.0), per_string(18))?;
        let report = CapacityReport::new(target, &count, watts(400.0), per_string(18));

        assert_relative_eq!(report.resolved_capacity.get::<kilowatt>(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(report.resolved_deviation.get::<watt>(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(report.installed_capacity.get::<kilowatt>(), 100.8, epsilon = 1e-9);
        assert_relative_eq!(report.installed_deviation.get::<watt>(), 800.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn invalid_targets_are_rejected() {
        for kilowatts in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TargetCapacity::from_kilowatts(kilowatts),
                Err(CapacityError::Invalid { .. })
            ));
        }
    }
}
