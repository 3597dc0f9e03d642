//! Selection of the number of modules wired in series.

use std::num::NonZeroU32;

use serde::Serialize;
use thiserror::Error;
use uom::si::{electric_potential::volt, f64::ElectricPotential};

use crate::{catalog::InverterElectricalParameters, thermal::CorrectedVoltages};

/// Practical ceiling on modules per string from connector and combiner limits.
///
/// Independent of the electrical constraints.
pub const PRACTICAL_MAX_MODULES_PER_STRING: u32 = 24;

/// The three electrical bounds on string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StringLengthBounds {
    /// `floor(max_dc_voltage / voc_at_coldest)`
    pub max_by_safety: u32,
    /// `floor(mppt_voltage_max / vmp_at_hottest)`
    pub max_by_mppt_upper: u32,
    /// `ceil(mppt_voltage_min / vmp_at_hottest)`
    pub min_by_mppt_lower: u32,
}

impl StringLengthBounds {
    /// Computes the bounds for one module and inverter at the site extremes.
    #[must_use]
    pub fn compute(
        corrected: &CorrectedVoltages,
        mppt_voltage_min: ElectricPotential,
        mppt_voltage_max: ElectricPotential,
        max_dc_voltage: ElectricPotential,
    ) -> Self {
        let voc_cold = corrected.voc_at_coldest.get::<volt>();
        let vmp_hot = corrected.vmp_at_hottest.get::<volt>();

        Self {
            max_by_safety: whole(max_dc_voltage.get::<volt>() / voc_cold, f64::floor),
            max_by_mppt_upper: whole(mppt_voltage_max.get::<volt>() / vmp_hot, f64::floor),
            min_by_mppt_lower: whole(mppt_voltage_min.get::<volt>() / vmp_hot, f64::ceil),
        }
    }

    /// The tighter of the two electrical ceilings.
    #[must_use]
    pub fn optimal(&self) -> u32 {
        self.max_by_safety.min(self.max_by_mppt_upper)
    }
}

/// The chosen string length and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StringLength {
    pub modules_per_string: NonZeroU32,
    pub bounds: StringLengthBounds,
    /// Whether the practical ceiling, not an electrical one, set the length.
    pub practical_limit_applied: bool,
    /// Whether the MPPT lower bound forced the length past the practical ceiling.
    pub exceeds_practical_limit: bool,
}

/// The MPPT window cannot be reached without exceeding a voltage ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StringLengthError {
    #[error(
        "at least {} modules are needed to reach the MPPT window, but at most {} are safe \
         (safety ceiling {}, MPPT ceiling {})",
        .bounds.min_by_mppt_lower,
        .bounds.optimal(),
        .bounds.max_by_safety,
        .bounds.max_by_mppt_upper
    )]
    Conflict { bounds: StringLengthBounds },
}

impl StringLength {
    /// Picks the operating string length.
    ///
    /// `modules_per_string = max(min_by_mppt_lower, min(optimal, 24))`, where
    /// `optimal` is the tighter of the safety and MPPT-upper ceilings.
    ///
    /// `max_dc_voltage` overrides the inverter's own DC ceiling when given.
    ///
    /// # Errors
    ///
    /// Returns [`StringLengthError::Conflict`] when the MPPT lower bound
    /// exceeds `optimal`, since any length satisfying the MPPT window would
    /// then be unsafe.
    pub fn select(
        corrected: &CorrectedVoltages,
        inverter: &InverterElectricalParameters,
        max_dc_voltage: Option<ElectricPotential>,
    ) -> Result<Self, StringLengthError> {
        let bounds = StringLengthBounds::compute(
            corrected,
            inverter.mppt_voltage_min.get(),
            inverter.mppt_voltage_max.get(),
            max_dc_voltage.unwrap_or(inverter.max_dc_voltage.get()),
        );

        let optimal = bounds.optimal();
        if bounds.min_by_mppt_lower > optimal {
            return Err(StringLengthError::Conflict { bounds });
        }

        let capped = optimal.min(PRACTICAL_MAX_MODULES_PER_STRING);
        let chosen = bounds.min_by_mppt_lower.max(capped);

        // min_by_mppt_lower is the ceiling of a positive ratio, so it is at least one.
        let modules_per_string =
            NonZeroU32::new(chosen).ok_or(StringLengthError::Conflict { bounds })?;

        Ok(Self {
            modules_per_string,
            bounds,
            practical_limit_applied: optimal > PRACTICAL_MAX_MODULES_PER_STRING
                && chosen == PRACTICAL_MAX_MODULES_PER_STRING,
            exceeds_practical_limit: chosen > PRACTICAL_MAX_MODULES_PER_STRING,
        })
    }

    /// Series voltage of the whole string for a given per-module voltage.
    #[must_use]
    pub fn string_voltage(&self, module_voltage: ElectricPotential) -> ElectricPotential {
        module_voltage * f64::from(self.modules_per_string.get())
    }
}

/// Rounds a non-negative ratio to a module count, saturating at `u32::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(ratio: f64, round: fn(f64) -> f64) -> u32 {
    round(ratio) as u32
}
