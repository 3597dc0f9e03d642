use serde::Serialize;
use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin as delta_kelvin};

/// A linear temperature coefficient in percent per kelvin (%/°C).
///
/// Datasheets quote these relative to standard test conditions. The sign is
/// not assumed: voltage coefficients are usually negative and current
/// coefficients usually positive, and both are applied as given.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TemperatureCoefficient(f64);

impl TemperatureCoefficient {
    /// Creates a coefficient from a value in %/°C.
    #[must_use]
    pub const fn percent_per_kelvin(value: f64) -> Self {
        Self(value)
    }

    /// Returns the coefficient in %/°C.
    #[must_use]
    pub const fn as_percent_per_kelvin(self) -> f64 {
        self.0
    }

    /// Returns the multiplicative factor `1 + (c / 100) × ΔT`.
    ///
    /// `delta` is the cell temperature minus the reference temperature.
    #[must_use]
    pub fn factor(self, delta: TemperatureInterval) -> f64 {
        1.0 + (self.0 / 100.0) * delta.get::<delta_kelvin>()
    }
}
