//! Unit helpers shared by the sizing engine.

use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::{degree_celsius, kelvin as abs_kelvin},
};

/// Cell temperature at standard test conditions, 25 °C.
///
/// Datasheet voltages and temperature coefficients are referenced to it.
#[must_use]
pub fn stc_temperature() -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(25.0)
}

/// Signed temperature differences, such as a site extreme minus STC.
pub trait TemperatureOps {
    /// `self - other` as an interval.
    ///
    /// `uom` keeps points on the scale apart from changes and will not
    /// subtract two absolute temperatures, so both sides go through kelvin.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureOps for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        let kelvin = self.get::<abs_kelvin>() - other.get::<abs_kelvin>();
        TemperatureInterval::new::<delta_kelvin>(kelvin)
    }
}
