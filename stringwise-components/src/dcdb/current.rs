use serde::Serialize;
use uom::si::f64::ElectricCurrent;

use crate::catalog::Positive;

/// Worst-case current arriving at one MPPT input.
///
/// Parallel strings add their currents, and short-circuit current is highest
/// on the hottest day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MpptCurrentCheck {
    /// `strings_per_mppt × isc_at_hottest`
    pub input_current: ElectricCurrent,
    pub limit: Option<ElectricCurrent>,
    /// `None` when the inverter record has no per-MPPT current limit.
    pub within_limit: Option<bool>,
}

impl MpptCurrentCheck {
    #[must_use]
    pub fn new(
        strings_per_mppt: u32,
        isc_at_hottest: ElectricCurrent,
        limit: Option<Positive<ElectricCurrent>>,
    ) -> Self {
        let input_current = isc_at_hottest * f64::from(strings_per_mppt);
        let limit = limit.map(|limit| limit.get());

        Self {
            input_current,
            limit,
            within_limit: limit.map(|limit| input_current <= limit),
        }
    }
}
