use std::fmt;

use serde::Serialize;
use uom::si::electric_current::ampere;

use super::{DcdbAllocation, MpptCurrentCheck};

const MAX_TYPICAL_STRINGS_PER_MPPT: u32 = 50;
const MAX_TYPICAL_TOTAL_STRINGS: u32 = 2000;
const MAX_TYPICAL_STRINGS_PER_DCDB: u32 = 32;
const MAX_TYPICAL_DCDB_PER_INVERTER: u32 = 50;
const HIGH_MPPT_UTILIZATION_PERCENT: f64 = 90.0;

/// A non-fatal observation about a central-inverter layout.
///
/// Advisories flag values that are legal but unusual enough to deserve a
/// second look before procurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    StringsPerMpptHigh { strings_per_mppt: u32 },
    TotalStringsHigh { total_string_count: u32 },
    StringsPerDcdbHigh { strings_per_dcdb: u32 },
    DcdbPerInverterHigh { dcdb_per_inverter: u32 },
    MpptUtilizationHigh { percent: f64 },
    MpptCurrentExceeded { current_a: f64, limit_a: f64 },
    MpptChannelsWithoutSlots { dcdb_per_inverter: u32, dcdb_slot_capacity: u32 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringsPerMpptHigh { strings_per_mppt } => write!(
                f,
                "{strings_per_mppt} strings per MPPT is unusually high \
                 (>{MAX_TYPICAL_STRINGS_PER_MPPT}); check system parameters"
            ),
            Self::TotalStringsHigh { total_string_count } => write!(
                f,
                "{total_string_count} strings in total is unusually high \
                 (>{MAX_TYPICAL_TOTAL_STRINGS}); verify capacity and module data"
            ),
            Self::StringsPerDcdbHigh { strings_per_dcdb } => write!(
                f,
                "{strings_per_dcdb} strings per DCDB exceeds typical DCDB sizes \
                 (>{MAX_TYPICAL_STRINGS_PER_DCDB}); consider more DCDBs"
            ),
            Self::DcdbPerInverterHigh { dcdb_per_inverter } => write!(
                f,
                "{dcdb_per_inverter} DCDBs per inverter is unusually high \
                 (>{MAX_TYPICAL_DCDB_PER_INVERTER})"
            ),
            Self::MpptUtilizationHigh { percent } => write!(
                f,
                "MPPT utilization {percent:.1}% leaves little spare capacity \
                 (>{HIGH_MPPT_UTILIZATION_PERCENT}%)"
            ),
            Self::MpptCurrentExceeded { current_a, limit_a } => write!(
                f,
                "MPPT input current {current_a:.1} A exceeds the inverter limit of {limit_a:.1} A"
            ),
            Self::MpptChannelsWithoutSlots {
                dcdb_per_inverter,
                dcdb_slot_capacity,
            } => write!(
                f,
                "{dcdb_per_inverter} DCDBs of {dcdb_slot_capacity} slots per inverter \
                 leave some MPPT channels without strings"
            ),
        }
    }
}

/// Collects the advisories that apply to an allocation, in a fixed order.
#[must_use]
pub fn advisories(
    total_string_count: u32,
    allocation: &DcdbAllocation,
    current: &MpptCurrentCheck,
) -> Vec<Advisory> {
    let mut found = Vec::new();

    if allocation.strings_per_mppt > MAX_TYPICAL_STRINGS_PER_MPPT {
        found.push(Advisory::StringsPerMpptHigh {
            strings_per_mppt: allocation.strings_per_mppt,
        });
    }
    if total_string_count > MAX_TYPICAL_TOTAL_STRINGS {
        found.push(Advisory::TotalStringsHigh { total_string_count });
    }
    if allocation.strings_per_dcdb > MAX_TYPICAL_STRINGS_PER_DCDB {
        found.push(Advisory::StringsPerDcdbHigh {
            strings_per_dcdb: allocation.strings_per_dcdb,
        });
    }
    if allocation.dcdb_count_per_inverter > MAX_TYPICAL_DCDB_PER_INVERTER {
        found.push(Advisory::DcdbPerInverterHigh {
            dcdb_per_inverter: allocation.dcdb_count_per_inverter,
        });
    }
    match allocation.mppt_utilization_percent {
        Some(percent) if percent > HIGH_MPPT_UTILIZATION_PERCENT => {
            found.push(Advisory::MpptUtilizationHigh { percent });
        }
        Some(_) => {}
        None => found.push(Advisory::MpptChannelsWithoutSlots {
            dcdb_per_inverter: allocation.dcdb_count_per_inverter,
            dcdb_slot_capacity: allocation.dcdb_slot_capacity,
        }),
    }
    if let (Some(false), Some(limit)) = (current.within_limit, current.limit) {
        found.push(Advisory::MpptCurrentExceeded {
            current_a: current.input_current.get::<ampere>(),
            limit_a: limit.get::<ampere>(),
        });
    }

    found
}
