//! Distribution of strings across combiner boxes (DCDBs) and MPPT channels.
//!
//! Central inverters receive strings through DCDBs. Each DCDB has a fixed
//! number of string slots, and the inverter spreads its DCDBs over its MPPT
//! channels. An allocation that needs more strings per DCDB than it has
//! slots is still returned in full, with [`DcdbAllocation::is_valid`] set to
//! `false`, so the caller can decide whether to add inverters or DCDBs.

mod advisory;
mod current;
mod recommend;

use std::num::NonZeroU32;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::InverterElectricalParameters;

pub use advisory::{Advisory, advisories};
pub use current::MpptCurrentCheck;
pub use recommend::{STANDARD_DCDB_SIZES, recommend_dcdb_size};

/// String slots per DCDB when the caller does not say otherwise.
pub const DEFAULT_DCDB_SLOT_CAPACITY: u32 = 16;

/// Errors from DCDB allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AllocationError {
    #[error("{field} must be at least one")]
    Zero { field: &'static str },

    #[error("{quantity} exceeds the countable range")]
    Overflow { quantity: &'static str },
}

/// Inverter count and DCDB overrides for a central-inverter plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CentralLayout {
    pub total_inverters: NonZeroU32,
    /// Overrides the inverter's string-input count when set.
    pub dcdb_per_inverter: Option<NonZeroU32>,
    /// Overrides [`DEFAULT_DCDB_SLOT_CAPACITY`] when set.
    pub dcdb_slot_capacity: Option<NonZeroU32>,
}

impl CentralLayout {
    /// Creates a layout.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::Zero`] if any supplied count is zero.
    pub fn new(
        total_inverters: u32,
        dcdb_per_inverter: Option<u32>,
        dcdb_slot_capacity: Option<u32>,
    ) -> Result<Self, AllocationError> {
        fn non_zero(field: &'static str, value: u32) -> Result<NonZeroU32, AllocationError> {
            NonZeroU32::new(value).ok_or(AllocationError::Zero { field })
        }

        Ok(Self {
            total_inverters: non_zero("total_inverters", total_inverters)?,
            dcdb_per_inverter: dcdb_per_inverter
                .map(|n| non_zero("dcdb_per_inverter", n))
                .transpose()?,
            dcdb_slot_capacity: dcdb_slot_capacity
                .map(|n| non_zero("dcdb_slot_capacity", n))
                .transpose()?,
        })
    }
}

/// How strings land on DCDBs and MPPT channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DcdbAllocation {
    pub dcdb_count_per_inverter: u32,
    pub total_dcdb_in_system: u32,
    pub strings_per_dcdb: u32,
    pub strings_per_mppt: u32,
    pub dcdb_slot_capacity: u32,
    /// Physical maximum strings per MPPT when every slot is filled.
    pub max_strings_per_mppt: u32,
    /// `true` iff `strings_per_dcdb <= dcdb_slot_capacity`.
    pub is_valid: bool,
    /// `strings_per_mppt / max_strings_per_mppt × 100`. Exceeds 100 when the
    /// allocation is invalid, and is `None` when `max_strings_per_mppt` is zero
    /// because one inverter has fewer DCDB slots than MPPT channels.
    pub mppt_utilization_percent: Option<f64>,
}

impl DcdbAllocation {
    /// Distributes `total_string_count` strings over the plant.
    ///
    /// - `total_dcdb_in_system = total_inverters × dcdb_per_inverter`
    /// - `strings_per_dcdb = ceil(total_string_count / total_dcdb_in_system)`
    /// - `strings_per_mppt = ceil(dcdb_per_inverter × strings_per_dcdb / mppt_channels)`
    /// - `max_strings_per_mppt = floor(dcdb_per_inverter × dcdb_slot_capacity / mppt_channels)`
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::Overflow`] when a count leaves the `u32`
    /// range. Layouts that cannot hold their strings are reported, not refused.
    pub fn allocate(
        total_string_count: u32,
        layout: &CentralLayout,
        inverter: &InverterElectricalParameters,
    ) -> Result<Self, AllocationError> {
        let dcdb_per_inverter = layout
            .dcdb_per_inverter
            .unwrap_or(inverter.total_string_inputs)
            .get();
        let slot_capacity = layout
            .dcdb_slot_capacity
            .map_or(DEFAULT_DCDB_SLOT_CAPACITY, NonZeroU32::get);
        let mppt_channels = inverter.total_mppt_channels.get();

        let total_dcdb = layout
            .total_inverters
            .get()
            .checked_mul(dcdb_per_inverter)
            .ok_or(AllocationError::Overflow {
                quantity: "total_dcdb_in_system",
            })?;

        let strings_per_dcdb = total_string_count.div_ceil(total_dcdb);
        let strings_per_mppt = narrow(
            "strings_per_mppt",
            (u64::from(dcdb_per_inverter) * u64::from(strings_per_dcdb))
                .div_ceil(u64::from(mppt_channels)),
        )?;
        let max_strings_per_mppt = narrow(
            "max_strings_per_mppt",
            u64::from(dcdb_per_inverter) * u64::from(slot_capacity) / u64::from(mppt_channels),
        )?;

        Ok(Self {
            dcdb_count_per_inverter: dcdb_per_inverter,
            total_dcdb_in_system: total_dcdb,
            strings_per_dcdb,
            strings_per_mppt,
            dcdb_slot_capacity: slot_capacity,
            max_strings_per_mppt,
            is_valid: strings_per_dcdb <= slot_capacity,
            mppt_utilization_percent: (max_strings_per_mppt > 0).then(|| {
                f64::from(strings_per_mppt) / f64::from(max_strings_per_mppt) * 100.0
            }),
        })
    }
}

fn narrow(quantity: &'static str, value: u64) -> Result<u32, AllocationError> {
    u32::try_from(value).map_err(|_| AllocationError::Overflow { quantity })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalog::{CatalogRecord, ResolutionPolicy};

    fn inverter(string_inputs: u32, mppt: u32) -> InverterElectricalParameters {
        let record = CatalogRecord::new()
            .with("total_string_inputs", string_inputs)
            .with("total_mppt", mppt);
        InverterElectricalParameters::resolve(&record, ResolutionPolicy::Lenient)
            .unwrap()
            .parameters
    }

    #[test]
    fn overfull_dcdbs_are_reported_not_rejected() -> Result<(), AllocationError> {
        let layout = CentralLayout::new(1, Some(2), Some(4))?;
        let allocation = DcdbAllocation::allocate(14, &layout, &inverter(20, 2))?;

        assert_eq!(allocation.total_dcdb_in_system, 2);
        assert_eq!(allocation.strings_per_dcdb, 7);
        assert!(!allocation.is_valid);
        assert_eq!(allocation.strings_per_mppt, 7);
        assert_eq!(allocation.max_strings_per_mppt, 4);
        assert_relative_eq!(allocation.mppt_utilization_percent.unwrap(), 175.0);
        Ok(())
    }

    #[test]
    fn defaults_come_from_inverter_and_standard_slots() -> Result<(), AllocationError> {
        let layout = CentralLayout::new(2, None, None)?;
        let allocation = DcdbAllocation::allocate(100, &layout, &inverter(8, 4))?;

        assert_eq!(allocation.dcdb_count_per_inverter, 8);
        assert_eq!(allocation.dcdb_slot_capacity, DEFAULT_DCDB_SLOT_CAPACITY);
        assert_eq!(allocation.total_dcdb_in_system, 16);
        // ceil(100 / 16) = 7, ceil(8 × 7 / 4) = 14, floor(8 × 16 / 4) = 32
        assert_eq!(allocation.strings_per_dcdb, 7);
        assert_eq!(allocation.strings_per_mppt, 14);
        assert_eq!(allocation.max_strings_per_mppt, 32);
        assert!(allocation.is_valid);
        assert_relative_eq!(allocation.mppt_utilization_percent.unwrap(), 43.75);
        Ok(())
    }

    #[test]
    fn full_dcdbs_are_still_valid() -> Result<(), AllocationError> {
        let layout = CentralLayout::new(1, Some(4), Some(16))?;
        let allocation = DcdbAllocation::allocate(64, &layout, &inverter(20, 2))?;

        assert_eq!(allocation.strings_per_dcdb, 16);
        assert!(allocation.is_valid);
        assert_relative_eq!(allocation.mppt_utilization_percent.unwrap(), 100.0);
        Ok(())
    }

    #[test]
    fn ceiling_covers_every_string() -> Result<(), AllocationError> {
        let inverter = inverter(20, 3);
        for inverters in 1..=4 {
            for dcdbs in 1..=6 {
                let layout = CentralLayout::new(inverters, Some(dcdbs), None)?;
                for strings in 0..=150 {
                    let allocation = DcdbAllocation::allocate(strings, &layout, &inverter)?;
                    let capacity = allocation.strings_per_dcdb * allocation.total_dcdb_in_system;

                    assert!(capacity >= strings);
                    assert!(capacity < strings + allocation.total_dcdb_in_system);
                    assert_eq!(
                        allocation.is_valid,
                        allocation.strings_per_dcdb <= allocation.dcdb_slot_capacity
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn no_strings_means_no_load() -> Result<(), AllocationError> {
        let layout = CentralLayout::new(1, Some(2), None)?;
        let allocation = DcdbAllocation::allocate(0, &layout, &inverter(20, 2))?;

        assert_eq!(allocation.strings_per_dcdb, 0);
        assert_eq!(allocation.strings_per_mppt, 0);
        assert!(allocation.is_valid);
        assert_relative_eq!(allocation.mppt_utilization_percent.unwrap(), 0.0);
        Ok(())
    }

    #[test]
    fn more_channels_than_slots_has_no_utilization() -> Result<(), AllocationError> {
        let layout = CentralLayout::new(5, Some(1), Some(2))?;
        let allocation = DcdbAllocation::allocate(10, &layout, &inverter(20, 4))?;

        // floor(1 × 2 / 4) = 0 strings per MPPT fit physically.
        assert_eq!(allocation.max_strings_per_mppt, 0);
        assert_eq!(allocation.mppt_utilization_percent, None);
        assert_eq!(allocation.strings_per_dcdb, 2);
        assert_eq!(allocation.strings_per_mppt, 1);
        assert!(allocation.is_valid);
        Ok(())
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert_eq!(
            CentralLayout::new(0, None, None),
            Err(AllocationError::Zero {
                field: "total_inverters"
            })
        );
        assert_eq!(
            CentralLayout::new(1, Some(0), None),
            Err(AllocationError::Zero {
                field: "dcdb_per_inverter"
            })
        );
        assert_eq!(
            CentralLayout::new(1, None, Some(0)),
            Err(AllocationError::Zero {
                field: "dcdb_slot_capacity"
            })
        );
    }

    #[test]
    fn huge_layouts_overflow_cleanly() -> Result<(), AllocationError> {
        let layout = CentralLayout::new(u32::MAX, Some(2), None)?;
        assert_eq!(
            DcdbAllocation::allocate(10, &layout, &inverter(20, 2)),
            Err(AllocationError::Overflow {
                quantity: "total_dcdb_in_system"
            })
        );
        Ok(())
    }
}
