//! DC string sizing for photovoltaic arrays.
//!
//! The engine is a one-way pipeline of pure calculations:
//!
//! 1. [`catalog`]: raw module and inverter records with inconsistent field
//!    names are resolved into typed parameters, with per-field provenance.
//! 2. [`thermal`]: module voltages are projected to the site's coldest and
//!    hottest design temperatures.
//! 3. [`string_length`]: the number of modules per string is chosen from the
//!    safety ceiling, the MPPT window and a practical ceiling.
//! 4. [`string_count`]: the target capacity is converted into modules and
//!    strings.
//! 5. [`dcdb`]: for central inverters, strings are distributed across
//!    combiner boxes (DCDBs) and MPPT channels.
//! 6. [`sizing`]: everything above is packaged into one result, exposed both
//!    as free functions and as [`Component`](stringwise_core::Component)s.
//!
//! Nothing here performs I/O, logs, or caches. Identical inputs always
//! produce identical outputs.

pub mod catalog;
pub mod dcdb;
pub mod sizing;
pub mod string_count;
pub mod string_length;
pub mod thermal;

pub use catalog::{
    CatalogError, CatalogRecord, DataQualityIssue, InverterElectricalParameters,
    ModuleElectricalParameters, ResolutionPolicy, TemperatureCoefficient,
};
pub use dcdb::{Advisory, AllocationError, CentralLayout, DcdbAllocation, MpptCurrentCheck};
pub use sizing::{
    CentralInverterSizing, CentralSizingRequest, CentralSizingResult, ErrorKind, SizingError,
    SizingOptions, SizingRequest, StringSizing, StringSizingResult, size_central, size_strings,
};
pub use string_count::{CapacityError, CapacityReport, StringCount, TargetCapacity};
pub use string_length::{StringLength, StringLengthBounds, StringLengthError};
pub use thermal::{
    CorrectedVoltages, SiteThermalEnvironment, ThermalError, VmpCoefficient,
    correct_for_temperature,
};
