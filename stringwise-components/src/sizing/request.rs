use serde::Serialize;
use uom::si::f64::ElectricPotential;

use crate::{
    catalog::{CatalogRecord, Positive, ResolutionPolicy},
    dcdb::CentralLayout,
    string_count::TargetCapacity,
    thermal::{SiteThermalEnvironment, VmpCoefficient},
};

/// Choices that change how a request is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SizingOptions {
    pub policy: ResolutionPolicy,
    pub vmp_coefficient: VmpCoefficient,
    /// Replaces the inverter's DC voltage ceiling in the safety bound.
    pub max_dc_voltage_override: Option<Positive<ElectricPotential>>,
}

/// Everything needed to size strings for one module and inverter pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingRequest {
    pub module: CatalogRecord,
    pub inverter: CatalogRecord,
    pub site: SiteThermalEnvironment,
    pub target: TargetCapacity,
    pub options: SizingOptions,
}

/// A [`SizingRequest`] for a central-inverter plant.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralSizingRequest {
    pub sizing: SizingRequest,
    pub layout: CentralLayout,
}
