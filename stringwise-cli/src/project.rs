//! TOML project files.
//!
//! A project names a site, a target capacity, raw module and inverter catalog
//! records, and optionally a central-inverter layout:
//!
//! ```toml
//! [site]
//! lowest_temperature_c = -5.0
//! highest_temperature_c = 45.0
//!
//! [target]
//! capacity_kw = 100.0
//!
//! [options]
//! policy = "strict"
//! vmp_coefficient = "dedicated"
//! max_dc_voltage_v = 1000.0
//!
//! [central]
//! total_inverters = 1
//! dcdb_per_inverter = 2
//! dcdb_slot_capacity = 16
//!
//! [module]
//! voc_v = 48.2
//!
//! [inverter]
//! min_mpp_voltage_v = 200
//! ```

use serde::Deserialize;
use stringwise_components::{
    AllocationError, CapacityError, CatalogRecord, CentralLayout, CentralSizingRequest,
    ResolutionPolicy, SiteThermalEnvironment, SizingOptions, SizingRequest, TargetCapacity,
    ThermalError, VmpCoefficient,
};
use stringwise_core::constraint::StrictlyPositive;
use thiserror::Error;
use uom::si::{electric_potential::volt, f64::ElectricPotential};

/// A project file as written by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub site: SiteSection,
    pub target: TargetSection,
    #[serde(default)]
    pub options: OptionsSection,
    pub central: Option<CentralSection>,
    #[serde(default)]
    pub module: CatalogRecord,
    #[serde(default)]
    pub inverter: CatalogRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    pub lowest_temperature_c: f64,
    pub highest_temperature_c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    pub capacity_kw: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OptionsSection {
    pub policy: ResolutionPolicy,
    pub vmp_coefficient: VmpCoefficient,
    pub max_dc_voltage_v: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CentralSection {
    pub total_inverters: u32,
    pub dcdb_per_inverter: Option<u32>,
    pub dcdb_slot_capacity: Option<u32>,
}

/// Errors raised while turning a project file into a sizing request.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project file is not valid TOML")]
    Parse(#[from] toml::de::Error),
    #[error("[site] is invalid")]
    Site(#[from] ThermalError),
    #[error("[target] is invalid")]
    Target(#[from] CapacityError),
    #[error("[central] is invalid")]
    Layout(#[from] AllocationError),
    #[error("max_dc_voltage_v must be positive and finite, got {0}")]
    DcVoltageOverride(f64),
}

/// The engine call a project asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Strings(SizingRequest),
    Central(CentralSizingRequest),
}

impl Project {
    /// Parses a project from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Parse`] for malformed TOML or unknown sections.
    pub fn from_toml_str(text: &str) -> Result<Self, ProjectError> {
        Ok(toml::from_str(text)?)
    }

    /// Validates the project and builds the request for the engine.
    ///
    /// # Errors
    ///
    /// Returns a [`ProjectError`] if the site, target, override or layout is
    /// out of range. Catalog records are checked later, by the engine.
    pub fn job(&self) -> Result<Job, ProjectError> {
        let request = SizingRequest {
            module: self.module.clone(),
            inverter: self.inverter.clone(),
            site: SiteThermalEnvironment::from_celsius(
                self.site.lowest_temperature_c,
                self.site.highest_temperature_c,
            )?,
            target: TargetCapacity::from_kilowatts(self.target.capacity_kw)?,
            options: self.options.to_sizing_options()?,
        };

        let Some(central) = self.central else {
            return Ok(Job::Strings(request));
        };

        Ok(Job::Central(CentralSizingRequest {
            sizing: request,
            layout: CentralLayout::new(
                central.total_inverters,
                central.dcdb_per_inverter,
                central.dcdb_slot_capacity,
            )?,
        }))
    }
}

impl OptionsSection {
    fn to_sizing_options(self) -> Result<SizingOptions, ProjectError> {
        let max_dc_voltage_override = self
            .max_dc_voltage_v
            .map(|v| {
                if !v.is_finite() {
                    return Err(ProjectError::DcVoltageOverride(v));
                }
                StrictlyPositive::new(ElectricPotential::new::<volt>(v))
                    .map_err(|_| ProjectError::DcVoltageOverride(v))
            })
            .transpose()?;

        Ok(SizingOptions {
            policy: self.policy,
            vmp_coefficient: self.vmp_coefficient,
            max_dc_voltage_override,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::power::kilowatt;

    use super::*;

    const STRING_PROJECT: &str = r#"
        [site]
        lowest_temperature_c = -5.0
        highest_temperature_c = 45.0

        [target]
        capacity_kw = 100.0

        [module]
        voc_v = 48.2
        vmp_v = "40.5"

        [inverter]
        min_mpp_voltage_v = 200
        max_mpp_voltage_v = 850
    "#;

    #[test]
    fn string_project_without_options() -> Result<(), ProjectError> {
        let project = Project::from_toml_str(STRING_PROJECT)?;
        assert_eq!(project.options, OptionsSection::default());
        assert_eq!(project.module.len(), 2);

        let Job::Strings(request) = project.job()? else {
            panic!("expected a string-inverter job");
        };
        assert_relative_eq!(request.target.power().get::<kilowatt>(), 100.0);
        assert_eq!(request.options, SizingOptions::default());
        Ok(())
    }

    #[test]
    fn central_section_selects_central_job() -> Result<(), ProjectError> {
        let text = format!(
            "{STRING_PROJECT}
            [central]
            total_inverters = 2
            dcdb_slot_capacity = 24
            "
        );

        let Job::Central(request) = Project::from_toml_str(&text)?.job()? else {
            panic!("expected a central-inverter job");
        };
        assert_eq!(request.layout.total_inverters.get(), 2);
        assert_eq!(request.layout.dcdb_per_inverter, None);
        assert_eq!(request.layout.dcdb_slot_capacity.map(|n| n.get()), Some(24));
        Ok(())
    }

    #[test]
    fn options_are_read() -> Result<(), ProjectError> {
        let text = format!(
            "{STRING_PROJECT}
            [options]
            policy = \"strict\"
            vmp_coefficient = \"dedicated\"
            max_dc_voltage_v = 1500.0
            "
        );

        let options = Project::from_toml_str(&text)?.options.to_sizing_options()?;
        assert_eq!(options.policy, ResolutionPolicy::Strict);
        assert_eq!(options.vmp_coefficient, VmpCoefficient::DedicatedWhenAvailable);
        assert_relative_eq!(
            options.max_dc_voltage_override.unwrap().get().get::<volt>(),
            1500.0
        );
        Ok(())
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let text = format!("{STRING_PROJECT}\n[weather]\nsource = \"tmy\"\n");
        assert!(matches!(
            Project::from_toml_str(&text),
            Err(ProjectError::Parse(_))
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() -> Result<(), ProjectError> {
        let mut project = Project::from_toml_str(STRING_PROJECT)?;
        project.site.lowest_temperature_c = 50.0;
        assert!(matches!(project.job(), Err(ProjectError::Site(_))));

        let mut project = Project::from_toml_str(STRING_PROJECT)?;
        project.target.capacity_kw = 0.0;
        assert!(matches!(project.job(), Err(ProjectError::Target(_))));

        let mut project = Project::from_toml_str(STRING_PROJECT)?;
        project.options.max_dc_voltage_v = Some(-1.0);
        assert!(matches!(
            project.job(),
            Err(ProjectError::DcVoltageOverride(_))
        ));

        let mut project = Project::from_toml_str(STRING_PROJECT)?;
        project.central = Some(CentralSection {
            total_inverters: 0,
            dcdb_per_inverter: None,
            dcdb_slot_capacity: None,
        });
        assert!(matches!(project.job(), Err(ProjectError::Layout(_))));
        Ok(())
    }
}
