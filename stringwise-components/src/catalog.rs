//! Catalog records and their resolution into typed electrical parameters.
//!
//! Module and inverter datasheets come from several catalog sources that
//! never agreed on field names. Each logical field is looked up through an
//! ordered list of known aliases. When none is present, an industry-typical
//! default is substituted and the substitution is recorded, so callers can
//! tell measured values from assumed ones. [`ResolutionPolicy::Strict`] turns
//! any substitution into an error instead.

mod coefficient;
mod error;
mod field;
mod inverter;
mod module;
mod record;

use serde::{Deserialize, Serialize};
use stringwise_core::constraint::{Constrained, StrictlyPositive};

pub use coefficient::TemperatureCoefficient;
pub use error::CatalogError;
pub use field::{Alias, FieldReport, FieldSpec, Provenance};
pub use inverter::{InverterElectricalParameters, DEFAULT_MAX_DC_VOLTAGE_V};
pub use module::ModuleElectricalParameters;
pub use record::CatalogRecord;

/// A quantity known to be greater than zero.
pub type Positive<Q> = Constrained<Q, StrictlyPositive>;

/// How missing catalog fields are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Substitute the documented default and report a [`DataQualityIssue`].
    #[default]
    Lenient,
    /// Fail with [`CatalogError::MissingField`].
    Strict,
}

/// Which kind of catalog record a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Module,
    Inverter,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Inverter => write!(f, "inverter"),
        }
    }
}

/// A catalog field that was missing and replaced by its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataQualityIssue {
    pub record: RecordKind,
    pub field: &'static str,
    pub assumed: f64,
}

impl std::fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} record has no `{}`; assumed {}",
            self.record, self.field, self.assumed
        )
    }
}

/// Typed parameters together with where each field came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    pub parameters: T,
    pub record: RecordKind,
    pub fields: Vec<FieldReport>,
}

impl<T> Resolved<T> {
    /// Returns one issue per field that fell back to its default.
    pub fn data_quality_issues(&self) -> Vec<DataQualityIssue> {
        self.fields
            .iter()
            .filter_map(|report| match report.provenance {
                Provenance::Defaulted { value } => Some(DataQualityIssue {
                    record: self.record,
                    field: report.field,
                    assumed: value,
                }),
                Provenance::Catalog { .. } | Provenance::Absent => None,
            })
            .collect()
    }

    /// Returns `true` if no field fell back to a default.
    pub fn is_fully_specified(&self) -> bool {
        self.fields
            .iter()
            .all(|report| !matches!(report.provenance, Provenance::Defaulted { .. }))
    }
}
