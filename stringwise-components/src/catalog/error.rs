use thiserror::Error;

use super::RecordKind;

/// A catalog record that cannot be turned into usable parameters.
///
/// These are hard failures: proceeding would produce meaningless sizing.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// A field is present but does not hold a finite number.
    #[error("{record} field `{key}` is not numeric (found {found})")]
    NonNumeric {
        record: RecordKind,
        key: &'static str,
        found: String,
    },

    /// A field that must be positive holds a negative number.
    #[error("{record} field `{key}` must be positive (found {value})")]
    Negative {
        record: RecordKind,
        key: &'static str,
        value: f64,
    },

    /// A field that counts physical things holds a fractional number.
    #[error("{record} field `{key}` must be a whole number (found {value})")]
    NotACount {
        record: RecordKind,
        key: &'static str,
        value: f64,
    },

    /// No alias of a required field is present and defaulting is not allowed.
    #[error("{record} record is missing `{field}` (looked for {aliases:?})")]
    MissingField {
        record: RecordKind,
        field: &'static str,
        aliases: Vec<&'static str>,
    },

    /// The inverter's MPPT window is empty.
    #[error("inverter MPPT window is inverted ({min_v} V > {max_v} V)")]
    InvertedMpptWindow { min_v: f64, max_v: f64 },
}
