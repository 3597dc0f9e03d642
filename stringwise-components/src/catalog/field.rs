use std::num::NonZeroU32;

use serde::Serialize;
use serde_json::Value;

use super::{CatalogError, CatalogRecord, RecordKind, ResolutionPolicy};

/// One historical spelling of a catalog field.
///
/// `scale` converts the stored value into the field's canonical unit, for
/// sources that reported the same quantity in W rather than kW.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alias {
    pub key: &'static str,
    pub scale: f64,
}

impl Alias {
    /// An alias whose values are already in the canonical unit.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self { key, scale: 1.0 }
    }

    /// An alias whose values must be multiplied by `scale`.
    #[must_use]
    pub const fn scaled(key: &'static str, scale: f64) -> Self {
        Self { key, scale }
    }
}

/// A logical field: its canonical name, aliases in priority order, and an
/// optional default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [Alias],
    pub default: Option<f64>,
    pub positive: bool,
}

impl FieldSpec {
    /// A field whose value must be greater than zero.
    #[must_use]
    pub const fn positive(name: &'static str, aliases: &'static [Alias]) -> Self {
        Self {
            name,
            aliases,
            default: None,
            positive: true,
        }
    }

    /// A field whose value may take either sign.
    #[must_use]
    pub const fn signed(name: &'static str, aliases: &'static [Alias]) -> Self {
        Self {
            name,
            aliases,
            default: None,
            positive: false,
        }
    }

    #[must_use]
    pub const fn or_default(self, default: f64) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    fn alias_keys(&self) -> Vec<&'static str> {
        self.aliases.iter().map(|alias| alias.key).collect()
    }
}

/// Where a resolved field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Read from the record under `key`.
    Catalog { key: &'static str },
    /// Not present; the documented default `value` was used.
    Defaulted { value: f64 },
    /// Not present and optional; no value was used.
    Absent,
}

/// The provenance of one resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldReport {
    pub field: &'static str,
    pub provenance: Provenance,
}

/// Reads fields from one record, recording the provenance of each.
pub(crate) struct FieldResolver<'a> {
    record: &'a CatalogRecord,
    kind: RecordKind,
    policy: ResolutionPolicy,
    fields: Vec<FieldReport>,
}

impl<'a> FieldResolver<'a> {
    pub(crate) fn new(record: &'a CatalogRecord, kind: RecordKind, policy: ResolutionPolicy) -> Self {
        Self {
            record,
            kind,
            policy,
            fields: Vec::new(),
        }
    }

    /// Resolves a field that must end up with a value.
    ///
    /// Falls back to the field's default under the lenient policy.
    pub(crate) fn required(&mut self, spec: &FieldSpec) -> Result<f64, CatalogError> {
        if let Some((key, value)) = self.lookup(spec)? {
            self.report(spec, Provenance::Catalog { key });
            return Ok(value);
        }

        match (self.policy, spec.default) {
            (ResolutionPolicy::Lenient, Some(value)) => {
                self.report(spec, Provenance::Defaulted { value });
                Ok(value)
            }
            (ResolutionPolicy::Strict, _) | (ResolutionPolicy::Lenient, None) => {
                Err(CatalogError::MissingField {
                    record: self.kind,
                    field: spec.name,
                    aliases: spec.alias_keys(),
                })
            }
        }
    }

    /// Resolves a field that has no default and may be left unset.
    pub(crate) fn optional(&mut self, spec: &FieldSpec) -> Result<Option<f64>, CatalogError> {
        match self.lookup(spec)? {
            Some((key, value)) => {
                self.report(spec, Provenance::Catalog { key });
                Ok(Some(value))
            }
            None => {
                self.report(spec, Provenance::Absent);
                Ok(None)
            }
        }
    }

    /// Resolves a required field that counts physical things.
    pub(crate) fn count(&mut self, spec: &FieldSpec) -> Result<NonZeroU32, CatalogError> {
        let value = self.required(spec)?;
        let key = self.last_key(spec);

        if value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(CatalogError::NotACount {
                record: self.kind,
                key,
                value,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = value as u32;

        NonZeroU32::new(whole).ok_or(CatalogError::NotACount {
            record: self.kind,
            key,
            value,
        })
    }

    pub(crate) fn finish(self) -> Vec<FieldReport> {
        self.fields
    }

    /// Finds the first alias holding a usable value.
    ///
    /// `null` and empty strings count as absent, so the next alias is tried.
    /// So does `0` for positive fields; a signed field keeps a stated zero.
    /// Numeric strings are parsed.
    fn lookup(&self, spec: &FieldSpec) -> Result<Option<(&'static str, f64)>, CatalogError> {
        for alias in spec.aliases {
            let Some(raw) = self.record.get(alias.key) else {
                continue;
            };

            let Some(value) = self.read_number(alias.key, raw)? else {
                continue;
            };
            if spec.positive && value == 0.0 {
                continue;
            }

            if spec.positive && value < 0.0 {
                return Err(CatalogError::Negative {
                    record: self.kind,
                    key: alias.key,
                    value,
                });
            }

            return Ok(Some((alias.key, value * alias.scale)));
        }

        Ok(None)
    }

    fn read_number(&self, key: &'static str, raw: &Value) -> Result<Option<f64>, CatalogError> {
        let non_numeric = || CatalogError::NonNumeric {
            record: self.kind,
            key,
            found: raw.to_string(),
        };

        let value = match raw {
            Value::Null => return Ok(None),
            Value::Number(number) => number.as_f64().ok_or_else(non_numeric)?,
            Value::String(text) if text.trim().is_empty() => return Ok(None),
            Value::String(text) => text.trim().parse::<f64>().map_err(|_| non_numeric())?,
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => return Err(non_numeric()),
        };

        if !value.is_finite() {
            return Err(non_numeric());
        }

        Ok(Some(value))
    }

    fn report(&mut self, spec: &FieldSpec, provenance: Provenance) {
        self.fields.push(FieldReport {
            field: spec.name,
            provenance,
        });
    }

    /// The key the most recent report for `spec` was read from.
    fn last_key(&self, spec: &FieldSpec) -> &'static str {
        self.fields
            .iter()
            .rev()
            .find(|report| report.field == spec.name)
            .and_then(|report| match report.provenance {
                Provenance::Catalog { key } => Some(key),
                Provenance::Defaulted { .. } | Provenance::Absent => None,
            })
            .unwrap_or(spec.name)
    }
}
