use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw catalog entry for a module or an inverter.
///
/// Keys are whatever the source catalog used. Values are kept as loosely
/// typed JSON values until a resolver reads them, so the record can be
/// deserialized from any self-describing format.
///
/// # Example
///
/// ```
/// use stringwise_components::CatalogRecord;
///
/// let record = CatalogRecord::new()
///     .with("voc_v", 48.2)
///     .with("vmp", "40.5");
///
/// assert_eq!(record.len(), 2);
/// assert!(record.get("voc_v").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRecord(Map<String, Value>);

impl CatalogRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CatalogRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for CatalogRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
