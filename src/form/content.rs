//! Content objects a wizard edits

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The object a wizard's steps read from and write to.
///
/// Storage belongs to the implementor; the wizard only queries and sets
/// attributes by field name.
pub trait Content: Send + Sync {
    /// Stored value for an attribute, `None` when it is missing
    fn query(&self, name: &str) -> Option<&Value>;

    /// Store a value for an attribute
    fn set(&mut self, name: &str, value: Value);

    /// Drop a stored value so the attribute reads as missing again
    fn remove(&mut self, name: &str);

    /// Whether the attribute holds a usable value (`null` counts as missing)
    fn is_present(&self, name: &str) -> bool {
        self.query(name).is_some_and(|v| !v.is_null())
    }
}

/// Simple map-backed content object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used when seeding records
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Content for Record {
    fn query(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }
}
