//! Field schemas, submitted-data extraction and change application
//!
//! A step owns a [`Fields`] collection. The wizard never inspects values
//! itself; it asks the fields whether required values are present, extracts
//! submitted data with per-field errors and applies accepted data to the
//! bound [`Content`].

pub mod content;
pub mod events;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::WizardError;

pub use content::{Content, Record};
pub use events::{Attributes, Changes, ModificationListener, Notifier, ObjectModified};

/// Raw submitted form values keyed by field name
pub type Submission = Map<String, Value>;

/// Extracted values; `None` marks a field submitted as missing
pub type Data = BTreeMap<String, Option<Value>>;

/// Schema name used when a field does not declare one
pub const DEFAULT_SCHEMA: &str = "default";

/// Types of fields a step can declare
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input
    #[default]
    String,
    /// Multi-line text input
    Text,
    /// Whole number
    Int,
    /// True/false checkbox
    Bool,
    /// Selection from predefined options
    Enum,
    /// Date field (YYYY-MM-DD format)
    Date,
}

/// Definition of a single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field identifier, also the attribute name on the content
    pub name: String,
    /// Human-readable label
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    /// Whether this field must hold a value for the step to be completed
    #[serde(default)]
    pub required: bool,
    /// Schema declaring this attribute, used to group change notifications
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Options for enum fields
    #[serde(default)]
    pub options: Vec<String>,
    /// Maximum length for string fields
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Regular expression string values must match
    #[serde(default)]
    pub pattern: Option<Pattern>,
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// Compiled field pattern, (de)serialized as its source string
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.0.is_match(s)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Validation failure for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl Field {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            kind,
            required: false,
            schema: default_schema(),
            options: Vec::new(),
            max_length: None,
            pattern: None,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = schema.to_string();
        self
    }

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| (*o).to_string()).collect();
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Attach a pattern, compiled once here so a bad expression fails at
    /// registration instead of on every submission
    pub fn pattern(mut self, pattern: &str) -> Result<Self, WizardError> {
        let compiled = Pattern::new(pattern).map_err(|e| WizardError::InvalidPattern {
            field: self.name.clone(),
            message: e.to_string(),
        })?;
        self.pattern = Some(compiled);
        Ok(self)
    }

    /// Convert one submitted value into the stored representation.
    ///
    /// `Ok(None)` means the value is missing (absent, `null` or blank).
    pub fn parse(&self, raw: Option<&Value>) -> Result<Option<Value>, String> {
        let raw = match raw {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(v) => v,
        };

        match self.kind {
            FieldKind::String | FieldKind::Text => {
                let s = as_text(raw)?;
                self.check_text(&s)?;
                Ok(Some(Value::String(s)))
            }
            FieldKind::Int => match raw {
                Value::Number(n) if n.is_i64() => Ok(Some(raw.clone())),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(|n| Some(Value::from(n)))
                    .map_err(|_| "Not a whole number.".to_string()),
                _ => Err("Not a whole number.".to_string()),
            },
            FieldKind::Bool => match raw {
                Value::Bool(b) => Ok(Some(Value::Bool(*b))),
                Value::String(s) => match s.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => Ok(Some(Value::Bool(true))),
                    "false" | "no" | "off" | "0" => Ok(Some(Value::Bool(false))),
                    _ => Err("Not a yes/no value.".to_string()),
                },
                _ => Err("Not a yes/no value.".to_string()),
            },
            FieldKind::Enum => {
                let s = as_text(raw)?;
                if self.options.iter().any(|o| o == &s) {
                    Ok(Some(Value::String(s)))
                } else {
                    Err(format!("'{}' is not one of: {}", s, self.options.join(", ")))
                }
            }
            FieldKind::Date => {
                let s = as_text(raw)?;
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map(|d| Some(Value::String(d.format("%Y-%m-%d").to_string())))
                    .map_err(|_| "Expected a date as YYYY-MM-DD.".to_string())
            }
        }
    }

    fn check_text(&self, s: &str) -> Result<(), String> {
        if let Some(max) = self.max_length {
            if s.chars().count() > max {
                return Err(format!("Value is too long (maximum {} characters).", max));
            }
        }
        if let Some(ref pattern) = self.pattern {
            if !pattern.is_match(s) {
                return Err("Value does not match the expected format.".to_string());
            }
        }
        Ok(())
    }
}

fn as_text(raw: &Value) -> Result<String, String> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err("Expected a text value.".to_string()),
    }
}

/// Ordered collection of fields belonging to one step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fields(Vec<Field>);

impl Fields {
    pub fn new(fields: Vec<Field>) -> Self {
        Self(fields)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every required field holds a non-missing value in `content`
    pub fn required_present(&self, content: &dyn Content) -> bool {
        self.0
            .iter()
            .filter(|f| f.required)
            .all(|f| content.is_present(&f.name))
    }

    /// Extract submitted values, collecting one error per failing field
    pub fn extract(&self, submitted: &Submission) -> (Data, Vec<FieldError>) {
        let mut data = Data::new();
        let mut errors = Vec::new();

        for field in &self.0 {
            match field.parse(submitted.get(&field.name)) {
                Ok(None) if field.required => {
                    errors.push(FieldError::new(&field.name, "Required input is missing."));
                }
                Ok(value) => {
                    data.insert(field.name.clone(), value);
                }
                Err(message) => errors.push(FieldError::new(&field.name, message)),
            }
        }

        (data, errors)
    }

    /// Write extracted data to `content`, returning what actually changed
    pub fn apply_changes(&self, content: &mut dyn Content, data: &Data) -> Changes {
        let mut changes = Changes::new();

        for field in &self.0 {
            let Some(new_value) = data.get(&field.name) else {
                continue;
            };
            let current = content.query(&field.name).filter(|v| !v.is_null());
            if current == new_value.as_ref() {
                continue;
            }

            match new_value {
                Some(value) => content.set(&field.name, value.clone()),
                None => content.remove(&field.name),
            }
            changes
                .entry(field.schema.clone())
                .or_default()
                .push(field.name.clone());
        }

        changes
    }

    /// Current stored values for all fields, for view projection
    pub fn values(&self, content: &dyn Content) -> Map<String, Value> {
        self.0
            .iter()
            .filter_map(|f| content.query(&f.name).map(|v| (f.name.clone(), v.clone())))
            .collect()
    }
}

impl From<Vec<Field>> for Fields {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}
