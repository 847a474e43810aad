//! Object-modified notifications emitted after a step commits changes

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

/// Changed attribute names grouped by their declaring schema
pub type Changes = BTreeMap<String, Vec<String>>;

/// Attribute names changed within one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attributes {
    pub schema: String,
    pub names: Vec<String>,
}

/// Event sent when a step applied changes to its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectModified {
    /// Absolute URL of the modified content object
    pub content_url: String,
    pub descriptions: Vec<Attributes>,
}

impl ObjectModified {
    pub fn new(content_url: &str, changes: &Changes) -> Self {
        Self {
            content_url: content_url.to_string(),
            descriptions: changes
                .iter()
                .map(|(schema, names)| Attributes {
                    schema: schema.clone(),
                    names: names.clone(),
                })
                .collect(),
        }
    }

    /// All changed attribute names across schemas
    pub fn attribute_names(&self) -> Vec<&str> {
        self.descriptions
            .iter()
            .flat_map(|d| d.names.iter().map(String::as_str))
            .collect()
    }
}

/// Receiver of object-modified events
pub trait ModificationListener: Send + Sync {
    fn object_modified(&self, event: &ObjectModified);
}

/// Fan-out of modification events to subscribed listeners
#[derive(Clone, Default)]
pub struct Notifier {
    listeners: Vec<Arc<dyn ModificationListener>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn ModificationListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify(&self, event: &ObjectModified) {
        tracing::debug!(
            content = %event.content_url,
            attributes = ?event.attribute_names(),
            "object modified"
        );
        for listener in &self.listeners {
            listener.object_modified(event);
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
