//! API state management for the REST server.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::form::Record;
use crate::registry::WizardRegistry;
use crate::wizard::WizardRequest;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Wizards served by this instance
    pub registry: Arc<WizardRegistry>,
    /// In-memory content objects keyed by id
    pub store: Arc<RwLock<HashMap<String, Record>>>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(config: Config, registry: WizardRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            store: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    /// Path of a content object below the application URL
    pub fn content_path(id: &str) -> String {
        format!("/content/{}", id)
    }

    /// Wizard request for a content object, addressed from the public URL
    pub fn request(&self, id: &str) -> WizardRequest {
        WizardRequest::new(&self.config.server.public_url(), &Self::content_path(id))
    }

    /// Snapshot of a stored content object
    pub async fn content(&self, id: &str) -> Option<Record> {
        self.store.read().await.get(id).cloned()
    }
}
