//! Registration table mapping step names to factories

use std::sync::Arc;

use crate::config::StepOverrides;
use crate::error::WizardError;
use crate::form::Content;
use crate::registry::WizardDefinition;
use crate::step::Step;
use crate::wizard::WizardRequest;

/// Builds a fresh step for one request, seeing the content, the request and
/// the wizard that owns the step
pub type StepFactory =
    Arc<dyn Fn(&dyn Content, &WizardRequest, &WizardDefinition) -> Step + Send + Sync>;

struct StepEntry {
    name: String,
    factory: StepFactory,
    overrides: Option<StepOverrides>,
}

/// Step providers of one wizard, in registration order
#[derive(Default)]
pub struct StepRegistry {
    entries: Vec<StepEntry>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a unique name
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), WizardError>
    where
        F: Fn(&dyn Content, &WizardRequest, &WizardDefinition) -> Step + Send + Sync + 'static,
    {
        if self.contains(name) {
            return Err(WizardError::DuplicateStep(name.to_string()));
        }
        self.entries.push(StepEntry {
            name: name.to_string(),
            factory: Arc::new(factory),
            overrides: None,
        });
        Ok(())
    }

    /// Builder-style registration of a step that needs nothing from the request
    pub fn with_step(mut self, name: &str, step: Step) -> Result<Self, WizardError> {
        self.register(name, move |_, _, _| step.clone())?;
        Ok(self)
    }

    /// Attach configuration overrides to a registered step
    pub fn set_overrides(&mut self, name: &str, overrides: StepOverrides) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.overrides = Some(overrides);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Construct every registered step for this request, paired with its name
    pub fn discover(
        &self,
        content: &dyn Content,
        request: &WizardRequest,
        wizard: &WizardDefinition,
    ) -> Vec<(String, Step)> {
        self.entries
            .iter()
            .map(|entry| {
                let mut step = (entry.factory)(content, request, wizard);
                if let Some(ref overrides) = entry.overrides {
                    overrides.apply_to(step.settings_mut());
                }
                (entry.name.clone(), step)
            })
            .collect()
    }
}
