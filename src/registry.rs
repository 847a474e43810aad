//! Wizard definitions and the application-wide wizard table

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{Config, WizardConfig};
use crate::error::WizardError;
use crate::form::{Content, ModificationListener, Notifier};
use crate::step::StepRegistry;
use crate::url::{RequestUrl, UrlResolver};
use crate::wizard::{Wizard, WizardRequest};

/// Caller-supplied wizard logic
pub trait WizardHooks: Send + Sync {
    /// Runs after the last step completed successfully
    fn on_finish(&self, _content: &mut dyn Content) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl WizardHooks for NoHooks {}

/// Everything needed to build a [`Wizard`] for one request
pub struct WizardDefinition {
    name: String,
    settings: WizardConfig,
    steps: StepRegistry,
    hooks: Arc<dyn WizardHooks>,
    notifier: Notifier,
    url_resolver: Arc<dyn UrlResolver>,
}

impl WizardDefinition {
    pub fn new(name: &str, steps: StepRegistry) -> Self {
        Self {
            name: name.to_string(),
            settings: WizardConfig::default(),
            steps,
            hooks: Arc::new(NoHooks),
            notifier: Notifier::new(),
            url_resolver: Arc::new(RequestUrl),
        }
    }

    /// Replace settings, rejecting overrides for steps that were never registered
    pub fn with_settings(mut self, settings: WizardConfig) -> Result<Self, WizardError> {
        self.configure(settings)?;
        Ok(self)
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn WizardHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_url_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.url_resolver = resolver;
        self
    }

    pub fn subscribe(&mut self, listener: Arc<dyn ModificationListener>) {
        self.notifier.subscribe(listener);
    }

    pub fn configure(&mut self, settings: WizardConfig) -> Result<(), WizardError> {
        if let Some(unknown) = settings.steps.keys().find(|s| !self.steps.contains(s)) {
            return Err(WizardError::UnknownStep {
                wizard: self.name.clone(),
                step: unknown.clone(),
            });
        }
        for (step, overrides) in &settings.steps {
            self.steps.set_overrides(step, overrides.clone());
        }
        self.settings = settings;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &WizardConfig {
        &self.settings
    }

    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    pub fn hooks(&self) -> &dyn WizardHooks {
        self.hooks.as_ref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn url_resolver(&self) -> &dyn UrlResolver {
        self.url_resolver.as_ref()
    }

    /// Bind a wizard to one request
    pub fn wizard<'a>(
        &'a self,
        content: &'a mut dyn Content,
        request: &'a WizardRequest,
    ) -> Wizard<'a> {
        Wizard::new(self, content, request)
    }
}

/// All wizards known to the application, keyed by name
#[derive(Default)]
pub struct WizardRegistry {
    wizards: BTreeMap<String, WizardDefinition>,
}

impl WizardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: WizardDefinition) -> Result<(), WizardError> {
        if self.wizards.contains_key(definition.name()) {
            return Err(WizardError::DuplicateWizard(definition.name().to_string()));
        }
        tracing::debug!(
            wizard = %definition.name(),
            steps = definition.steps().len(),
            "registered wizard"
        );
        self.wizards
            .insert(definition.name().to_string(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&WizardDefinition> {
        self.wizards.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.wizards.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WizardDefinition> {
        self.wizards.values()
    }

    pub fn len(&self) -> usize {
        self.wizards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wizards.is_empty()
    }

    /// Apply `[wizards.<name>]` sections from the configuration
    pub fn apply_config(&mut self, config: &Config) -> Result<(), WizardError> {
        for (name, settings) in &config.wizards {
            let definition = self
                .wizards
                .get_mut(name)
                .ok_or_else(|| WizardError::UnknownWizard(name.clone()))?;
            definition.configure(settings.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepOverrides;
    use crate::form::Fields;
    use crate::step::Step;

    fn two_steps() -> StepRegistry {
        StepRegistry::new()
            .with_step("first", Step::new("First", Fields::default()))
            .unwrap()
            .with_step("second", Step::new("Second", Fields::default()))
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = WizardRegistry::new();
        registry
            .register(WizardDefinition::new("person", two_steps()))
            .unwrap();
        assert_eq!(registry.names(), vec!["person"]);
        assert!(registry.get("person").is_some());
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_register_duplicate_wizard() {
        let mut registry = WizardRegistry::new();
        registry
            .register(WizardDefinition::new("person", two_steps()))
            .unwrap();
        let err = registry
            .register(WizardDefinition::new("person", two_steps()))
            .unwrap_err();
        assert_eq!(err, WizardError::DuplicateWizard("person".to_string()));
    }

    #[test]
    fn test_configure_rejects_unknown_step() {
        let mut settings = WizardConfig::default();
        settings
            .steps
            .insert("ghost".to_string(), StepOverrides::default());

        let err = WizardDefinition::new("person", two_steps())
            .with_settings(settings)
            .err()
            .unwrap();
        assert_eq!(
            err,
            WizardError::UnknownStep {
                wizard: "person".to_string(),
                step: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_apply_config_unknown_wizard() {
        let mut config = Config::default();
        config
            .wizards
            .insert("missing".to_string(), WizardConfig::default());

        let mut registry = WizardRegistry::new();
        let err = registry.apply_config(&config).unwrap_err();
        assert_eq!(err, WizardError::UnknownWizard("missing".to_string()));
    }

    #[test]
    fn test_apply_config_updates_settings() {
        let mut registry = WizardRegistry::new();
        registry
            .register(WizardDefinition::new("person", two_steps()))
            .unwrap();

        let mut config = Config::default();
        let settings = WizardConfig {
            adjust_step: false,
            confirmation_page_name: Some("thanks".to_string()),
            ..WizardConfig::default()
        };
        config.wizards.insert("person".to_string(), settings);
        registry.apply_config(&config).unwrap();

        let definition = registry.get("person").unwrap();
        assert!(!definition.settings().adjust_step);
        assert_eq!(
            definition.settings().confirmation_page_name.as_deref(),
            Some("thanks")
        );
    }
}
