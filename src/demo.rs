//! Built-in demo wizard used by the binary and the integration tests.
//!
//! `person` collects a name, a postal address and a final review. A retired
//! `legacy` step stays registered but unavailable.

use std::sync::Arc;

use crate::config::WizardConfig;
use crate::error::WizardError;
use crate::form::{Content, Field, FieldKind, Fields, ModificationListener, ObjectModified};
use crate::registry::{WizardDefinition, WizardHooks, WizardRegistry};
use crate::step::{Step, StepRegistry};

pub const PERSON_WIZARD: &str = "person";

/// Attribute stamped on the content once the wizard finishes
pub const COMPLETED_AT: &str = "completed_at";

/// Confirmation page shown after the wizard completes
pub const CONFIRMATION_PAGE: &str = "confirmation";

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Stamps the completion time on the content
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionStamp;

impl WizardHooks for CompletionStamp {
    fn on_finish(&self, content: &mut dyn Content) {
        content.set(COMPLETED_AT, chrono::Utc::now().to_rfc3339().into());
    }
}

/// Logs every committed change
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeLog;

impl ModificationListener for ChangeLog {
    fn object_modified(&self, event: &ObjectModified) {
        tracing::info!(
            content = %event.content_url,
            attributes = ?event.attribute_names(),
            "content modified"
        );
    }
}

fn person_steps() -> Result<StepRegistry, WizardError> {
    let mut steps = StepRegistry::new();

    // registered ahead of the others; its weight still sorts it last
    steps.register("review", |_, _, wizard| {
        let label = if wizard.settings().confirmation_page_name.is_some() {
            "Review and confirm"
        } else {
            "Review"
        };
        Step::new(label, Vec::<Field>::new()).weight(100)
    })?;

    let person_fields = Fields::new(vec![
        Field::text("first_name").label("First name").required(),
        Field::text("last_name").label("Last name").required(),
        Field::text("email")
            .label("E-mail")
            .pattern(EMAIL_PATTERN)?
            .schema("contact"),
        Field::new("title", FieldKind::Enum)
            .label("Title")
            .options(&["mr", "ms", "dr"]),
    ]);
    steps.register("person", move |_, _, _| {
        Step::new("Personal data", person_fields.clone())
    })?;

    steps.register("address", |_, _, _| {
        Step::new(
            "Address",
            vec![
                Field::text("street").label("Street").required().schema("address"),
                Field::text("city").label("City").required().schema("address"),
                Field::text("zip")
                    .label("Postal code")
                    .max_length(10)
                    .schema("address"),
            ],
        )
        .weight(10)
    })?;

    steps.register("legacy", |_, _, _| Step::unavailable("Legacy questionnaire"))?;

    Ok(steps)
}

/// The `person` wizard with its demo defaults
pub fn person_wizard() -> Result<WizardDefinition, WizardError> {
    let settings = WizardConfig {
        confirmation_page_name: Some(CONFIRMATION_PAGE.to_string()),
        ..WizardConfig::default()
    };
    let mut definition = WizardDefinition::new(PERSON_WIZARD, person_steps()?)
        .with_settings(settings)?
        .with_hooks(Arc::new(CompletionStamp));
    definition.subscribe(Arc::new(ChangeLog));
    Ok(definition)
}

/// Registry holding every demo wizard
pub fn demo_registry() -> Result<WizardRegistry, WizardError> {
    let mut registry = WizardRegistry::new();
    registry.register(person_wizard()?)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Record;
    use crate::wizard::{Outcome, WizardAction, WizardRequest};
    use serde_json::json;

    const APP: &str = "http://localhost:7010";

    fn step_names(definition: &WizardDefinition) -> Vec<String> {
        let mut record = Record::new();
        let request = WizardRequest::new(APP, "/content/1");
        definition
            .wizard(&mut record, &request)
            .steps()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    #[test]
    fn test_person_wizard_sequence() {
        let definition = person_wizard().unwrap();
        assert_eq!(step_names(&definition), vec!["person", "address", "review"]);
        assert_eq!(
            definition.steps().names(),
            vec!["review", "person", "address", "legacy"]
        );
    }

    #[test]
    fn test_demo_registry() {
        let registry = demo_registry().unwrap();
        assert_eq!(registry.names(), vec![PERSON_WIZARD]);
        assert_eq!(registry.get(PERSON_WIZARD).unwrap().notifier().listener_count(), 1);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let definition = person_wizard().unwrap();
        let mut record = Record::new();
        let data = json!({"first_name": "Ada", "last_name": "Lovelace", "email": "nope"});
        let request = WizardRequest::new(APP, "/content/1")
            .step("person")
            .action(WizardAction::Next)
            .data(data.as_object().unwrap().clone());

        let outcome = definition.wizard(&mut record, &request).process().unwrap();
        let Outcome::Render(view) = outcome else {
            panic!("expected the step to render");
        };
        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "email");
        assert!(record.is_empty());
    }

    #[test]
    fn test_finish_stamps_completion() {
        let definition = person_wizard().unwrap();
        let mut record = Record::new()
            .with("first_name", "Ada")
            .with("last_name", "Lovelace")
            .with("street", "1 Analytical Row")
            .with("city", "London");
        let request = WizardRequest::new(APP, "/content/1")
            .step("review")
            .action(WizardAction::Complete);

        let outcome = definition.wizard(&mut record, &request).process().unwrap();
        assert_eq!(
            outcome.redirect_url(),
            Some("http://localhost:7010/content/1/confirmation")
        );
        assert!(record.is_present(COMPLETED_AT));
    }
}
