//! Wizard steps: one page of a wizard with its own fields and commit logic

pub mod registry;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::form::{Changes, Content, Data, FieldError, Fields, Notifier, ObjectModified, Submission};

pub use registry::{StepFactory, StepRegistry};

/// Outcome message of the last commit on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Errors,
    Updated,
    NoChanges,
}

impl FormStatus {
    pub fn message(&self) -> &'static str {
        match self {
            FormStatus::Errors => "There were some errors.",
            FormStatus::Updated => "Data successfully updated.",
            FormStatus::NoChanges => "No changes were applied.",
        }
    }
}

/// Per-step options that registration and configuration can change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSettings {
    pub label: String,
    /// Sort key inside the wizard, ties keep registration order
    pub weight: i32,
    /// Unavailable steps are dropped from the sequence entirely
    pub available: bool,
    /// Invisible steps stay navigable but are left out of the menu
    pub visible: bool,
    pub handle_apply_on_back: bool,
    pub handle_apply_on_next: bool,
    pub handle_apply_on_complete: bool,
    /// Offer a step-local Apply action that commits without navigating
    pub apply_button: bool,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            label: String::new(),
            weight: 0,
            available: true,
            visible: true,
            handle_apply_on_back: false,
            handle_apply_on_next: true,
            handle_apply_on_complete: true,
            apply_button: false,
        }
    }
}

/// Caller-supplied step logic.
///
/// Every method has a default that defers to the step's [`Fields`]; override
/// only what differs, e.g. a completion rule spanning several attributes.
pub trait StepBehavior: Send + Sync {
    fn is_completed(&self, fields: &Fields, content: &dyn Content) -> bool {
        fields.required_present(content)
    }

    fn extract(&self, fields: &Fields, submitted: &Submission) -> (Data, Vec<FieldError>) {
        fields.extract(submitted)
    }

    fn apply_changes(&self, fields: &Fields, content: &mut dyn Content, data: &Data) -> Changes {
        fields.apply_changes(content, data)
    }
}

/// Behavior that relies entirely on field definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldsOnly;

impl StepBehavior for FieldsOnly {}

/// What a step needs from the wizard while committing
pub struct StepContext<'a> {
    pub content: &'a mut dyn Content,
    pub submission: &'a Submission,
    pub notifier: &'a Notifier,
    pub content_url: &'a str,
}

/// One page of a wizard
#[derive(Clone)]
pub struct Step {
    name: String,
    settings: StepSettings,
    fields: Fields,
    behavior: Arc<dyn StepBehavior>,
    status: Option<FormStatus>,
    errors: Vec<FieldError>,
}

impl Step {
    pub fn new(label: &str, fields: impl Into<Fields>) -> Self {
        Self {
            name: String::new(),
            settings: StepSettings {
                label: label.to_string(),
                ..StepSettings::default()
            },
            fields: fields.into(),
            behavior: Arc::new(FieldsOnly),
            status: None,
            errors: Vec::new(),
        }
    }

    /// A step that never shows up in the sequence, used to switch one off
    pub fn unavailable(label: &str) -> Self {
        Self::new(label, Fields::default()).available(false)
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.settings.weight = weight;
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.settings.available = available;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.settings.visible = visible;
        self
    }

    pub fn apply_on_back(mut self, apply: bool) -> Self {
        self.settings.handle_apply_on_back = apply;
        self
    }

    pub fn apply_on_next(mut self, apply: bool) -> Self {
        self.settings.handle_apply_on_next = apply;
        self
    }

    pub fn apply_on_complete(mut self, apply: bool) -> Self {
        self.settings.handle_apply_on_complete = apply;
        self
    }

    /// Edit step: offer the Apply action
    pub fn with_apply_button(mut self) -> Self {
        self.settings.apply_button = true;
        self
    }

    pub fn with_behavior(mut self, behavior: Arc<dyn StepBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub(crate) fn settings_mut(&mut self) -> &mut StepSettings {
        &mut self.settings
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.settings.label
    }

    pub fn settings(&self) -> &StepSettings {
        &self.settings
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn is_available(&self) -> bool {
        self.settings.available
    }

    pub fn is_visible(&self) -> bool {
        self.settings.visible
    }

    pub fn status(&self) -> Option<FormStatus> {
        self.status
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn completed(&self, content: &dyn Content) -> bool {
        self.behavior.is_completed(&self.fields, content)
    }

    /// Apply accepted changes and announce them to listeners
    pub fn apply_changes(&self, cx: &mut StepContext<'_>, data: &Data) -> Changes {
        let changes = self
            .behavior
            .apply_changes(&self.fields, &mut *cx.content, data);
        if !changes.is_empty() {
            cx.notifier
                .notify(&ObjectModified::new(cx.content_url, &changes));
        }
        changes
    }

    /// Extract submitted data and commit it. Returns true on success.
    pub fn do_handle_apply(&mut self, cx: &mut StepContext<'_>) -> bool {
        let (data, errors) = self.behavior.extract(&self.fields, cx.submission);
        if !errors.is_empty() {
            tracing::debug!(step = %self.name, errors = errors.len(), "step data rejected");
            self.status = Some(FormStatus::Errors);
            self.errors = errors;
            return false;
        }

        self.errors.clear();
        let changes = self.apply_changes(cx, &data);
        self.status = Some(if changes.is_empty() {
            FormStatus::NoChanges
        } else {
            FormStatus::Updated
        });
        true
    }

    pub fn do_back(&mut self, cx: &mut StepContext<'_>) -> bool {
        if self.settings.handle_apply_on_back {
            return self.do_handle_apply(cx);
        }
        true
    }

    pub fn do_next(&mut self, cx: &mut StepContext<'_>) -> bool {
        if self.settings.handle_apply_on_next {
            return self.do_handle_apply(cx);
        }
        true
    }

    pub fn do_complete(&mut self, cx: &mut StepContext<'_>) -> bool {
        if self.settings.handle_apply_on_complete {
            return self.do_handle_apply(cx);
        }
        true
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("settings", &self.settings)
            .field("fields", &self.fields.len())
            .field("status", &self.status)
            .finish()
    }
}
