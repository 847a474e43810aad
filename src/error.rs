//! Error types for wizard resolution, navigation and registration.

use thiserror::Error;

/// Errors raised by the wizard core.
///
/// Validation failures are not errors: they are recorded on the step as a
/// status and never leave the wizard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Path segment does not name a step in the ordered sequence
    #[error("step '{0}' not found")]
    NotFound(String),

    /// An operation needed a first or last step but no step is available
    #[error("wizard '{0}' has no available steps")]
    NoSteps(String),

    /// Boundary or guard computation without a current step
    #[error("no current step selected")]
    NoCurrentStep,

    /// The current step dropped out of the sequence during the request
    #[error("current step '{0}' is not part of the step sequence")]
    StepNotInSequence(String),

    /// Two steps registered under the same name
    #[error("step '{0}' is already registered")]
    DuplicateStep(String),

    /// Configuration references a step that was never registered
    #[error("wizard '{wizard}' has no step named '{step}'")]
    UnknownStep { wizard: String, step: String },

    /// Two wizards registered under the same name
    #[error("wizard '{0}' is already registered")]
    DuplicateWizard(String),

    /// A field declares a regular expression that does not compile
    #[error("field '{field}' has an invalid pattern: {message}")]
    InvalidPattern { field: String, message: String },

    /// Lookup or configuration of a wizard that was never registered
    #[error("wizard '{0}' not found")]
    UnknownWizard(String),
}

impl WizardError {
    /// Whether the error should surface as "not found" to the transport layer
    pub fn is_not_found(&self) -> bool {
        matches!(self, WizardError::NotFound(_) | WizardError::UnknownWizard(_))
    }
}
