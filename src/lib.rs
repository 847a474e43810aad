//! formwizard - multi-step form wizards
//!
//! A wizard splits the editing of one content object into ordered steps.
//! This crate owns step sequencing, traversal, forced ordering and the
//! Back/Next/Complete state machine; rendering and storage belong to the
//! caller. The [`rest`] module serves wizards over HTTP.

pub mod config;
pub mod demo;
pub mod error;
pub mod form;
pub mod logging;
pub mod registry;
pub mod rest;
pub mod step;
pub mod url;
pub mod wizard;

pub use config::{Config, StepOverrides, WizardConfig};
pub use error::WizardError;
pub use form::{Content, Field, FieldKind, Fields, Record};
pub use registry::{WizardDefinition, WizardHooks, WizardRegistry};
pub use step::{FormStatus, Step, StepBehavior, StepRegistry};
pub use wizard::{Outcome, StepView, Wizard, WizardAction, WizardRequest};
