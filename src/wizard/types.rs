//! Type definitions for the wizard controller

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::form::{FieldError, Submission};
use crate::step::FormStatus;

/// Buttons a request can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardAction {
    /// Go to the previous step
    Back,
    /// Go to the next step
    Next,
    /// Finish the wizard from the last step
    Complete,
    /// Commit the current step without navigating (edit steps only)
    Apply,
}

impl WizardAction {
    pub fn all() -> &'static [WizardAction] {
        &[
            WizardAction::Back,
            WizardAction::Next,
            WizardAction::Complete,
            WizardAction::Apply,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardAction::Back => "back",
            WizardAction::Next => "next",
            WizardAction::Complete => "complete",
            WizardAction::Apply => "apply",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardAction::Back => "Back",
            WizardAction::Next => "Next",
            WizardAction::Complete => "Complete",
            WizardAction::Apply => "Apply",
        }
    }
}

impl std::fmt::Display for WizardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WizardAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardAction::all()
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown wizard action '{}'", s))
    }
}

/// One inbound request as seen by the wizard
#[derive(Debug, Clone, Default)]
pub struct WizardRequest {
    /// Scheme and authority, e.g. `http://localhost:7010`
    pub application_url: String,
    /// Path of the content object the wizard runs on, e.g. `/content/42`
    pub content_path: String,
    /// Step path segment, possibly with a format suffix (`address.html`)
    pub step: Option<String>,
    /// Pressed button, if any
    pub action: Option<WizardAction>,
    /// Submitted form values
    pub data: Submission,
}

impl WizardRequest {
    pub fn new(application_url: &str, content_path: &str) -> Self {
        Self {
            application_url: application_url.to_string(),
            content_path: content_path.to_string(),
            ..Self::default()
        }
    }

    pub fn step(mut self, step: &str) -> Self {
        self.step = Some(step.to_string());
        self
    }

    pub fn action(mut self, action: WizardAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn data(mut self, data: Submission) -> Self {
        self.data = data;
        self
    }
}

/// Menu entry for one visible step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub title: String,
    /// 1-based position in the full ordered sequence
    pub number: usize,
    pub url: String,
    pub selected: bool,
    /// CSS class token; `None` skips the class attribute
    pub class: Option<String>,
    pub first: bool,
    pub last: bool,
}

/// Everything an outer layer needs to render the current step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub wizard: String,
    pub step: String,
    pub label: String,
    pub status: Option<FormStatus>,
    pub status_message: Option<String>,
    pub errors: Vec<FieldError>,
    pub values: Map<String, Value>,
    pub menu: Vec<MenuItem>,
    pub actions: Vec<WizardAction>,
    pub step_completed: bool,
    pub wizard_completed: bool,
}

/// Result of processing one request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Render the current step
    Render(StepView),
    /// Send the client elsewhere instead of rendering
    Redirect(String),
}

impl Outcome {
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(url) => Some(url),
            Outcome::Render(_) => None,
        }
    }
}
