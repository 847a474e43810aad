//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::form::FieldError;
use crate::step::Step;
use crate::wizard::{MenuItem, StepView};

// =============================================================================
// Health DTOs
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Service status response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub wizard_count: usize,
    pub content_count: usize,
}

// =============================================================================
// Wizard DTOs
// =============================================================================

/// Step as listed for a wizard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepSummary {
    pub name: String,
    pub label: String,
    pub weight: i32,
    pub visible: bool,
}

impl From<&Step> for StepSummary {
    fn from(step: &Step) -> Self {
        Self {
            name: step.name().to_string(),
            label: step.label().to_string(),
            weight: step.settings().weight,
            visible: step.is_visible(),
        }
    }
}

/// Registered wizard with its ordered steps
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WizardSummary {
    pub name: String,
    pub steps: Vec<StepSummary>,
}

/// Content object shown on a wizard's confirmation page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmationResponse {
    pub id: String,
    pub page: String,
    /// Set by the finish hook when the wizard completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[schema(value_type = Object)]
    pub values: Map<String, Value>,
}

/// Request body for pressing a wizard button
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ActionRequest {
    /// One of `back`, `next`, `complete`, `apply`; without one the step only renders
    #[serde(default)]
    pub action: Option<String>,
    /// Submitted field values keyed by field name
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

/// Validation failure for one field
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

impl From<&FieldError> for FieldErrorResponse {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.clone(),
            message: err.message.clone(),
        }
    }
}

/// Menu entry for one visible step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuItemResponse {
    pub name: String,
    pub title: String,
    pub number: usize,
    pub url: String,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub first: bool,
    pub last: bool,
}

impl From<&MenuItem> for MenuItemResponse {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            title: item.title.clone(),
            number: item.number,
            url: item.url.clone(),
            selected: item.selected,
            class: item.class.clone(),
            first: item.first,
            last: item.last,
        }
    }
}

/// Rendered state of the current step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepViewResponse {
    pub wizard: String,
    pub step: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    pub errors: Vec<FieldErrorResponse>,
    #[schema(value_type = Object)]
    pub values: Map<String, Value>,
    pub menu: Vec<MenuItemResponse>,
    /// Buttons offered on this step
    pub actions: Vec<String>,
    pub step_completed: bool,
    pub wizard_completed: bool,
}

impl From<StepView> for StepViewResponse {
    fn from(view: StepView) -> Self {
        Self {
            status: view
                .status
                .and_then(|s| serde_json::to_value(s).ok())
                .and_then(|v| v.as_str().map(str::to_string)),
            errors: view.errors.iter().map(FieldErrorResponse::from).collect(),
            menu: view.menu.iter().map(MenuItemResponse::from).collect(),
            actions: view.actions.iter().map(|a| a.as_str().to_string()).collect(),
            wizard: view.wizard,
            step: view.step,
            label: view.label,
            status_message: view.status_message,
            values: view.values,
            step_completed: view.step_completed,
            wizard_completed: view.wizard_completed,
        }
    }
}
