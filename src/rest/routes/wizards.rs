//! Wizard endpoints: listing, entering a wizard and driving its steps.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::demo::COMPLETED_AT;
use crate::form::{Content, Record};
use crate::rest::dto::{
    ActionRequest, ConfirmationResponse, StepSummary, StepViewResponse, WizardSummary,
};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::wizard::{Outcome, WizardAction, WizardRequest};

/// List registered wizards with their step order for an empty content object
#[utoipa::path(
    get,
    path = "/api/v1/wizards",
    tag = "Wizards",
    responses(
        (status = 200, description = "Registered wizards", body = Vec<WizardSummary>)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Json<Vec<WizardSummary>> {
    let request = WizardRequest::default();
    let wizards = state
        .registry
        .iter()
        .map(|definition| {
            let mut content = Record::new();
            let steps = definition
                .wizard(&mut content, &request)
                .steps()
                .iter()
                .map(StepSummary::from)
                .collect();
            WizardSummary {
                name: definition.name().to_string(),
                steps,
            }
        })
        .collect();
    Json(wizards)
}

/// Enter a wizard, redirecting to its default step. A segment naming a
/// wizard's confirmation page instead shows the finished content object.
#[utoipa::path(
    get,
    path = "/content/{id}/{wizard}",
    tag = "Wizards",
    params(
        ("id" = String, Path, description = "Content object id"),
        ("wizard" = String, Path, description = "Wizard name or confirmation page")
    ),
    responses(
        (status = 200, description = "Confirmation page", body = ConfirmationResponse),
        (status = 303, description = "Redirect to the default step"),
        (status = 404, description = "Wizard, page or content not found", body = ErrorResponse)
    )
)]
pub async fn enter(
    State(state): State<ApiState>,
    Path((id, wizard)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    if state.registry.get(&wizard).is_none() && is_confirmation_page(&state, &wizard) {
        return confirmation(&state, &id, &wizard).await;
    }
    let request = state.request(&id);
    run(&state, &id, &wizard, &request).await
}

fn is_confirmation_page(state: &ApiState, page: &str) -> bool {
    state
        .registry
        .iter()
        .any(|d| d.settings().confirmation_page_name.as_deref() == Some(page))
}

async fn confirmation(state: &ApiState, id: &str, page: &str) -> Result<Response, ApiError> {
    let record = state
        .content(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Content '{}' not found", id)))?;

    let completed_at = record
        .query(COMPLETED_AT)
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Ok(Json(ConfirmationResponse {
        id: id.to_string(),
        page: page.to_string(),
        completed_at,
        values: record.values().clone().into_iter().collect(),
    })
    .into_response())
}

/// Show a step
#[utoipa::path(
    get,
    path = "/content/{id}/{wizard}/{step}",
    tag = "Wizards",
    params(
        ("id" = String, Path, description = "Content object id"),
        ("wizard" = String, Path, description = "Wizard name"),
        ("step" = String, Path, description = "Step name, optionally with a suffix such as `.html`")
    ),
    responses(
        (status = 200, description = "Current step", body = StepViewResponse),
        (status = 303, description = "Redirect to an earlier incomplete step"),
        (status = 404, description = "Wizard or step not found", body = ErrorResponse)
    )
)]
pub async fn show(
    State(state): State<ApiState>,
    Path((id, wizard, step)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let request = state.request(&id).step(&step);
    run(&state, &id, &wizard, &request).await
}

/// Submit step data and press a button
#[utoipa::path(
    post,
    path = "/content/{id}/{wizard}/{step}",
    tag = "Wizards",
    params(
        ("id" = String, Path, description = "Content object id"),
        ("wizard" = String, Path, description = "Wizard name"),
        ("step" = String, Path, description = "Step name")
    ),
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Step rendered again, e.g. with validation errors", body = StepViewResponse),
        (status = 303, description = "Redirect after navigation or completion"),
        (status = 400, description = "Unknown action", body = ErrorResponse),
        (status = 404, description = "Wizard or step not found", body = ErrorResponse)
    )
)]
pub async fn submit(
    State(state): State<ApiState>,
    Path((id, wizard, step)): Path<(String, String, String)>,
    Json(body): Json<ActionRequest>,
) -> Result<Response, ApiError> {
    let mut request = state.request(&id).step(&step).data(body.data);
    if let Some(action) = body.action {
        let action: WizardAction = action.parse().map_err(ApiError::BadRequest)?;
        request = request.action(action);
    }
    run(&state, &id, &wizard, &request).await
}

/// Process one wizard request against the stored content object.
///
/// A content object only enters the store once a request committed data to it.
async fn run(
    state: &ApiState,
    id: &str,
    wizard: &str,
    request: &WizardRequest,
) -> Result<Response, ApiError> {
    let definition = state
        .registry
        .get(wizard)
        .ok_or_else(|| ApiError::NotFound(format!("Wizard '{}' not found", wizard)))?;

    let mut store = state.store.write().await;
    let existed = store.contains_key(id);
    let content = store.entry(id.to_string()).or_default();
    let result = definition.wizard(content, request).process();
    if !existed && (result.is_err() || store.get(id).is_some_and(Record::is_empty)) {
        store.remove(id);
    }
    let outcome = result?;

    Ok(match outcome {
        Outcome::Redirect(url) => Redirect::to(&url).into_response(),
        Outcome::Render(view) => Json(StepViewResponse::from(view)).into_response(),
    })
}
