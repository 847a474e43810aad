//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::rest::dto::{
    ActionRequest, ConfirmationResponse, FieldErrorResponse, HealthResponse, MenuItemResponse, StatusResponse,
    StepSummary, StepViewResponse, WizardSummary,
};
use crate::rest::error::ErrorResponse;

/// OpenAPI documentation for the formwizard REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "formwizard API",
        version = "0.1.0",
        description = "REST API driving multi-step form wizards over in-memory content objects.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Wizard endpoints
        crate::rest::routes::wizards::list,
        crate::rest::routes::wizards::enter,
        crate::rest::routes::wizards::show,
        crate::rest::routes::wizards::submit,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            StatusResponse,
            WizardSummary,
            StepSummary,
            StepViewResponse,
            MenuItemResponse,
            ConfirmationResponse,
            FieldErrorResponse,
            ErrorResponse,
            // Request types
            ActionRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Wizards", description = "Wizard navigation over content objects"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("formwizard API"));
        assert!(spec.contains("/api/v1/health"));
        assert!(spec.contains("/api/v1/wizards"));
        assert!(spec.contains("/content/{id}/{wizard}/{step}"));
    }

    #[test]
    fn test_openapi_has_all_tags() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("\"Health\""));
        assert!(spec.contains("\"Wizards\""));
    }
}
