//! REST API for formwizard.
//!
//! Serves the registered wizards over JSON. Step pages render as
//! [`dto::StepViewResponse`], navigation answers with `303 See Other`.

use std::net::SocketAddr;

use anyhow::Result;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Wizard endpoints
        .route("/api/v1/wizards", get(routes::wizards::list))
        // a wizard name, or a wizard's confirmation page
        .route("/content/:id/:wizard", get(routes::wizards::enter))
        .route(
            "/content/:id/:wizard/:step",
            get(routes::wizards::show).post(routes::wizards::submit),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server
pub async fn serve(state: ApiState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()?;
    let app = build_router(state);

    tracing::info!("REST API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::demo::demo_registry;
    use crate::form::Record;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(ApiState::new(Config::default(), demo_registry().unwrap()))
    }

    fn router_for(state: &ApiState) -> Router {
        build_router(state.clone())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = router()
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_enter_redirects_to_default_step() {
        let response = router()
            .oneshot(Request::get("/content/1/person").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://127.0.0.1:7010/content/1/person/person"
        );
    }

    #[tokio::test]
    async fn test_show_step_with_suffix() {
        let response = router()
            .oneshot(
                Request::get("/content/1/person/person.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["step"], "person");
        assert_eq!(json["actions"], serde_json::json!(["next"]));
        assert_eq!(json["menu"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_step_is_not_found() {
        let response = router()
            .oneshot(
                Request::get("/content/1/person/legacy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }

    #[tokio::test]
    async fn test_guard_redirects_skipped_step() {
        let response = router()
            .oneshot(
                Request::get("/content/1/person/review")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://127.0.0.1:7010/content/1/person/person"
        );
    }

    #[tokio::test]
    async fn test_submit_with_errors_renders() {
        let request = Request::post("/content/1/person/person")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"action": "next", "data": {"first_name": "Ada"}}"#))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "errors");
        assert_eq!(json["errors"][0]["field"], "last_name");
    }

    #[tokio::test]
    async fn test_failed_requests_store_nothing() {
        let state = ApiState::new(Config::default(), demo_registry().unwrap());
        let router = build_router(state.clone());

        for i in 0..5 {
            let response = router
                .clone()
                .oneshot(
                    Request::get(format!("/content/rand{}/person/nosuchstep", i))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        // rendering or redirecting without a commit stores nothing either
        let response = router
            .clone()
            .oneshot(Request::get("/content/7/person/review").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        assert!(state.store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_page_served() {
        let state = ApiState::new(Config::default(), demo_registry().unwrap());
        state
            .store
            .write()
            .await
            .insert("1".to_string(), Record::new().with("first_name", "Ada"));

        let response = router_for(&state)
            .oneshot(
                Request::get("/content/1/confirmation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["id"], "1");
        assert_eq!(json["page"], "confirmation");
        assert_eq!(json["values"]["first_name"], "Ada");

        // unknown content has nothing to confirm
        let response = router_for(&state)
            .oneshot(
                Request::get("/content/2/confirmation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
