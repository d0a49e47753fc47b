//! HTTP gateway (Axum) for plagiarism checks and web comparison.
//!
//! This module is primarily used by the `copyless` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handler::{check_handler, web_compare_handler};
pub use state::HandlerState;

/// Response header carrying a short machine-readable outcome.
pub const COPYLESS_STATUS_HEADER: &str = "x-copyless-status";
pub const COPYLESS_STATUS_HEALTHY: &str = "healthy";
pub const COPYLESS_STATUS_READY: &str = "ready";
pub const COPYLESS_STATUS_NOT_READY: &str = "not_ready";

pub const ROOT_MESSAGE: &str = "CopyLess API is operational.";

pub fn create_router_with_state(state: HandlerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/v1/check", post(check_handler))
        .route("/api/web/compare", post(web_compare_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub service_ready: bool,
    pub web_enabled: bool,
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub corpus: &'static str,
    pub web_search: &'static str,
    pub embedder_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn root_handler(State(state): State<HandlerState>) -> Response {
    (
        StatusCode::OK,
        Json(RootResponse {
            message: ROOT_MESSAGE.to_string(),
            status: "ok".to_string(),
            service_ready: state.service.is_ready(),
            web_enabled: state.web.is_enabled(),
        }),
    )
        .into_response()
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        COPYLESS_STATUS_HEADER,
        HeaderValue::from_static(COPYLESS_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Readiness reflects the corpus indices only. Web search is optional.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let is_ready = state.service.is_ready();

    let components = ComponentStatus {
        http: COPYLESS_STATUS_READY,
        corpus: if is_ready {
            COPYLESS_STATUS_READY
        } else {
            COPYLESS_STATUS_NOT_READY
        },
        web_search: if state.web.is_enabled() {
            "enabled"
        } else {
            "disabled"
        },
        embedder_mode: if state.service.embedder().is_stub() {
            "stub"
        } else {
            "real"
        },
        reason: state.service.unavailable_reason().map(str::to_string),
    };

    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, COPYLESS_STATUS_READY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, COPYLESS_STATUS_NOT_READY)
    };

    let mut headers = HeaderMap::new();
    headers.insert(COPYLESS_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
