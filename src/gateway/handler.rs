use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, instrument};

use crate::constants::MIN_WEB_COMPARE_CHARS;

use super::COPYLESS_STATUS_HEADER;
use super::error::GatewayError;
use super::payload::{CheckRequest, CheckResponse, WebCompareRequest};
use super::state::HandlerState;

#[instrument(skip(state, request), fields(text_len = request.text_to_check.len()))]
pub async fn check_handler(
    State(state): State<HandlerState>,
    Json(request): Json<CheckRequest>,
) -> Result<Response, GatewayError> {
    if request.text_to_check.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Please provide some text to check (input cannot be empty).".to_string(),
        ));
    }

    let service = state.service.clone();
    let text = request.text_to_check;

    let verdict = tokio::task::spawn_blocking(move || service.check(&text))
        .await
        .map_err(|e| {
            error!(error = %e, "Plagiarism check task failed");
            GatewayError::InternalError(format!("check task failed: {}", e))
        })??;

    info!(
        overall = verdict.overall_similarity,
        matches = verdict.matches.len(),
        "Check served"
    );

    let mut headers = HeaderMap::new();
    headers.insert(COPYLESS_STATUS_HEADER, HeaderValue::from_static("checked"));

    Ok((
        StatusCode::OK,
        headers,
        Json(CheckResponse::from(verdict)),
    )
        .into_response())
}

#[instrument(skip(state, request), fields(top_k = request.top_k))]
pub async fn web_compare_handler(
    State(state): State<HandlerState>,
    Json(request): Json<WebCompareRequest>,
) -> Result<Response, GatewayError> {
    if request.text.trim().chars().count() < MIN_WEB_COMPARE_CHARS {
        return Err(GatewayError::InvalidRequest(format!(
            "Please provide at least {} characters for web comparison.",
            MIN_WEB_COMPARE_CHARS
        )));
    }

    let matches = state.web.compare(&request.text, request.top_k).await;
    debug!(results = matches.len(), "Web comparison served");

    Ok((StatusCode::OK, Json(matches)).into_response())
}
