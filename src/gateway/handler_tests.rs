//! Router-level tests for the gateway handlers.

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::EngineConfig;
use crate::corpus::Document;
use crate::embedding::SentenceEmbedder;
use crate::gateway::error::ErrorResponse;
use crate::gateway::payload::{CHECK_COMPLETE_MESSAGE, CheckResponse};
use crate::gateway::{
    COPYLESS_STATUS_HEADER, HandlerState, ROOT_MESSAGE, RootResponse, create_router_with_state,
};
use crate::service::PlagiarismService;
use crate::web::{MockPageFetcher, MockSearchProvider, WebComparer, WebMatch};

const SENTENCE: &str = "The mitochondria is the powerhouse of the cell";

fn documents() -> Vec<Document> {
    vec![
        Document::new(
            0,
            "Photosynthesis converts light energy into chemical energy stored in glucose.",
        ),
        Document::new(
            1,
            "The mitochondria is the powerhouse of the cell. It produces ATP through cellular respiration.",
        ),
        Document::new(2, "Rust guarantees memory safety without a garbage collector."),
    ]
}

fn embedder() -> Arc<SentenceEmbedder> {
    Arc::new(SentenceEmbedder::stub())
}

fn disabled_web(embedder: Arc<SentenceEmbedder>) -> Arc<WebComparer> {
    Arc::new(WebComparer::new(
        None,
        Arc::new(MockPageFetcher::new()),
        embedder,
    ))
}

fn ready_router() -> Router {
    let embedder = embedder();
    let service =
        PlagiarismService::from_documents(EngineConfig::default(), documents(), embedder.clone())
            .expect("service builds");
    create_router_with_state(HandlerState::new(
        Arc::new(service),
        disabled_web(embedder),
    ))
}

fn not_ready_router() -> Router {
    let embedder = embedder();
    let service = PlagiarismService::new(
        EngineConfig::default(),
        "/definitely/missing/corpus.txt",
        embedder.clone(),
    );
    create_router_with_state(HandlerState::new(
        Arc::new(service),
        disabled_web(embedder),
    ))
}

fn web_router() -> Router {
    let embedder = embedder();
    let service =
        PlagiarismService::from_documents(EngineConfig::default(), documents(), embedder.clone())
            .expect("service builds");

    let search = Arc::new(MockSearchProvider::new(vec![
        MockSearchProvider::hit("https://biology.example", "Biology"),
        MockSearchProvider::hit("https://finance.example", "Finance"),
    ]));
    let fetcher = Arc::new(
        MockPageFetcher::new()
            .with_page(
                "https://biology.example",
                &format!("Cells are small.\n\n{SENTENCE}"),
            )
            .with_page("https://finance.example", "Stocks rallied.\n\nBonds fell."),
    );
    let web = WebComparer::new(Some(search), fetcher, embedder);

    create_router_with_state(HandlerState::new(Arc::new(service), Arc::new(web)))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn test_root_reports_operational() {
    let response = ready_router().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let root: RootResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(root.message, ROOT_MESSAGE);
    assert_eq!(root.status, "ok");
    assert!(root.service_ready);
    assert!(!root.web_enabled);
}

#[tokio::test]
async fn test_health_sets_status_header() {
    let response = ready_router().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(COPYLESS_STATUS_HEADER).unwrap(),
        "healthy"
    );
}

#[tokio::test]
async fn test_ready_when_indices_built() {
    let response = ready_router().oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(value["status"], "ready");
    assert_eq!(value["components"]["embedder_mode"], "stub");
    assert_eq!(value["components"]["web_search"], "disabled");
}

#[tokio::test]
async fn test_ready_reports_unavailable_corpus() {
    let response = not_ready_router().oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let value: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(value["status"], "not_ready");
    assert!(value["components"]["reason"].is_string());
}

#[tokio::test]
async fn test_check_verbatim_sentence() {
    let response = ready_router()
        .oneshot(post_json(
            "/api/v1/check",
            serde_json::json!({ "text_to_check": SENTENCE }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(COPYLESS_STATUS_HEADER).unwrap(),
        "checked"
    );

    let body: CheckResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.message, CHECK_COMPLETE_MESSAGE);
    assert!(body.overall_similarity > 70.0);
    assert!(!body.matches.is_empty());
    assert_eq!(body.matches[0].source_id.as_deref(), Some("corpus_doc_1"));
}

#[tokio::test]
async fn test_check_rejects_blank_text() {
    let response = ready_router()
        .oneshot(post_json(
            "/api/v1/check",
            serde_json::json!({ "text_to_check": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(COPYLESS_STATUS_HEADER).unwrap(),
        "invalid_request"
    );

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error.code, 400);
    assert_eq!(
        error.error,
        "Please provide some text to check (input cannot be empty)."
    );
}

#[tokio::test]
async fn test_check_punctuation_only_is_bad_request() {
    let response = ready_router()
        .oneshot(post_json(
            "/api/v1/check",
            serde_json::json!({ "text_to_check": "..." }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_check_when_not_ready() {
    let response = not_ready_router()
        .oneshot(post_json(
            "/api/v1/check",
            serde_json::json!({ "text_to_check": SENTENCE }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error.code, 503);
    assert!(error.error.starts_with("Plagiarism service is not initialized"));
}

#[tokio::test]
async fn test_check_rejects_malformed_body() {
    let response = ready_router()
        .oneshot(post_json(
            "/api/v1/check",
            serde_json::json!({ "text": SENTENCE }),
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_web_compare_rejects_short_text() {
    let response = web_router()
        .oneshot(post_json(
            "/api/web/compare",
            serde_json::json!({ "text": "  too short text   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        error.error,
        "Please provide at least 20 characters for web comparison."
    );
}

#[tokio::test]
async fn test_web_compare_ranks_pages() {
    let response = web_router()
        .oneshot(post_json(
            "/api/web/compare",
            serde_json::json!({ "text": SENTENCE, "top_k": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let matches: Vec<WebMatch> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].url, "https://biology.example");
    assert_eq!(matches[0].title, "Biology");
    assert_eq!(matches[0].snippet, SENTENCE);
    assert_eq!(matches[0].score, 1.0);
}

#[tokio::test]
async fn test_web_compare_default_top_k() {
    let response = web_router()
        .oneshot(post_json(
            "/api/web/compare",
            serde_json::json!({ "text": SENTENCE }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let matches: Vec<WebMatch> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches[0].score >= matches[1].score);
}

#[tokio::test]
async fn test_web_compare_disabled_returns_empty_list() {
    let response = ready_router()
        .oneshot(post_json(
            "/api/web/compare",
            serde_json::json!({ "text": SENTENCE }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let matches: Vec<WebMatch> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/check")
        .header("origin", "https://frontend.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = ready_router().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
