//! Service-level endpoint tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::create_test_server;
use super::get;

#[tokio::test]
async fn health() {
    let (app, _) = create_test_server().call();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn index_lists_flow_endpoints() {
    let (app, _) = create_test_server().call();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "flowstate");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"], json!({ "poem_flow": "/api/v1/poem-flow" }));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = create_test_server().call();

    let (status, body) = get(&app, "/api/v1/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/poem-flow/execute"].is_object());
    assert!(body["paths"]["/api/v1/executions"].is_object());
}
