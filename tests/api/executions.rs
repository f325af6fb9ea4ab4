//! Execution API end-to-end tests.

use anyhow::bail;
use axum::http::StatusCode;
use flowstate::execution::ExecutionRunner;
use flowstate::execution::ExecutionStore;
use flowstate::flow::Flow;
use flowstate::flow::FlowError;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use uuid::Uuid;

use super::create_test_server;
use super::get;

/// A flow that always fails.
struct FailingFlow;

impl Flow for FailingFlow {
    type Output = ();
    type Overrides = ();

    const NAME: &'static str = "failing_flow";

    fn new(_: Self::Overrides) -> Result<Self, FlowError> {
        Ok(Self)
    }

    fn execute(&mut self) -> anyhow::Result<()> {
        bail!("the muse did not arrive")
    }

    fn result(&self) -> Option<Self::Output> {
        None
    }
}

/// Collects the flow names and statuses of a listing.
fn summarize(body: &Value) -> Vec<(String, String)> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|record| {
            (
                record["flow_name"].as_str().unwrap().to_string(),
                record["status"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn failed_execution_records_error() {
    let (app, store) = create_test_server().call();
    let runner = ExecutionRunner::new(store.clone(), None);

    let submission = runner.submit::<FailingFlow>(()).await.unwrap();
    submission.handle.await.unwrap();

    let (status, body) = get(&app, &format!("/api/v1/executions/{}", submission.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flow_name"], "failing_flow");
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "the muse did not arrive");
    assert_eq!(body["result"], Value::Null);
    assert!(body["started_at"].is_string());
    assert!(body["completed_at"].is_string());
}

#[tokio::test]
async fn unknown_execution_is_not_found() {
    let (app, _) = create_test_server().call();

    let (status, body) = get(&app, &format!("/api/v1/executions/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
}

#[tokio::test]
async fn lists_with_filters() {
    let (app, store) = create_test_server().call();

    let first = store.create("poem_flow", json!({})).await;
    store.start(first).await;
    store.complete(first, json!({ "poem": "x" })).await;

    let second = store.create("other_flow", json!({})).await;
    store.start(second).await;
    store.fail(second, String::from("boom")).await;

    store.create("poem_flow", json!({})).await;

    let (status, body) = get(&app, "/api/v1/executions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summarize(&body),
        vec![
            ("poem_flow".to_string(), "pending".to_string()),
            ("other_flow".to_string(), "failed".to_string()),
            ("poem_flow".to_string(), "completed".to_string()),
        ]
    );

    let (_, body) = get(&app, "/api/v1/executions?flow_name=poem_flow").await;
    assert_eq!(
        summarize(&body),
        vec![
            ("poem_flow".to_string(), "pending".to_string()),
            ("poem_flow".to_string(), "completed".to_string()),
        ]
    );

    let (_, body) = get(&app, "/api/v1/executions?status=failed").await;
    assert_eq!(
        summarize(&body),
        vec![("other_flow".to_string(), "failed".to_string())]
    );

    let (_, body) = get(&app, "/api/v1/executions?flow_name=poem_flow&status=completed").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["execution_id"], first.to_string());

    let (_, body) = get(&app, "/api/v1/executions?limit=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/api/v1/executions?flow_name=missing_flow").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_query_parameters_are_rejected() {
    let (app, _) = create_test_server().call();

    for uri in [
        "/api/v1/executions?status=sleeping",
        "/api/v1/executions?limit=many",
        "/api/v1/executions?limit=-1",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "`{uri}` was accepted");
        assert_eq!(body["kind"], "BadRequest");
    }
}

#[tokio::test]
async fn default_list_limit_is_configurable() {
    let (app, store) = create_test_server().default_list_limit(2).call();
    for _ in 0..5 {
        store.create("poem_flow", json!({})).await;
    }

    let (_, body) = get(&app, "/api/v1/executions").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(&app, "/api/v1/executions?limit=4").await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn empty_flow_name_lists_every_flow() {
    let (app, store) = create_test_server().call();
    store.create("poem_flow", json!({})).await;
    store.create("other_flow", json!({})).await;

    let (status, body) = get(&app, "/api/v1/executions?flow_name=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summarize(&body),
        vec![
            ("other_flow".to_string(), "pending".to_string()),
            ("poem_flow".to_string(), "pending".to_string()),
        ]
    );
}

#[tokio::test]
async fn limit_returns_most_recent_executions() {
    let (app, store) = create_test_server().call();

    let mut ids = Vec::new();
    for i in 0..10 {
        ids.push(store.create("poem_flow", json!({ "i": i })).await.to_string());
    }

    let (status, body) = get(&app, "/api/v1/executions?limit=5").await;
    assert_eq!(status, StatusCode::OK);

    let listed: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["execution_id"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<_> = ids.iter().rev().take(5).cloned().collect();
    assert_eq!(listed, expected);
}
