//! Poem flow API end-to-end tests.

use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use flowstate::execution::ExecutionStore;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use uuid::Uuid;

use super::create_test_server;
use super::get;
use super::poll_until_terminal;
use super::post;

/// Parses a timestamp from a response body.
fn timestamp(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .expect("timestamp should be a string")
        .parse()
        .expect("timestamp should be RFC 3339")
}

#[tokio::test]
async fn trigger_and_poll_until_completed() {
    let (app, _) = create_test_server().call();

    let (status, body) = post(&app, "/api/v1/poem-flow/execute", r#"{"sentence_count": 3}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let id: Uuid = body["execution_id"].as_str().unwrap().parse().unwrap();
    assert_eq!(
        body["message"],
        format!("Poem flow execution initiated with ID: {id}")
    );

    let record = poll_until_terminal(&app, &format!("/api/v1/poem-flow/execution/{id}")).await;
    assert_eq!(record["execution_id"], id.to_string());
    assert_eq!(record["flow_name"], "poem_flow");
    assert_eq!(record["status"], "completed");
    assert_eq!(record["error"], Value::Null);
    assert!(record.get("inputs").is_none());

    assert_eq!(record["result"]["sentence_count"], 3);
    let poem = record["result"]["poem"].as_str().unwrap();
    assert_eq!(poem.lines().count(), 3);

    let created = timestamp(&record["created_at"]);
    let started = timestamp(&record["started_at"]);
    let completed = timestamp(&record["completed_at"]);
    assert!(created <= started);
    assert!(started <= completed);
}

#[tokio::test]
async fn omitted_sentence_count_is_picked() {
    let (app, _) = create_test_server().call();

    let (status, body) = post(&app, "/api/v1/poem-flow/execute", "{}").await;
    assert_eq!(status, StatusCode::OK);

    let id = body["execution_id"].as_str().unwrap();
    let record = poll_until_terminal(&app, &format!("/api/v1/poem-flow/execution/{id}")).await;
    assert_eq!(record["status"], "completed");

    let count = record["result"]["sentence_count"].as_u64().unwrap();
    assert!((1..=5).contains(&count));
    assert_eq!(
        record["result"]["poem"].as_str().unwrap().lines().count() as u64,
        count
    );
}

#[tokio::test]
async fn out_of_range_sentence_count_creates_nothing() {
    let (app, store) = create_test_server().call();

    for count in [0, 11] {
        let (status, body) = post(
            &app,
            "/api/v1/poem-flow/execute",
            &json!({ "sentence_count": count }).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "BadRequest");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("`sentence_count` must be between 1 and 10"),
            "unexpected message: {body}"
        );
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn malformed_body_creates_nothing() {
    let (app, store) = create_test_server().call();

    for body in [
        r#"{"sentence_count": "three"}"#,
        r#"{"sentence_count": -1}"#,
        r#"{"sentence_count": 1000}"#,
        "not json",
    ] {
        let (status, response) = post(&app, "/api/v1/poem-flow/execute", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body `{body}` was accepted");
        assert_eq!(response["kind"], "BadRequest");
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn unknown_execution_is_not_found() {
    let (app, _) = create_test_server().call();
    let id = Uuid::new_v4();

    let (status, body) = get(&app, &format!("/api/v1/poem-flow/execution/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
    assert_eq!(body["message"], format!("execution `{id}` not found"));
}

#[tokio::test]
async fn malformed_execution_id_is_rejected() {
    let (app, _) = create_test_server().call();

    let (status, body) = get(&app, "/api/v1/poem-flow/execution/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BadRequest");
}

#[tokio::test]
async fn other_flows_are_not_visible() {
    let (app, store) = create_test_server().call();
    let id = store.create("other_flow", json!({})).await;

    let (status, _) = get(&app, &format!("/api/v1/poem-flow/execution/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, &format!("/api/v1/executions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flow_name"], "other_flow");

    let (status, body) = get(&app, "/api/v1/poem-flow/executions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn lists_poem_flow_executions_newest_first() {
    let (app, _) = create_test_server().call();

    let mut ids = Vec::new();
    for count in 1..=3 {
        let (status, body) = post(
            &app,
            "/api/v1/poem-flow/execute",
            &json!({ "sentence_count": count }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(body["execution_id"].as_str().unwrap().to_string());
    }

    for id in &ids {
        poll_until_terminal(&app, &format!("/api/v1/poem-flow/execution/{id}")).await;
    }

    let (status, body) = get(&app, "/api/v1/poem-flow/executions").await;
    assert_eq!(status, StatusCode::OK);

    let listed: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["execution_id"].as_str().unwrap().to_string())
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);

    let (_, body) = get(&app, "/api/v1/poem-flow/executions?status=completed&limit=2").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(&app, "/api/v1/poem-flow/executions?status=failed").await;
    assert_eq!(body, json!([]));
}
