//! Poem flow API handlers.

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use super::error::Error;
use super::executions::list_matching;
use super::models::ExecutionResponse;
use super::models::ExecutionStatusResponse;
use super::models::ListFlowExecutionsQuery;
use crate::execution::ExecutionStatus;
use crate::execution::QueryError;
use crate::flow::Flow;
use crate::flow::PoemFlow;
use crate::flow::poem::PoemOverrides;

/// Trigger a poem flow execution.
///
/// The flow runs in the background; the response is returned as soon as the
/// execution is recorded. Poll the returned execution ID for its outcome.
#[utoipa::path(
    post,
    path = "/api/v1/poem-flow/execute",
    request_body = PoemOverrides,
    responses(
        (status = 200, description = "Execution initiated", body = ExecutionResponse),
        (status = 400, description = "Invalid request", body = super::error::ErrorResponse),
    ),
    tag = "poem-flow"
)]
pub async fn execute_poem_flow(
    State(state): State<AppState>,
    request: Result<Json<PoemOverrides>, JsonRejection>,
) -> Result<Json<ExecutionResponse>, Error> {
    let Json(overrides) = request?;
    let submission = state.runner().submit::<PoemFlow>(overrides).await?;
    info!(execution_id = %submission.id, "poem flow execution initiated");

    Ok(Json(ExecutionResponse {
        execution_id: submission.id,
        status: ExecutionStatus::Pending,
        message: format!("Poem flow execution initiated with ID: {}", submission.id),
    }))
}

/// Get the status and result of a poem flow execution.
#[utoipa::path(
    get,
    path = "/api/v1/poem-flow/execution/{id}",
    params(
        ("id" = String, Path, description = "Execution ID")
    ),
    responses(
        (status = 200, description = "Execution found", body = ExecutionStatusResponse),
        (status = 400, description = "Malformed execution ID", body = super::error::ErrorResponse),
        (status = 404, description = "Execution not found", body = super::error::ErrorResponse),
    ),
    tag = "poem-flow"
)]
pub async fn get_poem_flow_execution(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ExecutionStatusResponse>, Error> {
    let Path(id) = id?;
    let record = state.query().get(id).await?;

    // Executions of other flows are not visible through this flow's routes.
    if record.flow_name != PoemFlow::NAME {
        return Err(QueryError::NotFound(id).into());
    }

    Ok(Json(record.into()))
}

/// List poem flow executions.
#[utoipa::path(
    get,
    path = "/api/v1/poem-flow/executions",
    params(ListFlowExecutionsQuery),
    responses(
        (status = 200, description = "Executions retrieved", body = [ExecutionStatusResponse]),
        (status = 400, description = "Invalid query parameters", body = super::error::ErrorResponse),
    ),
    tag = "poem-flow"
)]
pub async fn list_poem_flow_executions(
    State(state): State<AppState>,
    query: Result<Query<ListFlowExecutionsQuery>, QueryRejection>,
) -> Result<Json<Vec<ExecutionStatusResponse>>, Error> {
    let Query(query) = query?;
    let executions = list_matching(
        &state,
        Some(PoemFlow::NAME.to_string()),
        query.status,
        query.limit,
    )
    .await;

    Ok(Json(executions))
}
