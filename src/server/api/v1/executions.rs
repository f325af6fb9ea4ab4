//! Execution API handlers shared by every flow.

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use uuid::Uuid;

use super::AppState;
use super::error::Error;
use super::models::ExecutionStatusResponse;
use super::models::ListExecutionsQuery;
use crate::execution::ExecutionStatus;
use crate::execution::ListFilter;

/// Lists executions matching the given filters, most recent first.
pub(super) async fn list_matching(
    state: &AppState,
    flow_name: Option<String>,
    status: Option<ExecutionStatus>,
    limit: Option<usize>,
) -> Vec<ExecutionStatusResponse> {
    let filter = ListFilter::builder()
        .maybe_flow_name(flow_name)
        .maybe_status(status)
        .limit(limit.unwrap_or(state.default_list_limit()))
        .build();

    state
        .query()
        .list(filter)
        .await
        .into_iter()
        .map(Into::into)
        .collect()
}

/// List executions across all flows with optional filtering.
#[utoipa::path(
    get,
    path = "/api/v1/executions",
    params(ListExecutionsQuery),
    responses(
        (status = 200, description = "Executions retrieved", body = [ExecutionStatusResponse]),
        (status = 400, description = "Invalid query parameters", body = super::error::ErrorResponse),
    ),
    tag = "executions"
)]
pub async fn list_executions(
    State(state): State<AppState>,
    query: Result<Query<ListExecutionsQuery>, QueryRejection>,
) -> Result<Json<Vec<ExecutionStatusResponse>>, Error> {
    let Query(query) = query?;
    let executions = list_matching(&state, query.flow_name, query.status, query.limit).await;
    Ok(Json(executions))
}

/// Get an execution of any flow by ID.
#[utoipa::path(
    get,
    path = "/api/v1/executions/{id}",
    params(
        ("id" = String, Path, description = "Execution ID")
    ),
    responses(
        (status = 200, description = "Execution found", body = ExecutionStatusResponse),
        (status = 400, description = "Malformed execution ID", body = super::error::ErrorResponse),
        (status = 404, description = "Execution not found", body = super::error::ErrorResponse),
    ),
    tag = "executions"
)]
pub async fn get_execution(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ExecutionStatusResponse>, Error> {
    let Path(id) = id?;
    let record = state.query().get(id).await?;
    Ok(Json(record.into()))
}
