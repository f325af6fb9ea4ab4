//! V1 API routes and models.

use axum::Router;
use axum::routing::get;
use axum::routing::post;
use utoipa::OpenApi;

use self::error::ErrorResponse;
use self::executions::*;
use self::models::*;
use self::poem::*;
use super::AppState;
use crate::execution::ExecutionStatus;
use crate::flow::poem::PoemOverrides;
use crate::flow::poem::PoemResult;

pub mod error;
pub mod executions;
pub mod models;
pub mod poem;

/// OpenAPI documentation for V1 API.
#[derive(OpenApi)]
#[openapi(
    paths(
        execute_poem_flow,
        get_poem_flow_execution,
        list_poem_flow_executions,
        list_executions,
        get_execution,
    ),
    components(schemas(
        ErrorResponse,
        ExecutionResponse,
        ExecutionStatus,
        ExecutionStatusResponse,
        ListExecutionsQuery,
        ListFlowExecutionsQuery,
        PoemOverrides,
        PoemResult,
    )),
    tags(
        (name = "poem-flow", description = "Poem flow endpoints"),
        (name = "executions", description = "Execution endpoints across all flows")
    )
)]
pub struct ApiDoc;

/// Gets the route prefix of a flow's endpoints within the V1 API.
///
/// Flow names use underscores; route segments use hyphens.
pub fn flow_segment(name: &str) -> String {
    name.replace('_', "-")
}

/// Gets the absolute path prefix of a flow's endpoints.
pub fn flow_prefix(name: &str) -> String {
    format!("/api/v1/{}", flow_segment(name))
}

/// Create the V1 API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/poem-flow/execute", post(execute_poem_flow))
        .route("/poem-flow/execution/{id}", get(get_poem_flow_execution))
        .route("/poem-flow/executions", get(list_poem_flow_executions))
        .route("/executions", get(list_executions))
        .route("/executions/{id}", get(get_execution))
        .with_state(state)
}
