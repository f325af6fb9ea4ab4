//! API models and handlers.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::routing::get;
use serde::Serialize;

use crate::config::ExecutionConfig;
use crate::execution::ExecutionRunner;
use crate::execution::ExecutionStore;
use crate::execution::QueryService;
use crate::flow;

pub mod v1;

/// The name reported by the root endpoint.
const API_NAME: &str = "flowstate";

/// Application state.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The runner that executes submitted flows.
    runner: ExecutionRunner,
    /// The read-only view over executions.
    query: QueryService,
    /// The limit applied to listings that do not specify one.
    default_list_limit: usize,
}

impl AppState {
    /// Creates application state over the given store.
    pub fn new(store: Arc<dyn ExecutionStore>, config: &ExecutionConfig) -> Self {
        Self {
            runner: ExecutionRunner::new(store.clone(), config.max_concurrent_executions),
            query: QueryService::new(store),
            default_list_limit: config.default_list_limit,
        }
    }

    /// Gets the execution runner.
    pub fn runner(&self) -> &ExecutionRunner {
        &self.runner
    }

    /// Gets the query service.
    pub fn query(&self) -> &QueryService {
        &self.query
    }

    /// Gets the default listing limit.
    pub fn default_list_limit(&self) -> usize {
        self.default_list_limit
    }
}

/// Information about the API.
#[derive(Debug, Serialize)]
struct IndexResponse {
    /// The API name.
    message: &'static str,
    /// The API version.
    version: &'static str,
    /// The endpoint prefix of each flow, keyed by flow name.
    endpoints: serde_json::Map<String, serde_json::Value>,
}

/// The health of the service.
#[derive(Debug, Serialize)]
struct HealthResponse {
    /// Always `healthy` while the server is answering.
    status: &'static str,
}

/// Reports the API name, version, and flow endpoints.
async fn index() -> Json<IndexResponse> {
    let endpoints = flow::names()
        .iter()
        .map(|name| (name.to_string(), v1::flow_prefix(name).into()))
        .collect();

    Json(IndexResponse {
        message: API_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

/// Reports that the service is up.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Create the API router with all versions.
///
/// Routes under `/api` are versioned; `/` and `/health` are not.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api/v1", v1::create_router(state))
}
