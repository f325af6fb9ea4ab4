//! API request and response models.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use utoipa::IntoParams;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::execution::ExecutionRecord;
use crate::execution::ExecutionStatus;

/// Acknowledgment of a newly triggered execution.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "execution_id": "5f0c7a8e-8d0c-4a55-9b0e-4a1c1d0f3b2a",
    "status": "pending",
    "message": "Poem flow execution initiated with ID: 5f0c7a8e-8d0c-4a55-9b0e-4a1c1d0f3b2a"
}))]
pub struct ExecutionResponse {
    /// Unique execution ID.
    pub execution_id: Uuid,
    /// Current execution status.
    pub status: ExecutionStatus,
    /// Human-readable message.
    pub message: String,
}

/// A snapshot of an execution's status and outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecutionStatusResponse {
    /// Unique execution ID.
    pub execution_id: Uuid,
    /// Name of the flow.
    pub flow_name: String,
    /// Current execution status.
    pub status: ExecutionStatus,
    /// When the execution was created.
    pub created_at: DateTime<Utc>,
    /// When the execution started running.
    pub started_at: Option<DateTime<Utc>>,
    /// When the execution completed or failed.
    pub completed_at: Option<DateTime<Utc>>,
    /// The execution result, if completed.
    ///
    /// The shape depends on the flow.
    pub result: Option<Value>,
    /// The error message, if failed.
    pub error: Option<String>,
}

impl From<ExecutionRecord> for ExecutionStatusResponse {
    fn from(record: ExecutionRecord) -> Self {
        Self {
            execution_id: record.execution_id,
            flow_name: record.flow_name,
            status: record.status,
            created_at: record.created_at,
            started_at: record.started_at,
            completed_at: record.completed_at,
            result: record.result,
            error: record.error,
        }
    }
}

/// Query parameters for listing executions across all flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListExecutionsQuery {
    /// Filter by flow name.
    #[serde(default)]
    pub flow_name: Option<String>,
    /// Filter by status.
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
    /// Number of results to return (default: `100`, at most `1000`).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for listing the executions of a single flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListFlowExecutionsQuery {
    /// Filter by status.
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
    /// Number of results to return (default: `100`, at most `1000`).
    #[serde(default)]
    pub limit: Option<usize>,
}
