//! Execution records and their lifecycle status.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

/// The status of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// The execution has been created but has not started.
    Pending,
    /// The execution is currently running.
    Running,
    /// The execution completed successfully.
    Completed,
    /// The execution failed with an error.
    Failed,
}

impl ExecutionStatus {
    /// Returns `true` if no further transition can occur from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Gets the position of the status within the lifecycle.
    ///
    /// Both terminal statuses share the last position.
    fn stage(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed => 2,
        }
    }

    /// Determines whether a record with this status may be moved to `next`.
    ///
    /// Writing the current status again is always allowed. Otherwise the
    /// status may only advance one step: `pending` to `running`, then
    /// `running` to `completed` or `failed`. A terminal status is final.
    pub fn can_transition_to(&self, next: ExecutionStatus) -> bool {
        if *self == next {
            return true;
        }

        next.stage() == self.stage() + 1
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Pending => write!(f, "pending"),
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ExecutionStatus::Pending),
            "running" => Ok(ExecutionStatus::Running),
            "completed" => Ok(ExecutionStatus::Completed),
            "failed" => Ok(ExecutionStatus::Failed),
            _ => Err(format!("invalid execution status: {}", s)),
        }
    }
}

/// A record tracking one execution of a flow.
///
/// Records are owned by an [`ExecutionStore`](super::ExecutionStore); callers
/// only ever see clones.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecutionRecord {
    /// The unique execution ID.
    pub execution_id: Uuid,
    /// The name of the flow being executed.
    pub flow_name: String,
    /// The current status.
    pub status: ExecutionStatus,
    /// When the execution was created.
    pub created_at: DateTime<Utc>,
    /// When the execution first started running.
    pub started_at: Option<DateTime<Utc>>,
    /// When the execution reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
    /// The inputs captured when the execution was created.
    pub inputs: JsonValue,
    /// The result of a completed execution.
    pub result: Option<JsonValue>,
    /// The error message of a failed execution.
    pub error: Option<String>,
}

impl ExecutionRecord {
    /// Creates a new pending record.
    pub fn new(execution_id: Uuid, flow_name: impl Into<String>, inputs: JsonValue) -> Self {
        Self {
            execution_id,
            flow_name: flow_name.into(),
            status: ExecutionStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            inputs,
            result: None,
            error: None,
        }
    }
}

impl PartialEq for ExecutionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.execution_id == other.execution_id
    }
}

impl Eq for ExecutionRecord {}
