//! Storage for execution records.

use async_trait::async_trait;
use bon::Builder;
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use tracing::debug;
use tracing::warn;
use uuid::Uuid;

use super::ExecutionRecord;
use super::ExecutionStatus;

/// The default number of records returned by a listing.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// The largest number of records a single listing may return.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Criteria for listing execution records.
///
/// Both filters are optional and must hold together.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    /// Only include records for this flow.
    ///
    /// An empty name does not filter.
    pub flow_name: Option<String>,
    /// Only include records with this status.
    pub status: Option<ExecutionStatus>,
    /// The maximum number of records to return.
    #[builder(default = DEFAULT_LIST_LIMIT)]
    pub limit: usize,
}

impl ListFilter {
    /// Returns `true` if the record satisfies the filter.
    pub fn matches(&self, record: &ExecutionRecord) -> bool {
        self.flow_name
            .as_deref()
            .is_none_or(|name| name.is_empty() || record.flow_name == name)
            && self.status.is_none_or(|status| record.status == status)
    }
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The outcome of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update was applied.
    Applied,
    /// The record exists but the requested transition is not allowed.
    Rejected {
        /// The status the record kept.
        current: ExecutionStatus,
    },
    /// No record exists with the given ID.
    NotFound,
}

/// A store of execution records.
///
/// Every operation is atomic with respect to the others. Nothing stronger is
/// promised: a `get` followed by an `update_status` is two operations.
#[async_trait]
pub trait ExecutionStore: Send + Sync + std::fmt::Debug {
    /// Creates a new pending execution and returns its ID.
    async fn create(&self, flow_name: &str, inputs: JsonValue) -> Uuid;

    /// Gets an execution by ID.
    async fn get(&self, id: Uuid) -> Option<ExecutionRecord>;

    /// Updates the status of an execution.
    ///
    /// Entering `running` stamps `started_at` the first time. Entering a
    /// terminal status stamps `completed_at` and stores the result (for
    /// `completed`) or the error (for `failed`) when supplied.
    async fn update_status(
        &self,
        id: Uuid,
        status: ExecutionStatus,
        result: Option<JsonValue>,
        error: Option<String>,
    ) -> UpdateOutcome;

    /// Lists executions matching the filter, most recently created first.
    async fn list(&self, filter: &ListFilter) -> Vec<ExecutionRecord>;

    /// Transitions an execution to `running`.
    async fn start(&self, id: Uuid) -> UpdateOutcome {
        self.update_status(id, ExecutionStatus::Running, None, None)
            .await
    }

    /// Transitions an execution to `completed` with its result.
    async fn complete(&self, id: Uuid, result: JsonValue) -> UpdateOutcome {
        self.update_status(id, ExecutionStatus::Completed, Some(result), None)
            .await
    }

    /// Transitions an execution to `failed` with an error message.
    async fn fail(&self, id: Uuid, error: String) -> UpdateOutcome {
        self.update_status(id, ExecutionStatus::Failed, None, Some(error))
            .await
    }
}

/// An in-memory execution store.
///
/// Records live for the lifetime of the process and are never evicted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// The records, in creation order.
    records: RwLock<IndexMap<Uuid, ExecutionRecord>>,
}

impl MemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the number of records in the store.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Applies a status update to a record.
fn apply_update(
    record: &mut ExecutionRecord,
    status: ExecutionStatus,
    result: Option<JsonValue>,
    error: Option<String>,
) -> UpdateOutcome {
    if !record.status.can_transition_to(status) {
        return UpdateOutcome::Rejected {
            current: record.status,
        };
    }

    record.status = status;
    let now = Utc::now();
    let created_at = record.created_at;

    if status == ExecutionStatus::Running && record.started_at.is_none() {
        record.started_at = Some(now.max(created_at));
    }

    if status.is_terminal() {
        let started_at = record.started_at.unwrap_or(created_at);
        record.completed_at = Some(now.max(started_at));

        if status == ExecutionStatus::Completed && result.is_some() {
            record.result = result;
        } else if status == ExecutionStatus::Failed && error.is_some() {
            record.error = error;
        }
    }

    UpdateOutcome::Applied
}

#[async_trait]
impl ExecutionStore for MemoryStore {
    async fn create(&self, flow_name: &str, inputs: JsonValue) -> Uuid {
        let mut records = self.records.write();

        let mut id = Uuid::new_v4();
        while records.contains_key(&id) {
            id = Uuid::new_v4();
        }

        records.insert(id, ExecutionRecord::new(id, flow_name, inputs));
        debug!(%id, flow = flow_name, "created execution");
        id
    }

    async fn get(&self, id: Uuid) -> Option<ExecutionRecord> {
        self.records.read().get(&id).cloned()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ExecutionStatus,
        result: Option<JsonValue>,
        error: Option<String>,
    ) -> UpdateOutcome {
        let mut records = self.records.write();
        let Some(record) = records.get_mut(&id) else {
            return UpdateOutcome::NotFound;
        };

        let outcome = apply_update(record, status, result, error);
        match outcome {
            UpdateOutcome::Applied => debug!(%id, %status, "updated execution status"),
            UpdateOutcome::Rejected { current } => {
                warn!(%id, %current, requested = %status, "rejected execution status update")
            }
            UpdateOutcome::NotFound => {}
        }

        outcome
    }

    async fn list(&self, filter: &ListFilter) -> Vec<ExecutionRecord> {
        let records = self.records.read();
        let mut matching: Vec<_> = records
            .values()
            .rev()
            .filter(|record| filter.matches(record))
            .collect();

        // The sort is stable, so equal timestamps keep reverse insertion order.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(filter.limit);
        matching.into_iter().cloned().collect()
    }
}
