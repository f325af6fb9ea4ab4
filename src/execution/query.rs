//! Read-side access to executions.

use std::sync::Arc;

use uuid::Uuid;

use super::ExecutionRecord;
use super::ExecutionStore;
use super::ListFilter;
use super::MAX_LIST_LIMIT;

/// Query errors.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// No execution exists with the given ID.
    #[error("execution `{0}` not found")]
    NotFound(Uuid),
}

/// A read-only view over an execution store.
#[derive(Clone, Debug)]
pub struct QueryService {
    /// The store being queried.
    store: Arc<dyn ExecutionStore>,
}

impl QueryService {
    /// Creates a new query service.
    pub fn new(store: Arc<dyn ExecutionStore>) -> Self {
        Self { store }
    }

    /// Gets an execution by ID.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] if the execution does not exist.
    pub async fn get(&self, id: Uuid) -> Result<ExecutionRecord, QueryError> {
        self.store.get(id).await.ok_or(QueryError::NotFound(id))
    }

    /// Lists executions, most recently created first.
    ///
    /// The limit is capped at [`MAX_LIST_LIMIT`]. An empty listing is not an
    /// error.
    pub async fn list(&self, mut filter: ListFilter) -> Vec<ExecutionRecord> {
        filter.limit = filter.limit.min(MAX_LIST_LIMIT);
        self.store.list(&filter).await
    }
}
