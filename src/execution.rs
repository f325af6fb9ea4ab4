//! Execution tracking.
//!
//! An execution moves through `pending`, `running`, and then either
//! `completed` or `failed`. The [`ExecutionStore`] owns every record, the
//! [`ExecutionRunner`] is the only writer after creation, and the
//! [`QueryService`] serves reads.

pub mod query;
pub mod record;
pub mod runner;
pub mod store;

pub use query::QueryError;
pub use query::QueryService;
pub use record::ExecutionRecord;
pub use record::ExecutionStatus;
pub use runner::ExecutionRunner;
pub use runner::Submission;
pub use store::DEFAULT_LIST_LIMIT;
pub use store::ExecutionStore;
pub use store::ListFilter;
pub use store::MAX_LIST_LIMIT;
pub use store::MemoryStore;
pub use store::UpdateOutcome;
