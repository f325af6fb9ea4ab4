//! REST API server for triggering flows and polling their executions.

mod api;
pub mod router;

pub use api::AppState;
pub use router::create_router;
pub use router::run;
