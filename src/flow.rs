//! Units of work that can be executed and tracked.

use serde::Serialize;
use serde::de::DeserializeOwned;

pub mod poem;

pub use poem::PoemFlow;

/// Flow errors raised before an execution is created.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The overrides supplied to the flow are invalid.
    #[error("invalid overrides for flow `{flow}`: {message}")]
    InvalidOverrides {
        /// The name of the flow.
        flow: &'static str,
        /// A description of the problem.
        message: String,
    },

    /// The overrides could not be captured as execution inputs.
    #[error("failed to serialize flow inputs: {0}")]
    Inputs(#[from] serde_json::Error),

    /// No flow with the given name exists.
    #[error("unknown flow `{0}`")]
    Unknown(String),
}

/// A unit of work.
///
/// A flow is constructed from its overrides, executed synchronously to
/// completion, and then asked for its result. Execution happens on a blocking
/// thread, so [`execute()`][Flow::execute] is free to block for as long as it
/// needs.
pub trait Flow: Send + 'static {
    /// Overrides accepted when constructing the flow.
    type Overrides: Serialize + DeserializeOwned + Send;

    /// The result of a successful execution.
    type Output: Serialize;

    /// The name executions of this flow are recorded under.
    const NAME: &'static str;

    /// Creates the flow, validating the overrides.
    fn new(overrides: Self::Overrides) -> Result<Self, FlowError>
    where
        Self: Sized;

    /// Executes the flow.
    fn execute(&mut self) -> anyhow::Result<()>;

    /// Gets the result of the last successful execution.
    fn result(&self) -> Option<Self::Output>;
}

/// Gets the names of every flow available to run.
pub fn names() -> &'static [&'static str] {
    &[PoemFlow::NAME]
}
