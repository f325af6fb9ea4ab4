//! API error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Deserialize;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::execution::QueryError;
use crate::flow::FlowError;

/// Internal server error message.
const INTERNAL_ERROR_MESSAGE: &str =
    "an internal server error occurred; contact the system administrator for more information";

/// API error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error kind.
    pub kind: String,
    /// Error message.
    pub message: String,
}

/// API error type.
#[derive(Debug)]
pub enum Error {
    /// A "bad request" error (`400`).
    BadRequest(String),

    /// A "not found" error (`404`).
    NotFound(String),

    /// An "internal server" error (`500`).
    Internal,
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

impl From<FlowError> for Error {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InvalidOverrides { .. } => Self::BadRequest(err.to_string()),
            FlowError::Unknown(_) => Self::NotFound(err.to_string()),
            FlowError::Inputs(e) => {
                error!("failed to record flow inputs: {e}");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(format!("invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        match rejection {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                Self::BadRequest(format!("invalid query parameters: {}", err.body_text()))
            }
            _ => Self::BadRequest("invalid query parameters".to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", msg),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal",
                String::from(INTERNAL_ERROR_MESSAGE),
            ),
        };

        let body = Json(ErrorResponse {
            kind: kind.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
