//! Error types for the REST API.
//!
//! One variant per HTTP failure class. Domain and database errors convert
//! into these at the handler boundary (`?`), and `IntoResponse` turns them
//! into the failure envelope with the right status code:
//!
//! ```text
//!   Validation   → 400   bad input, state machine refusals, insufficiency
//!   NotFound     → 404   missing categories, elements, serials, routes
//!   Conflict     → 409   uniqueness and referential-integrity violations
//!   Unavailable  → 503   pool exhausted, connection lost
//!   Internal     → 500   everything else; cause logged, message generic
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inventario_core::{CoreError, ValidationError};
use inventario_db::DbError;
use tracing::{error, warn};

use crate::response::Envelope;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unavailable(msg) => {
                warn!(cause = %msg, "Database unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            ApiError::Internal(msg) => {
                // Log the cause; the client gets a generic message.
                error!(cause = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(Envelope::failure(message))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation => {
                ApiError::Conflict(err.to_string())
            }
            DbError::InsufficientQuantity { .. } => ApiError::Validation(err.to_string()),
            DbError::PoolExhausted | DbError::ConnectionFailed(_) => {
                ApiError::Unavailable(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Result type alias for handler functions
pub type ApiResult<T> = Result<T, ApiError>;
