//! Error types for the Airq API.
//!
//! Every error renders as a JSON body `{"detail": <message>, "code": <slug>}`.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | Validation | 400 | invalid |
//! | DataError | 400 | invalid |
//! | Timeout | 408 | timeout |
//! | Unprocessable | 422 | processing |
//! | any other backend error | 500 | exception |

use std::fmt;

use airq_persistence::error::{BackendError, StorageError, ValidationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// The primary error type for API requests.
#[derive(Debug, Clone, PartialEq)]
pub enum RestError {
    /// Bad request - invalid parameters (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// The database did not answer in time (HTTP 408).
    RequestTimeout {
        /// Error message.
        message: String,
    },

    /// Unprocessable entity - semantic error (HTTP 422).
    UnprocessableEntity {
        /// Error message.
        message: String,
    },

    /// No route matches the request (HTTP 404).
    NotFound {
        /// The requested path.
        path: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// HTTP status of this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::RequestTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            RestError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable slug reported as `code`.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::BadRequest { .. } => "invalid",
            RestError::RequestTimeout { .. } => "timeout",
            RestError::UnprocessableEntity { .. } => "processing",
            RestError::NotFound { .. } => "not-found",
            RestError::InternalError { .. } => "exception",
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::RequestTimeout { message } => write!(f, "Request timeout: {}", message),
            RestError::UnprocessableEntity { message } => {
                write!(f, "Unprocessable entity: {}", message)
            }
            RestError::NotFound { path } => write!(f, "Not found: {}", path),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let detail = match &self {
            RestError::BadRequest { message }
            | RestError::RequestTimeout { message }
            | RestError::UnprocessableEntity { message }
            | RestError::InternalError { message } => message.clone(),
            RestError::NotFound { path } => format!("No route matches {}", path),
        };

        let body = serde_json::json!({
            "detail": detail,
            "code": self.code(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DataError { message } => RestError::BadRequest { message },
            BackendError::Timeout { .. } => RestError::RequestTimeout {
                message: "Connection timed out".to_string(),
            },
            BackendError::Unprocessable { message } => RestError::UnprocessableEntity { message },
            e => {
                error!(error = %e, "Unhandled backend error");
                RestError::InternalError {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;
