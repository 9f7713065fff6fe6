//! Error types for the persistence layer.
//!
//! Errors are split the same way a request fails: [`ValidationError`]s are
//! raised while filter units and composite queries are constructed, before any
//! SQL exists, and [`BackendError`]s are raised once, at the point a backend
//! call returns, after the raw driver error has been classified.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all query and execution operations.
///
/// Every variant is `Clone` so that a failed load shared by several waiters on
/// the same cache entry can be handed to each of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Malformed or contradictory filter input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Classified backend failures.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true when the caller, not the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            StorageError::Validation(_) => true,
            StorageError::Backend(e) => matches!(
                e,
                BackendError::DataError { .. } | BackendError::Unprocessable { .. }
            ),
        }
    }
}

/// Errors raised while validating raw request input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A single parameter failed to parse or is out of range.
    #[error("invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Two or more filters cannot be used in the same request.
    #[error("{message}")]
    ConflictingFilters { message: String },

    /// A parameter that must accompany another one is absent.
    #[error("missing required parameter: {parameter}")]
    MissingParameter { parameter: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidParameter`].
    pub fn invalid(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`ValidationError::ConflictingFilters`].
    pub fn conflict(message: impl Into<String>) -> Self {
        ValidationError::ConflictingFilters {
            message: message.into(),
        }
    }
}

/// Errors originating from the database backend or from statement rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The backend rejected a column reference, value type or value range.
    #[error("{message}")]
    DataError { message: String },

    /// The backend did not answer within the command timeout.
    #[error("connection timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// A recognised geometry/tiling failure.
    #[error("{message}")]
    Unprocessable { message: String },

    /// A connection could not be checked out of the pool.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// The SQL template could not be rendered with the supplied parameters.
    #[error("failed to render query: {message}")]
    Render { message: String },

    /// Any other backend failure.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
    },
}

/// Result type alias for query and execution operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for filter validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
