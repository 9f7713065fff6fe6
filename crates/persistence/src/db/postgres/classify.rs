//! Mapping of PostgreSQL errors onto [`BackendError`].

use std::error::Error as _;

use crate::error::BackendError;

use super::bind::BindError;

/// `undefined_column`
const UNDEFINED_COLUMN: &str = "42703";

/// `character_not_in_repertoire`
const CHARACTER_NOT_IN_REPERTOIRE: &str = "22021";

/// SQLSTATE class 22, `data_exception`.
const DATA_EXCEPTION_CLASS: &str = "22";

const TILE_ENVELOPE_PREFIX: &str = "ST_TileEnvelope";

/// Classifies a failure from its SQLSTATE and message.
pub fn classify(sqlstate: Option<&str>, message: &str) -> BackendError {
    let client_fault = matches!(
        sqlstate,
        Some(code) if code == UNDEFINED_COLUMN
            || code == CHARACTER_NOT_IN_REPERTOIRE
            || code.starts_with(DATA_EXCEPTION_CLASS)
    );

    if client_fault {
        BackendError::DataError {
            message: message.to_string(),
        }
    } else if message.starts_with(TILE_ENVELOPE_PREFIX) {
        BackendError::Unprocessable {
            message: message.to_string(),
        }
    } else {
        BackendError::Internal {
            backend_name: "postgres".to_string(),
            message: message.to_string(),
        }
    }
}

/// Out-of-range parameters are the caller's fault; a type the binder cannot
/// represent is not.
fn classify_bind(e: &BindError) -> BackendError {
    match e {
        BindError::OutOfRange { .. } => BackendError::DataError {
            message: e.to_string(),
        },
        BindError::Unsupported { .. } => BackendError::Internal {
            backend_name: "postgres".to_string(),
            message: e.to_string(),
        },
    }
}

/// Classifies a driver error.
pub fn classify_error(e: &tokio_postgres::Error) -> BackendError {
    if let Some(bind) = e.source().and_then(|s| s.downcast_ref::<BindError>()) {
        return classify_bind(bind);
    }
    match e.as_db_error() {
        Some(db) => classify(Some(db.code().code()), db.message()),
        None if e.is_closed() => BackendError::ConnectionFailed {
            backend_name: "postgres".to_string(),
            message: e.to_string(),
        },
        None => classify(e.code().map(|c| c.code()), &e.to_string()),
    }
}
