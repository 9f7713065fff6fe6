//! HTTP request handlers.
//!
//! - [`locations`] - Location list and lookup
//! - [`providers`] - Provider list and lookup
//! - [`health`] - Health, liveness and readiness probes

pub mod health;
pub mod locations;
pub mod providers;

use axum::http::Uri;

use crate::error::RestError;

// Re-export handlers for convenience
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use locations::{location_handler, locations_handler};
pub use providers::{provider_handler, providers_handler};

/// Fallback for paths no route matches.
pub async fn not_found_handler(uri: Uri) -> RestError {
    RestError::NotFound {
        path: uri.path().to_string(),
    }
}
