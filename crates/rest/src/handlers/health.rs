//! Health check endpoint handlers.
//!
//! Provides health, liveness and readiness endpoints for monitoring and load
//! balancers.

use airq_persistence::db::QueryExecutor;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<E>(State(state): State<AppState<E>>) -> Response
where
    E: QueryExecutor + 'static,
{
    debug!("Processing health check request");

    let stats = state.database().cache().stats();
    let body = serde_json::json!({
        "status": "healthy",
        "backend": state.database().executor().name(),
        "cache": {
            "hits": stats.hits(),
            "misses": stats.misses(),
        },
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(body)).into_response()
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe. Runs a trivial query through the executor.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Database answered
/// - `503 Service Unavailable` - Database unreachable
pub async fn readiness_handler<E>(State(state): State<AppState<E>>) -> Response
where
    E: QueryExecutor + 'static,
{
    debug!("Processing readiness check request");

    let backend = state.database().executor().name();
    match state.database().executor().health_check().await {
        Ok(()) => {
            let body = serde_json::json!({
                "status": "ready",
                "backend": backend,
                "checks": { "database": "ok" }
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            let body = serde_json::json!({
                "status": "unavailable",
                "backend": backend,
                "checks": { "database": e.to_string() }
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}
