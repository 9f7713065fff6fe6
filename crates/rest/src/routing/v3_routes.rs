//! Version 3 route configuration.

use airq_persistence::db::QueryExecutor;
use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Creates all API routes.
///
/// # Routes
///
/// ## Probes
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## v3
/// - `GET /v3/locations` - Location list
/// - `GET /v3/locations/{locations_id}` - Location by id
/// - `GET /v3/providers` - Provider list
/// - `GET /v3/providers/{providers_id}` - Provider by id
///
/// Unmatched paths answer 404 with a JSON error body.
pub fn create_routes<E>(state: AppState<E>) -> Router
where
    E: QueryExecutor + 'static,
{
    Router::new()
        // Probes
        .route("/health", get(handlers::health_handler::<E>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<E>))
        // v3
        .route("/v3/locations", get(handlers::locations_handler::<E>))
        .route(
            "/v3/locations/{locations_id}",
            get(handlers::location_handler::<E>),
        )
        .route("/v3/providers", get(handlers::providers_handler::<E>))
        .route(
            "/v3/providers/{providers_id}",
            get(handlers::provider_handler::<E>),
        )
        .fallback(handlers::not_found_handler)
        .with_state(state)
}
