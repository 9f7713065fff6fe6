//! # airq-rest - HTTP surface of the Airq API
//!
//! Thin axum routes over [`airq_persistence`]: each handler parses its query
//! string into a composite query, assembles the statement with the query
//! builder and returns the paged result envelope.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use airq_persistence::db::{Database, PostgresBackend, PostgresConfig, ResultCache};
//! use airq_rest::{create_app_with_config, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let backend = PostgresBackend::new(PostgresConfig::default()).await?;
//!     let cache = Arc::new(ResultCache::new(config.cache_config()));
//!     let database = Arc::new(Database::new(backend, cache));
//!
//!     let app = create_app_with_config(database, config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | URL Pattern |
//! |----------|-------------|
//! | location list | `GET /v3/locations` |
//! | location | `GET /v3/locations/{locations_id}` |
//! | provider list | `GET /v3/providers` |
//! | provider | `GET /v3/providers/{providers_id}` |
//! | health | `GET /health`, `GET /_liveness`, `GET /_readiness` |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their HTTP mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (database, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use airq_persistence::db::{Database, QueryExecutor};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with custom configuration.
///
/// Sets up every route with the trace and timeout layers, plus CORS when
/// enabled.
pub fn create_app_with_config<E>(database: Arc<Database<E>>, config: ServerConfig) -> Router
where
    E: QueryExecutor + 'static,
{
    info!(
        backend = database.executor().name(),
        website = %database.website(),
        "Creating API server"
    );

    let request_timeout = Duration::from_secs(config.request_timeout);
    let cors = config.enable_cors.then(|| build_cors_layer(&config));

    let state = AppState::new(database, config);
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at start-up. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "airq={level},airq_rest={level},airq_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
