//! Airq
//!
//! Air-quality metadata API server over PostgreSQL/PostGIS.

use std::sync::Arc;

use airq_persistence::db::{Database, PostgresBackend, PostgresConfig, ResultCache};
use airq_rest::{ServerConfig, create_app_with_config, init_logging};
use clap::Parser;
use tracing::info;

/// Builds the pool configuration from the server configuration.
fn postgres_config(config: &ServerConfig) -> anyhow::Result<PostgresConfig> {
    let base = match config.database_url.as_deref() {
        Some(url) => {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresConfig::from_connection_string(url)?
        }
        None => {
            info!("No database URL configured, using PostgreSQL defaults");
            PostgresConfig::default()
        }
    };

    Ok(PostgresConfig {
        min_connections: config.db_pool_min,
        max_connections: config.db_pool_max,
        command_timeout_ms: config.db_command_timeout_ms,
        max_idle_secs: config.db_max_idle,
        ..base
    })
}

/// Resolves when the process is asked to stop.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        cache_ttl = config.cache_ttl,
        "Starting Airq"
    );

    let backend = Arc::new(PostgresBackend::new(postgres_config(&config)?).await?);
    let cache = Arc::new(ResultCache::new(config.cache_config()));
    let database = Database::new(Arc::clone(&backend), Arc::clone(&cache))
        .with_website(config.website.clone());

    let app = create_app_with_config(Arc::new(database), config.clone());
    let result = serve(app, &config).await;

    cache.clear();
    backend.close();
    info!("Server stopped");

    result
}
