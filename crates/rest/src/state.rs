//! Application state shared by every request handler.

use std::sync::Arc;

use airq_persistence::db::{Database, QueryExecutor};
use airq_persistence::query::filters::PagingPolicy;

use crate::config::ServerConfig;

/// Shared application state for the API.
///
/// Holds the [`Database`] (and through it the pool and result cache) plus the
/// server configuration. Cloning is cheap: both are behind `Arc`s.
///
/// # Type Parameters
///
/// * `E` - The query executor backing the database
pub struct AppState<E: QueryExecutor> {
    database: Arc<Database<E>>,
    config: Arc<ServerConfig>,
    paging: PagingPolicy,
}

// Manually implement Clone since E is wrapped in Arc and doesn't need to be Clone
impl<E: QueryExecutor> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            database: Arc::clone(&self.database),
            config: Arc::clone(&self.config),
            paging: self.paging,
        }
    }
}

impl<E: QueryExecutor> AppState<E> {
    /// Creates a new AppState from a database and configuration.
    pub fn new(database: Arc<Database<E>>, config: ServerConfig) -> Self {
        let paging = config.paging_policy();
        Self {
            database,
            config: Arc::new(config),
            paging,
        }
    }

    /// Returns a reference to the database.
    pub fn database(&self) -> &Database<E> {
        &self.database
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Paging limits for list endpoints.
    pub fn paging(&self) -> &PagingPolicy {
        &self.paging
    }
}
