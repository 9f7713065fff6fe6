//! Execution layer.
//!
//! [`Database`] takes a SQL template with `:name` placeholders plus a
//! parameter map, renders it to positional SQL, consults the shared
//! [`ResultCache`], runs misses through a [`QueryExecutor`] and shapes the
//! rows into a [`ResultEnvelope`](crate::types::ResultEnvelope).

mod cache;
mod database;
mod executor;
mod render;
mod row;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use cache::{CacheConfig, CacheStats, CachedRows, ResultCache, cache_key};
pub use database::{COUNT_COLUMN, DEFAULT_LIMIT, DEFAULT_PAGE, Database, FOUND_COLUMN};
pub use executor::QueryExecutor;
pub use render::{RenderedQuery, render};
pub use row::Row;

#[cfg(feature = "postgres")]
pub use postgres::{PostgresBackend, PostgresConfig, PostgresSslMode};
