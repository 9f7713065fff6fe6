//! Airq Persistence Layer
//!
//! This crate turns validated request parameters into parameterized SQL and
//! runs it against PostgreSQL/PostGIS, with a shared, time-bounded result
//! cache in front of the database.
//!
//! # Architecture
//!
//! - [`query`] - filter units, composite queries and the query builder
//! - [`db`] - placeholder rendering, result cache, executors and [`Database`]
//! - [`types`] - the paged result envelope
//! - [`error`] - error types for all operations
//!
//! # Backend Features
//!
//! - `postgres` (default) - PostgreSQL executor over `deadpool-postgres`
//!
//! # Quick Start
//!
//! ```
//! use airq_persistence::query::filters::PagingPolicy;
//! use airq_persistence::query::{LocationsQueries, QueryBuilder, RawParams};
//!
//! let raw = RawParams::from_pairs([("iso", "us"), ("monitor", "true"), ("limit", "10")]);
//! let query = LocationsQueries::from_params(&raw, &PagingPolicy::default()).unwrap();
//! let builder = QueryBuilder::new(&query);
//!
//! let sql = format!(
//!     "SELECT id, name {} {} FROM locations_view_cached {} {}",
//!     builder.fields(),
//!     builder.total(),
//!     builder.where_clause(),
//!     builder.pagination(),
//! );
//! assert!(sql.contains("WHERE country->>'code' = :iso\nAND ismonitor = :monitor"));
//! assert!(sql.contains("COUNT(1) OVER() as found"));
//! assert!(sql.ends_with("LIMIT :limit OFFSET :offset"));
//! ```
//!
//! Executing the statement goes through [`Database`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use airq_persistence::db::{CacheConfig, Database, PostgresBackend, PostgresConfig, ResultCache};
//! use airq_persistence::query::Params;
//!
//! # async fn run() -> airq_persistence::StorageResult<()> {
//! let backend = PostgresBackend::new(PostgresConfig::default()).await?;
//! let cache = Arc::new(ResultCache::new(CacheConfig::default()));
//! let db = Database::new(backend, cache);
//!
//! let envelope = db
//!     .fetch_page("SELECT id, name FROM locations_view_cached LIMIT :limit OFFSET :offset",
//!         &Params::from([("limit".to_string(), 10_i64.into())]))
//!     .await?;
//! println!("{}", envelope.meta.found);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod db;
pub mod error;
pub mod query;
pub mod types;

// Re-export commonly used types at crate root
pub use db::{Database, QueryExecutor, ResultCache, Row};
pub use error::{BackendError, StorageError, StorageResult, ValidationError};
pub use query::{CompositeQuery, Params, QueryBuilder, RawParams, SqlValue};
pub use types::{Found, Meta, ResultEnvelope};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
