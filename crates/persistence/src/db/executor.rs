//! Executor abstraction over database drivers.
//!
//! [`Database`](super::Database) renders and caches; a [`QueryExecutor`] only
//! runs positional-parameter SQL and classifies driver errors into
//! [`BackendError`](crate::error::BackendError)s.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::query::value::SqlValue;

use super::row::Row;

/// Runs rendered statements against a backend.
#[async_trait]
pub trait QueryExecutor: Send + Sync + Debug {
    /// Returns a human-readable name for this backend.
    fn name(&self) -> &'static str;

    /// Executes `sql` with `$1..$n` bound to `args` and returns every row.
    async fn query(&self, sql: &str, args: &[SqlValue]) -> StorageResult<Vec<Row>>;

    /// Checks that the backend is reachable and answering.
    async fn health_check(&self) -> StorageResult<()> {
        self.query("SELECT 1", &[]).await.map(|_| ())
    }
}

#[async_trait]
impl<E: QueryExecutor + ?Sized> QueryExecutor for Arc<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> StorageResult<Vec<Row>> {
        (**self).query(sql, args).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        (**self).health_check().await
    }
}
