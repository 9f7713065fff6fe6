//! Query execution with caching and result shaping.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{StorageResult, ValidationError};
use crate::query::value::{Params, SqlValue};
use crate::types::{Found, Meta, ResultEnvelope};

use super::cache::{CachedRows, ResultCache, cache_key};
use super::executor::QueryExecutor;
use super::render::render;
use super::row::Row;

/// Page assumed when the parameters carry none.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size assumed when the parameters carry none.
pub const DEFAULT_LIMIT: i64 = 1000;

/// Column holding a window count in paged result sets.
pub const FOUND_COLUMN: &str = "found";

/// Column holding the total in stored-procedure result sets.
pub const COUNT_COLUMN: &str = "count";

/// Entry point for running composed queries.
///
/// Owns nothing but handles: the executor and the cache are shared with the
/// rest of the process and outlive any single request.
#[derive(Debug)]
pub struct Database<E: QueryExecutor> {
    executor: E,
    cache: Arc<ResultCache>,
    website: String,
}

impl<E: QueryExecutor> Database<E> {
    /// Creates a database over `executor`, sharing `cache`.
    pub fn new(executor: E, cache: Arc<ResultCache>) -> Self {
        Self {
            executor,
            cache,
            website: "/".to_string(),
        }
    }

    /// Sets the `website` reported in envelope metadata.
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    /// The underlying executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The shared result cache.
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// The `website` reported in envelope metadata.
    pub fn website(&self) -> &str {
        &self.website
    }

    /// Renders `template` with `params`, runs it and returns every row.
    ///
    /// Identical template and parameters within the cache lifetime reuse
    /// the first result.
    pub async fn fetch(&self, template: &str, params: &Params) -> StorageResult<CachedRows> {
        let key = cache_key(template, params);
        self.cache
            .get_or_load(key, || self.execute(template, params))
            .await
    }

    async fn execute(&self, template: &str, params: &Params) -> StorageResult<Vec<Row>> {
        let rendered = render(template, params)?;
        let start = Instant::now();
        debug!(
            backend = self.executor.name(),
            sql = %rendered.sql,
            args = ?rendered.args,
            "Executing query"
        );

        match self.executor.query(&rendered.sql, &rendered.args).await {
            Ok(rows) => {
                debug!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    rows = rows.len(),
                    first_row = ?rows.first().map(Row::to_json),
                    "Query complete"
                );
                Ok(rows)
            }
            Err(e) => {
                error!(
                    error = %e,
                    sql = %rendered.sql,
                    params = ?params,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Database query failed"
                );
                Err(e)
            }
        }
    }

    /// First row, or `None` when the query returned nothing.
    pub async fn fetch_row(&self, template: &str, params: &Params) -> StorageResult<Option<Row>> {
        let rows = self.fetch(template, params).await?;
        Ok(rows.first().cloned())
    }

    /// First column of the first row, or `None` when the query returned nothing.
    pub async fn fetch_scalar(
        &self,
        template: &str,
        params: &Params,
    ) -> StorageResult<Option<Value>> {
        let row = self.fetch_row(template, params).await?;
        Ok(row.and_then(|r| r.get_index(0).cloned()))
    }

    /// Runs a paged query and wraps the rows with pagination metadata.
    ///
    /// `offset` is recomputed from `page` and `limit`. `found` is taken from
    /// a `found` column when the rows carry one; otherwise a full page
    /// reports more than `limit` rows and a short page reports its length.
    pub async fn fetch_page(&self, template: &str, params: &Params) -> StorageResult<ResultEnvelope> {
        let (page, limit) = page_and_limit(params);
        let offset = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(limit))
            .and_then(i64::checked_abs)
            .ok_or_else(|| ValidationError::invalid("page", "page and limit are out of range"))?;
        let mut params = params.clone();
        params.insert("offset".to_string(), SqlValue::Int(offset));

        let rows = self.fetch(template, &params).await?;
        let found = derive_found(&rows, limit);
        let results = rows.iter().map(|row| strip_found(row.to_json())).collect();

        Ok(ResultEnvelope {
            meta: Meta::new(
                self.website.clone(),
                page.unsigned_abs(),
                limit.unsigned_abs(),
                found,
            ),
            results,
        })
    }

    /// Runs a query whose second column already holds the response payload.
    ///
    /// The payload of the first row may be a list (used as the results) or an
    /// object or string (collected from the second column of every row). The
    /// total comes from a `count` column when present.
    pub async fn fetch_openaq_result(
        &self,
        template: &str,
        params: &Params,
    ) -> StorageResult<ResultEnvelope> {
        let (page, limit) = page_and_limit(params);
        let rows = self.fetch(template, params).await?;

        let found = rows
            .first()
            .and_then(|row| row.get(COUNT_COLUMN))
            .and_then(Found::from_value)
            .unwrap_or_default();

        let results = match rows.first().and_then(|row| row.get_index(1)) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Object(_)) | Some(Value::String(_)) => rows
                .iter()
                .filter_map(|row| row.get_index(1).cloned())
                .collect(),
            _ => Vec::new(),
        };

        Ok(ResultEnvelope {
            meta: Meta::new(
                self.website.clone(),
                page.unsigned_abs(),
                limit.unsigned_abs(),
                found,
            ),
            results,
        })
    }
}

fn page_and_limit(params: &Params) -> (i64, i64) {
    let page = params
        .get("page")
        .and_then(SqlValue::as_i64)
        .unwrap_or(DEFAULT_PAGE);
    let limit = params
        .get("limit")
        .and_then(SqlValue::as_i64)
        .unwrap_or(DEFAULT_LIMIT);
    (page, limit)
}

fn derive_found(rows: &[Row], limit: i64) -> Found {
    let Some(first) = rows.first() else {
        return Found::Exact(0);
    };
    if let Some(found) = first.get(FOUND_COLUMN).and_then(Found::from_value) {
        return found;
    }
    let count = rows.len() as u64;
    if limit > 0 && count == limit.unsigned_abs() {
        Found::MoreThan(count)
    } else {
        Found::Exact(count)
    }
}

fn strip_found(mut row: Value) -> Value {
    if let Value::Object(map) = &mut row {
        map.shift_remove(FOUND_COLUMN);
    }
    row
}
