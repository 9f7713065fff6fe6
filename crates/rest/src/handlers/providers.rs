//! Provider handlers.
//!
//! - `GET [base]/v3/providers` - filtered, paged list
//! - `GET [base]/v3/providers/{providers_id}` - a single provider

use std::collections::HashMap;

use airq_persistence::db::QueryExecutor;
use airq_persistence::query::filters::ProviderPathQuery;
use airq_persistence::query::parse::parse_number;
use airq_persistence::query::{CompositeQuery, ProvidersQueries, QueryBuilder, RawParams};
use airq_persistence::types::ResultEnvelope;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the provider list.
///
/// # HTTP Request
///
/// `GET [base]/v3/providers?iso=US&parameters_id=2`
pub async fn providers_handler<E>(
    State(state): State<AppState<E>>,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<Json<ResultEnvelope>>
where
    E: QueryExecutor + 'static,
{
    debug!(params = ?params, "Processing providers request");

    let query = ProvidersQueries::from_params(&RawParams::from(params), state.paging())?;
    fetch_providers(&state, &query).await
}

/// Handler for a single provider.
///
/// # HTTP Request
///
/// `GET [base]/v3/providers/{providers_id}`
pub async fn provider_handler<E>(
    State(state): State<AppState<E>>,
    Path(providers_id): Path<String>,
) -> RestResult<Json<ResultEnvelope>>
where
    E: QueryExecutor + 'static,
{
    debug!(providers_id = %providers_id, "Processing provider request");

    let id = parse_number::<i64>("providers_id", &providers_id)?;
    let query = ProviderPathQuery::new(id)?;
    fetch_providers(&state, &query).await
}

async fn fetch_providers<E, Q>(state: &AppState<E>, query: &Q) -> RestResult<Json<ResultEnvelope>>
where
    E: QueryExecutor,
    Q: CompositeQuery,
{
    let builder = QueryBuilder::new(query);
    let sql = format!(
        r#"
    SELECT id
    , name
    , source_name
    , export_prefix
    , datetime_first
    , datetime_last
    , datetime_added
    , measurements_count
    , locations_count
    , countries_count
    , owner_entity
    , parameters
    , license
    , st_asgeojson(extent)::json as bbox
    {}
    FROM providers_view_cached
    {}
    {}
    "#,
        builder.total(),
        builder.where_clause(),
        builder.pagination()
    );

    let envelope = state.database().fetch_page(&sql, &builder.params()).await?;
    Ok(Json(envelope))
}
