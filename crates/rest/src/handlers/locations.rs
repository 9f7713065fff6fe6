//! Location handlers.
//!
//! - `GET [base]/v3/locations` - filtered, paged list
//! - `GET [base]/v3/locations/{locations_id}` - a single location

use std::collections::HashMap;

use airq_persistence::db::QueryExecutor;
use airq_persistence::query::filters::LocationPathQuery;
use airq_persistence::query::parse::parse_number;
use airq_persistence::query::{CompositeQuery, LocationsQueries, QueryBuilder, RawParams};
use airq_persistence::types::ResultEnvelope;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the location list.
///
/// # HTTP Request
///
/// `GET [base]/v3/locations?coordinates=38.907,-77.037&radius=1000&limit=100`
///
/// # Response
///
/// - `200 OK` - Result envelope of locations
/// - `400 Bad Request` - Invalid or conflicting filters
pub async fn locations_handler<E>(
    State(state): State<AppState<E>>,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<Json<ResultEnvelope>>
where
    E: QueryExecutor + 'static,
{
    debug!(params = ?params, "Processing locations request");

    let query = LocationsQueries::from_params(&RawParams::from(params), state.paging())?;
    fetch_locations(&state, &query).await
}

/// Handler for a single location.
///
/// # HTTP Request
///
/// `GET [base]/v3/locations/{locations_id}`
pub async fn location_handler<E>(
    State(state): State<AppState<E>>,
    Path(locations_id): Path<String>,
) -> RestResult<Json<ResultEnvelope>>
where
    E: QueryExecutor + 'static,
{
    debug!(locations_id = %locations_id, "Processing location request");

    let id = parse_number::<i64>("locations_id", &locations_id)?;
    let query = LocationPathQuery::new(id)?;
    fetch_locations(&state, &query).await
}

async fn fetch_locations<E, Q>(state: &AppState<E>, query: &Q) -> RestResult<Json<ResultEnvelope>>
where
    E: QueryExecutor,
    Q: CompositeQuery,
{
    let builder = QueryBuilder::new(query);
    let sql = format!(
        r#"
    SELECT id
    , name
    , ismobile as is_mobile
    , ismonitor as is_monitor
    , city as locality
    , country
    , owner
    , provider
    , coordinates
    , instruments
    , sensors
    , timezone
    , bbox(geom) as bounds
    , datetime_first
    , datetime_last
    {}
    {}
    FROM locations_view_cached
    {}
    {}
    "#,
        builder.fields(),
        builder.total(),
        builder.where_clause(),
        builder.pagination()
    );

    let envelope = state.database().fetch_page(&sql, &builder.params()).await?;
    Ok(Json(envelope))
}
