//! End-to-end composition: raw request parameters through the query builder
//! into positional SQL.

use airq_persistence::db::render;
use airq_persistence::error::ValidationError;
use airq_persistence::query::filters::{LocationPathQuery, PagingPolicy};
use airq_persistence::query::{
    LocationsQueries, ProvidersQueries, QueryBuilder, RawParams, SqlValue,
};

fn locations_sql(query: &LocationsQueries) -> String {
    let builder = QueryBuilder::new(query);
    format!(
        "SELECT id, name, country {} {}\nFROM locations_view_cached\n{}\n{}",
        builder.fields(),
        builder.total(),
        builder.where_clause(),
        builder.pagination()
    )
}

#[test]
fn test_locations_radius_country_and_paging() {
    let raw = RawParams::from_pairs([
        ("coordinates", "38.907,-77.037"),
        ("radius", "1000"),
        ("iso", "US"),
        ("limit", "5"),
        ("page", "2"),
    ]);
    let query = LocationsQueries::from_params(&raw, &PagingPolicy::default()).unwrap();
    let builder = QueryBuilder::new(&query);
    let sql = locations_sql(&query);

    assert!(sql.contains(
        "\n,ST_Distance(geog, ST_MakePoint(:lon, :lat)::geography) as distance"
    ));
    assert!(sql.contains(", COUNT(1) OVER() as found"));
    assert!(sql.contains(
        "WHERE ST_DWithin(ST_MakePoint(:lon, :lat)::geography, geog, :radius)\nAND country->>'code' = :iso"
    ));
    assert!(sql.ends_with("\nLIMIT :limit OFFSET :offset"));

    let rendered = render(&sql, &builder.params()).unwrap();
    assert!(!rendered.sql.contains(":lon"));
    assert!(rendered.sql.contains("::geography"));
    assert!(rendered.sql.ends_with("LIMIT $5 OFFSET $6"));
    assert_eq!(
        rendered.names,
        vec!["lon", "lat", "radius", "iso", "limit", "offset"]
    );
    assert_eq!(rendered.args[0], SqlValue::Float(-77.037));
    assert_eq!(rendered.args[1], SqlValue::Float(38.907));
    assert_eq!(rendered.args[2], SqlValue::Int(1000));
    assert_eq!(rendered.args[3], SqlValue::Text("US".into()));
    assert_eq!(rendered.args[4], SqlValue::Int(5));
    assert_eq!(rendered.args[5], SqlValue::Int(5));
}

#[test]
fn test_locations_without_filters_only_pages() {
    let query = LocationsQueries::from_params(&RawParams::default(), &PagingPolicy::default())
        .unwrap();
    let builder = QueryBuilder::new(&query);

    assert_eq!(builder.where_clause(), "");
    assert_eq!(builder.fields(), "");
    assert_eq!(builder.pagination(), "\nLIMIT :limit OFFSET :offset");

    let params = builder.params();
    assert_eq!(params.get("limit"), Some(&SqlValue::Int(100)));
    assert_eq!(params.get("offset"), Some(&SqlValue::Int(0)));
    assert_eq!(params.get("iso"), Some(&SqlValue::Null));
}

#[test]
fn test_identical_input_yields_identical_sql() {
    let raw = RawParams::from_pairs([
        ("providers_id", "3,1,2"),
        ("mobile", "false"),
        ("bbox", "-77.1,38.8,-76.9,39.0"),
    ]);
    let a = LocationsQueries::from_params(&raw, &PagingPolicy::default()).unwrap();
    let b = LocationsQueries::from_params(&raw, &PagingPolicy::default()).unwrap();

    assert_eq!(locations_sql(&a), locations_sql(&b));
    assert_eq!(QueryBuilder::new(&a).params(), QueryBuilder::new(&b).params());
}

#[test]
fn test_radius_and_bbox_conflict() {
    let raw = RawParams::from_pairs([
        ("coordinates", "38.907,-77.037"),
        ("radius", "1000"),
        ("bbox", "-77.1,38.8,-76.9,39.0"),
    ]);
    let err = LocationsQueries::from_params(&raw, &PagingPolicy::default()).unwrap_err();
    assert!(matches!(err, ValidationError::ConflictingFilters { .. }));
    assert!(err.to_string().contains("radius and bbox cannot be used together"));
}

#[test]
fn test_limit_over_policy_rejected() {
    let raw = RawParams::from_pairs([("limit", "500")]);
    let err = ProvidersQueries::from_params(&raw, &PagingPolicy::new(100, 200)).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InvalidParameter { ref parameter, .. } if parameter == "limit"
    ));
}

#[test]
fn test_providers_parameter_membership() {
    let raw = RawParams::from_pairs([("parameters_id", "2,5"), ("monitor", "true")]);
    let query = ProvidersQueries::from_params(&raw, &PagingPolicy::default()).unwrap();
    let builder = QueryBuilder::new(&query);

    let where_clause = builder.where_clause();
    assert!(where_clause.starts_with("WHERE "));
    assert!(where_clause.contains(":parameters_id"));
    assert!(where_clause.contains("ismonitor = :monitor"));
    assert_eq!(
        builder.params().get("parameters_id"),
        Some(&SqlValue::IntList(vec![2, 5]))
    );
}

#[test]
fn test_path_query_has_no_paging() {
    let query = LocationPathQuery::new(2178).unwrap();
    let builder = QueryBuilder::new(&query);

    assert_eq!(builder.where_clause(), "WHERE id = :locations_id");
    assert_eq!(builder.total(), "");
    assert_eq!(builder.pagination(), "");

    let rendered = render(
        &format!("SELECT id FROM locations_view_cached {}", builder.where_clause()),
        &builder.params(),
    )
    .unwrap();
    assert_eq!(rendered.sql, "SELECT id FROM locations_view_cached WHERE id = $1");
    assert_eq!(rendered.args, vec![SqlValue::Int(2178)]);
}
