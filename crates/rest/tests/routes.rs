//! Route tests for the Airq API.
//!
//! The full application runs against a scripted executor that records every
//! statement it receives, so these tests check request parsing, statement
//! assembly, envelope shaping and error mapping without a database.

use std::sync::{Arc, Mutex};

use airq_persistence::db::{Database, QueryExecutor, ResultCache, Row};
use airq_persistence::error::{BackendError, StorageError, StorageResult};
use airq_persistence::query::SqlValue;
use airq_rest::{ServerConfig, create_app_with_config};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

// ============================================================================
// Scripted executor
// ============================================================================

#[derive(Debug)]
struct ScriptedExecutor {
    response: StorageResult<Vec<Row>>,
    calls: Mutex<Vec<(String, Vec<SqlValue>)>>,
}

impl ScriptedExecutor {
    fn returning(rows: Vec<Row>) -> Self {
        Self {
            response: Ok(rows),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: BackendError) -> Self {
        Self {
            response: Err(StorageError::Backend(error)),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last_call(&self) -> (String, Vec<SqlValue>) {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("executor was never called")
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> StorageResult<Vec<Row>> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
        self.response.clone()
    }
}

fn create_test_server(executor: ScriptedExecutor) -> (TestServer, Arc<ScriptedExecutor>) {
    let executor = Arc::new(executor);
    let config = ServerConfig::for_testing();
    let database = Database::new(
        Arc::clone(&executor),
        Arc::new(ResultCache::new(config.cache_config())),
    )
    .with_website(config.website.clone());

    let app = create_app_with_config(Arc::new(database), config);
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, executor)
}

fn location_rows() -> Vec<Row> {
    vec![
        Row::from_pairs([
            ("id", json!(2178)),
            ("name", json!("Del Norte")),
            ("country", json!({"id": 155, "code": "US", "name": "United States"})),
            ("found", json!(2)),
        ]),
        Row::from_pairs([
            ("id", json!(2179)),
            ("name", json!("Jefferson")),
            ("country", json!({"id": 155, "code": "US", "name": "United States"})),
            ("found", json!(2)),
        ]),
    ]
}

// ============================================================================
// Locations
// ============================================================================

#[tokio::test]
async fn test_locations_list() {
    let (server, executor) = create_test_server(ScriptedExecutor::returning(location_rows()));

    let response = server.get("/v3/locations?iso=US&monitor=true").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["meta"]["website"], json!("http://localhost"));
    assert_eq!(body["meta"]["page"], json!(1));
    assert_eq!(body["meta"]["limit"], json!(10));
    assert_eq!(body["meta"]["found"], json!(2));
    assert_eq!(body["results"][0]["name"], json!("Del Norte"));
    assert!(body["results"][0].get("found").is_none());

    let (sql, args) = executor.last_call();
    assert!(sql.contains("FROM locations_view_cached"));
    assert!(sql.contains("COUNT(1) OVER() as found"));
    assert!(sql.contains("WHERE country->>'code' = $1\nAND ismonitor = $2"));
    assert!(sql.contains("LIMIT $3 OFFSET $4"));
    assert_eq!(
        args,
        vec![
            SqlValue::Text("US".into()),
            SqlValue::Bool(true),
            SqlValue::Int(10),
            SqlValue::Int(0),
        ]
    );
}

#[tokio::test]
async fn test_locations_radius_adds_distance() {
    let (server, executor) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    let response = server
        .get("/v3/locations?coordinates=38.907,-77.037&radius=1000&page=2&limit=5")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["meta"]["found"], json!(0));
    assert_eq!(body["results"], json!([]));

    let (sql, args) = executor.last_call();
    assert!(sql.contains("as distance"));
    assert!(sql.contains("ST_DWithin"));
    assert_eq!(args.last(), Some(&SqlValue::Int(5)));
}

#[tokio::test]
async fn test_locations_radius_and_bbox_rejected() {
    let (server, executor) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    let response = server
        .get("/v3/locations?coordinates=38.907,-77.037&radius=1000&bbox=-77.1,38.8,-76.9,39.0")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("invalid"));
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("radius and bbox cannot be used together")
    );
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_locations_radius_without_coordinates_rejected() {
    let (server, _) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    let response = server.get("/v3/locations?radius=1000").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_locations_limit_over_maximum_rejected() {
    let (server, executor) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    let response = server.get("/v3/locations?limit=101").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("limit"));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_location_by_id() {
    let (server, executor) =
        create_test_server(ScriptedExecutor::returning(vec![Row::from_pairs([
            ("id", json!(2178)),
            ("name", json!("Del Norte")),
        ])]));

    let response = server.get("/v3/locations/2178").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["results"], json!([{"id": 2178, "name": "Del Norte"}]));
    assert_eq!(body["meta"]["found"], json!(1));

    let (sql, args) = executor.last_call();
    assert!(sql.contains("WHERE id = $1"));
    assert!(!sql.contains("COUNT(1) OVER()"));
    assert!(!sql.contains("LIMIT"));
    assert_eq!(args, vec![SqlValue::Int(2178)]);
}

#[tokio::test]
async fn test_location_invalid_id() {
    let (server, executor) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    server
        .get("/v3/locations/0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/v3/locations/abc")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(executor.call_count(), 0);
}

// ============================================================================
// Providers
// ============================================================================

#[tokio::test]
async fn test_providers_list() {
    let (server, executor) =
        create_test_server(ScriptedExecutor::returning(vec![Row::from_pairs([
            ("id", json!(62)),
            ("name", json!("AirNow")),
        ])]));

    let response = server
        .get("/v3/providers?parameters_id=2,5&countries_id=155")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["results"][0]["name"], json!("AirNow"));

    let (sql, args) = executor.last_call();
    assert!(sql.contains("FROM providers_view_cached"));
    assert!(sql.contains("(country->'id')::int = ANY ($1)"));
    assert!(sql.contains("parameters_id = ANY ($2)"));
    assert_eq!(args[0], SqlValue::IntList(vec![155]));
    assert_eq!(args[1], SqlValue::IntList(vec![2, 5]));
}

#[tokio::test]
async fn test_provider_by_id() {
    let (server, executor) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    server.get("/v3/providers/62").await.assert_status_ok();

    let (sql, args) = executor.last_call();
    assert!(sql.contains("FROM providers_view_cached"));
    assert!(sql.contains("WHERE id = $1"));
    assert_eq!(args, vec![SqlValue::Int(62)]);
}

#[tokio::test]
async fn test_invalid_id_list_rejected() {
    let (server, _) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    let response = server.get("/v3/providers?countries_id=1,2,foo").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_repeated_request_served_from_cache() {
    let (server, executor) = create_test_server(ScriptedExecutor::returning(location_rows()));

    let first: Value = server.get("/v3/locations?iso=US").await.json();
    let second: Value = server.get("/v3/locations?iso=US").await.json();

    assert_eq!(first, second);
    assert_eq!(executor.call_count(), 1);

    server.get("/v3/locations?iso=FR").await.assert_status_ok();
    assert_eq!(executor.call_count(), 2);
}

// ============================================================================
// Backend errors
// ============================================================================

#[tokio::test]
async fn test_backend_timeout_is_408() {
    let (server, _) = create_test_server(ScriptedExecutor::failing(BackendError::Timeout {
        timeout_ms: 6000,
    }));

    let response = server.get("/v3/locations").await;
    response.assert_status(StatusCode::REQUEST_TIMEOUT);

    let body: Value = response.json();
    assert_eq!(body["detail"], json!("Connection timed out"));
    assert_eq!(body["code"], json!("timeout"));
}

#[tokio::test]
async fn test_backend_data_error_is_400() {
    let (server, _) = create_test_server(ScriptedExecutor::failing(BackendError::DataError {
        message: "invalid input syntax for type integer".to_string(),
    }));

    server
        .get("/v3/providers")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_backend_tiling_error_is_422() {
    let (server, _) = create_test_server(ScriptedExecutor::failing(BackendError::Unprocessable {
        message: "ST_TileEnvelope: Invalid tile x value".to_string(),
    }));

    server
        .get("/v3/locations")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_backend_internal_error_is_500() {
    let (server, _) = create_test_server(ScriptedExecutor::failing(BackendError::Internal {
        backend_name: "postgres".to_string(),
        message: "relation does not exist".to_string(),
    }));

    let response = server.get("/v3/locations").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("exception"));
}

// ============================================================================
// Probes and fallback
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let (server, _) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    let health = server.get("/health").await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["backend"], json!("scripted"));

    server.get("/_liveness").await.assert_status_ok();

    let ready = server.get("/_readiness").await;
    ready.assert_status_ok();
    let body: Value = ready.json();
    assert_eq!(body["status"], json!("ready"));
}

#[tokio::test]
async fn test_readiness_reports_unavailable_database() {
    let (server, _) = create_test_server(ScriptedExecutor::failing(BackendError::ConnectionFailed {
        backend_name: "postgres".to_string(),
        message: "connection refused".to_string(),
    }));

    let response = server.get("/_readiness").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let (server, _) = create_test_server(ScriptedExecutor::returning(Vec::new()));

    let response = server.get("/v3/sensors").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("not-found"));
    assert_eq!(body["detail"], json!("No route matches /v3/sensors"));
}
