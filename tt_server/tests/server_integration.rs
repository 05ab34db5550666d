//! Integration tests for the HTTP endpoints.
//!
//! Tests health reporting, snapshot reads and CORS.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Duration;
use tabletime::auth::AdminCredentials;
use tabletime::floor::Floor;
use tabletime::sync::{ClientEvent, Dispatcher, FloorActor, FloorHandle};
use tokio::time::timeout;
use tower::ServiceExt; // For `oneshot` method
use tt_server::api::{AppState, create_router};
use tt_server::config::ServerConfig;
use uuid::Uuid;

/// Helper to create test server with its floor handle
fn create_test_server() -> (axum::Router, FloorHandle) {
    let config = ServerConfig::default();
    let dispatcher = Dispatcher::new(Floor::standard(), AdminCredentials::default());
    let floor = FloorActor::spawn(dispatcher, 16);

    let app = create_router(AppState::new(floor.clone(), &config));
    (app, floor)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = timeout(Duration::from_secs(5), app.oneshot(request))
        .await
        .expect("Request should complete within timeout")
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server();

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tables"]["total"], 20);
    assert_eq!(body["tables"]["busy"], 0);
    assert_eq!(body["connections"], 0);
    assert_eq!(body["events"]["broadcasts"], 0);
}

#[tokio::test]
async fn test_health_check_after_shutdown() {
    let (app, floor) = create_test_server();
    floor.shutdown().await.unwrap();

    timeout(Duration::from_secs(2), async {
        while !floor.is_closed() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

// ============================================================================
// Snapshot Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_snapshot_endpoint_initial_state() {
    let (app, _) = create_test_server();

    let (status, body) = get_json(app, "/api/v1/tables").await;

    assert_eq!(status, StatusCode::OK);
    let tables = body["tables"].as_object().unwrap();
    assert_eq!(tables.len(), 20);
    assert!(!tables.contains_key("13"));
    assert!(!tables.contains_key("17"));
    assert_eq!(tables["8"]["capacity"], 8);
    assert_eq!(tables["8"]["start"], Value::Null);
    assert_eq!(body["recentCleared"], serde_json::json!([]));
}

#[tokio::test]
async fn test_snapshot_endpoint_reflects_intents() {
    let (app, floor) = create_test_server();
    let conn_id = Uuid::new_v4();

    floor
        .dispatch(
            conn_id,
            ClientEvent::decode(r#"{"event":"start_table","data":{"id":5}}"#).unwrap(),
        )
        .await
        .unwrap();
    floor
        .dispatch(
            conn_id,
            ClientEvent::decode(r#"{"event":"clear_table","data":{"id":6}}"#).unwrap(),
        )
        .await
        .unwrap();

    let (_, health) = get_json(app.clone(), "/health").await;
    assert_eq!(health["tables"]["busy"], 1);
    assert_eq!(health["events"]["broadcasts"], 2);

    let (_, body) = get_json(app, "/api/v1/tables").await;
    assert_eq!(body["tables"]["5"]["billed"], true);
    assert!(body["tables"]["5"]["start"].is_i64());
    assert_eq!(body["recentCleared"][0], "Table 6 (2 pac)");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (app, _) = create_test_server();

    let (status, _) = get_json(app, "/api/v1/tables/5/start").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// CORS Tests
// ============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://pos.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_websocket_route_requires_upgrade() {
    let (app, _) = create_test_server();

    let request = Request::builder().uri("/ws").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    // Plain GET without upgrade headers is rejected by the extractor
    assert!(response.status().is_client_error());
}
