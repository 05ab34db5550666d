//! HTTP/WebSocket API for the floor server.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP/WebSocket
//! - **Tower HTTP**: permissive CORS for browser clients on any origin
//! - **Actor Model**: floor state is owned by a single `FloorActor` task;
//!   handlers only hold a cloneable `FloorHandle`
//!
//! # Modules
//!
//! - [`websocket`]: real-time bidirectional channel carrying intents and updates
//! - [`tables`]: read-only snapshot endpoint
//! - [`rate_limiter`]: per-connection inbound frame limits
//!
//! # Endpoints
//!
//! ```text
//! GET /health          - Health check
//! GET /api/v1/tables   - Current floor snapshot
//! GET /ws              - WebSocket connection
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tabletime::{auth::AdminCredentials, floor::Floor, sync::{Dispatcher, FloorActor}};
//! use tt_server::api::{AppState, create_router};
//! use tt_server::config::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::default();
//! let dispatcher = Dispatcher::new(Floor::standard(), AdminCredentials::default());
//! let floor = FloorActor::spawn(dispatcher, config.channels.floor_inbox_capacity);
//!
//! let app = create_router(AppState::new(floor, &config));
//! let listener = tokio::net::TcpListener::bind(config.bind).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod rate_limiter;
pub mod tables;
pub mod websocket;

use crate::config::{RateLimitConfig, ServerConfig};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tabletime::sync::FloorHandle;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers and WebSocket connections.
///
/// Cloned for each request; every field is a handle or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the floor actor
    pub floor: FloorHandle,
    /// Inbound frame limits applied to each connection
    pub rate_limit: RateLimitConfig,
    /// Outbound queue size per connection
    pub client_channel_capacity: usize,
    /// Number of open WebSocket connections
    pub connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(floor: FloorHandle, config: &ServerConfig) -> Self {
        Self {
            floor,
            rate_limit: config.rate_limit.clone(),
            client_channel_capacity: config.channels.client_capacity,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new().route("/tables", get(tables::get_snapshot));

    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(websocket::websocket_handler))
        .nest("/api/v1", v1_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` while the floor actor answers, `503 Service Unavailable`
/// once it has stopped.
///
/// # Example
///
/// ```bash
/// curl http://localhost:5000/health
/// # {"status":"healthy","tables":{"total":20,"busy":3},"connections":2,...}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.floor.stats().await;

    let (status_code, body) = match stats {
        Ok(stats) => (
            StatusCode::OK,
            json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "tables": {
                    "total": stats.tables,
                    "busy": stats.busy_tables,
                    "recent_cleared": stats.recent_cleared,
                },
                "connections": state.connection_count(),
                "subscribers": stats.subscribers,
                "events": {
                    "broadcasts": stats.broadcasts,
                    "evicted_subscribers": stats.evicted_subscribers,
                    "rejected_intents": stats.rejected_intents,
                },
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "unhealthy",
                "version": env!("CARGO_PKG_VERSION"),
                "error": e.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        ),
    };

    (status_code, Json(body))
}
