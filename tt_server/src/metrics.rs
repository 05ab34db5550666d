//! Prometheus metrics for the floor server.
//!
//! Metrics are exported in Prometheus text format when `METRICS_BIND` is set.
//! Without an installed exporter the recording calls are no-ops.
//!
//! # Metrics
//!
//! - **WebSocket**: active/total connections, frames received, frames sent
//! - **Floor**: intents by event name, rejected frames, admin logins
//!
//! The floor actor in `tabletime` records its own series through the same
//! `metrics` facade: `floor_broadcasts_total`, `floor_subscribers_evicted_total`,
//! `floor_intents_rejected_total` and the `floor_subscribers` gauge.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tt_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::intents_total("start_table");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// WebSocket Metrics
// ============================================================================

/// Set current active WebSocket connections count.
pub fn websocket_connections_active(count: usize) {
    metrics::gauge!("websocket_connections_active").set(count as f64);
}

/// Increment total WebSocket connections counter.
pub fn websocket_connections_total() {
    metrics::counter!("websocket_connections_total").increment(1);
}

/// Increment WebSocket frames received counter.
pub fn websocket_messages_received() {
    metrics::counter!("websocket_messages_received").increment(1);
}

/// Increment WebSocket frames sent counter.
pub fn websocket_messages_sent(event: &'static str) {
    metrics::counter!("websocket_messages_sent", "event" => event).increment(1);
}

// ============================================================================
// Floor Metrics
// ============================================================================

/// Record an intent forwarded to the floor.
pub fn intents_total(event: &'static str) {
    metrics::counter!("floor_intents_total", "event" => event).increment(1);
}

/// Record a frame dropped before reaching the floor.
pub fn frames_rejected_total(reason: &'static str) {
    metrics::counter!("floor_frames_rejected_total", "reason" => reason).increment(1);
}

/// Record an admin login attempt.
pub fn auth_attempts_total() {
    metrics::counter!("admin_auth_attempts_total").increment(1);
}
