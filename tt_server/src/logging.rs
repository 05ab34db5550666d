//! Structured logging configuration.
//!
//! Installs a `tracing` subscriber; records emitted through the `log` facade
//! by the `tabletime` library are bridged into it.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use tt_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a client intent accepted for processing
///
/// # Arguments
///
/// * `conn_id` - Connection that sent the intent
/// * `event` - Wire name of the intent
pub fn log_intent(conn_id: &str, event: &str) {
    tracing::debug!(conn_id = conn_id, event = event, "Intent received");
}

/// Log an inbound frame that was dropped before reaching the floor
///
/// # Arguments
///
/// * `conn_id` - Connection that sent the frame
/// * `reason` - Why the frame was dropped
pub fn log_rejected_frame(conn_id: &str, reason: &str) {
    tracing::warn!(conn_id = conn_id, reason = reason, "Frame rejected");
}

/// Log an admin login attempt
pub fn log_auth_attempt(conn_id: &str, username: &str) {
    tracing::info!(
        event_type = "admin_login",
        conn_id = conn_id,
        username = username,
        "SECURITY: admin login attempt"
    );
}

/// Log a connection lifecycle change
pub fn log_connection(conn_id: &str, connected: bool) {
    if connected {
        tracing::info!(conn_id = conn_id, "WebSocket connected");
    } else {
        tracing::info!(conn_id = conn_id, "WebSocket disconnected");
    }
}
