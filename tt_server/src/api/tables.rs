//! Read-only table endpoints.
//!
//! The floor is only mutated over the WebSocket; HTTP clients can read the
//! current snapshot, e.g. for dashboards or a first paint before connecting.
//!
//! ```bash
//! curl http://localhost:5000/api/v1/tables
//! ```

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tabletime::floor::FloorSnapshot;

use super::AppState;

/// Current floor snapshot, in the same shape as the `init` event payload.
pub async fn get_snapshot(
    State(state): State<AppState>,
) -> Result<Json<FloorSnapshot>, (StatusCode, String)> {
    state.floor.snapshot().await.map(Json).map_err(|e| {
        tracing::error!("Failed to read floor snapshot: {}", e);
        (StatusCode::SERVICE_UNAVAILABLE, e.client_message())
    })
}
