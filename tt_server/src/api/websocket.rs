//! WebSocket handler for real-time floor updates.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws`
//! 2. Server assigns a connection id and subscribes it to the floor actor,
//!    which queues the `init` snapshot as the first outbound frame
//! 3. A send task drains the connection's outbound queue onto the socket
//! 4. The receive loop rate-limits and decodes frames, forwarding intents to
//!    the floor actor
//! 5. On disconnect (or eviction by the actor) the connection unsubscribes
//!
//! Connection-level errors (rate limiting, malformed frames) are also routed
//! through the actor, so they can never overtake `init` or the replies to
//! earlier intents.
//!
//! # Frames
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:5000/ws');
//!
//! ws.onmessage = (msg) => {
//!   const { event, data } = JSON.parse(msg.data);
//!   if (event === 'init' || event === 'full_reset') replaceFloor(data);
//!   else if (event === 'tables_update') mergeTables(data);
//! };
//!
//! ws.send(JSON.stringify({ event: 'start_table', data: { id: 5 } }));
//! ```

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tabletime::sync::{ClientEvent, ConnId, ServerEvent};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{
    AppState,
    rate_limiter::ConnectionLimiter,
};
use crate::{logging, metrics};

/// Upgrade HTTP connection to WebSocket.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    let conn = conn_id.to_string();
    let (mut sender, mut receiver) = socket.split();

    let (outbound_tx, mut outbound_rx) =
        mpsc::channel::<Arc<ServerEvent>>(state.client_channel_capacity);

    if let Err(e) = state.floor.subscribe(conn_id, outbound_tx).await {
        tracing::error!(conn_id = %conn, "Failed to subscribe to floor: {}", e);
        let _ = sender.send(Message::Close(None)).await;
        return;
    }

    let active = state.connections.fetch_add(1, Ordering::Relaxed) + 1;
    metrics::websocket_connections_total();
    metrics::websocket_connections_active(active);
    logging::log_connection(&conn, true);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let json = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize {}: {}", event.name(), e);
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                return;
            }
            metrics::websocket_messages_sent(event.name());
        }

        // Queue closed by the floor actor
        let _ = sender.send(Message::Close(None)).await;
    });

    let mut limiter = ConnectionLimiter::new(state.rate_limit.burst, state.rate_limit.sustained);

    loop {
        tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let keep_open = handle_frame(text.as_str(), conn_id, &state, &mut limiter).await;
                    if !keep_open {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::warn!(conn_id = %conn, "WebSocket error: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            },
            _ = &mut send_task => {
                tracing::debug!(conn_id = %conn, "Outbound stream ended");
                break;
            }
        }
    }

    send_task.abort();
    let _ = state.floor.unsubscribe(conn_id).await;

    let active = state.connections.fetch_sub(1, Ordering::Relaxed) - 1;
    metrics::websocket_connections_active(active);
    logging::log_connection(&conn, false);
}

/// Process one text frame. Returns `false` when the connection should close.
async fn handle_frame(
    text: &str,
    conn_id: ConnId,
    state: &AppState,
    limiter: &mut ConnectionLimiter,
) -> bool {
    let conn = conn_id.to_string();
    metrics::websocket_messages_received();

    if let Err(limit) = limiter.check() {
        logging::log_rejected_frame(&conn, "rate limited");
        metrics::frames_rejected_total("rate_limited");
        return reply_direct(state, conn_id, ServerEvent::error(limit.client_message())).await;
    }

    let event = match ClientEvent::decode(text) {
        Ok(event) => event,
        Err(e) => {
            logging::log_rejected_frame(&conn, &e.to_string());
            metrics::frames_rejected_total("malformed");
            return reply_direct(state, conn_id, ServerEvent::error("invalid message format"))
                .await;
        }
    };

    if let ClientEvent::Authenticate(request) = &event {
        logging::log_auth_attempt(&conn, &request.username);
        metrics::auth_attempts_total();
    }

    logging::log_intent(&conn, event.name());
    metrics::intents_total(event.name());

    match state.floor.dispatch(conn_id, event).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(conn_id = %conn, "Floor unavailable: {}", e);
            false
        }
    }
}

/// Queue an event for this connection only. Returns `false` if the floor is gone.
async fn reply_direct(state: &AppState, conn_id: ConnId, event: ServerEvent) -> bool {
    match state.floor.reply(conn_id, event).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(conn_id = %conn_id, "Floor unavailable: {}", e);
            false
        }
    }
}
