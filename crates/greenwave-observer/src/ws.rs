//! `WebSocket` handler for real-time traffic update streaming.
//!
//! Clients connect to `GET /ws/traffic` and receive a JSON-encoded
//! [`TrafficUpdate`] message each time the clock completes a tick (and
//! after every operator override). The handler uses a
//! [`broadcast::Receiver`] so all connected clients see the same stream.
//!
//! On connect the client is sent the current snapshot right away, so a
//! dashboard renders without waiting out the tick interval. If a client
//! falls behind, lagged messages are silently skipped and the client
//! resumes from the most recent update.
//!
//! [`broadcast::Receiver`]: tokio::sync::broadcast::Receiver

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use greenwave_types::TrafficUpdate;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming traffic updates.
///
/// # Route
///
/// `GET /ws/traffic`
pub async fn ws_traffic(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: send the current snapshot, then
/// subscribe to the broadcast channel and forward each traffic update
/// as a text frame.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before the initial send so no tick lands in the gap.
    let mut rx = state.subscribe();

    let initial = TrafficUpdate {
        tick: state.store.current_tick(),
        signals: state.store.snapshot().await,
    };
    match serde_json::to_string(&initial) {
        Ok(json) => {
            if socket.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket client disconnected before initial frame");
                return;
            }
        }
        Err(e) => warn!("Failed to serialize initial snapshot: {e}"),
    }

    loop {
        tokio::select! {
            // Receive a traffic update from the clock.
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        let json = match serde_json::to_string(&update) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize traffic update: {e}");
                                continue;
                            }
                        };
                        let msg: Message = Message::Text(json.into());
                        if socket.send(msg).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore other message types (text, binary from client).
                    }
                }
            }
        }
    }
}
