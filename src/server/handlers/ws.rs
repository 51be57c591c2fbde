//! WebSocket handler forwarding change events to browsers.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::realtime::ChangeEvent;
use crate::server::state::AppState;

/// Handle WebSocket upgrade for GET /ws/changes.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.feed.subscribe()))
}

async fn handle_socket(mut socket: WebSocket, mut receiver: broadcast::Receiver<ChangeEvent>) {
    loop {
        tokio::select! {
            result = receiver.recv() => {
                match result {
                    Ok(event) => {
                        let msg = match serde_json::to_string(&event) {
                            Ok(msg) => msg,
                            Err(e) => {
                                error!("Failed to encode change event: {}", e);
                                continue;
                            }
                        };
                        if socket.send(Message::Text(msg)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    // Clients refetch on any event, so dropped ones do not matter
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                }
            }
            // Client messages are only keepalives
            result = socket.recv() => {
                match result {
                    Some(Ok(_)) => {}
                    _ => break,
                }
            }
        }
    }
    debug!("Change websocket closed");
}
