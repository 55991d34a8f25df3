//! Kitchen dashboard WebSocket feed.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use domain::Order;
use store::CafeStore;
use tokio::sync::broadcast;

use crate::AppState;

/// GET /kitchen/ws — streams every published order snapshot as a JSON text
/// frame, live from the moment of connection. There is no replay.
pub async fn ws<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = state.kitchen.subscribe();
    upgrade.on_upgrade(move |socket| stream_orders(socket, rx))
}

async fn stream_orders(mut socket: WebSocket, mut rx: broadcast::Receiver<Order>) {
    loop {
        tokio::select! {
            published = rx.recv() => match published {
                Ok(order) => {
                    let frame = match serde_json::to_string(&order) {
                        Ok(json) => json,
                        Err(err) => {
                            tracing::error!(error = %err, "failed to encode order snapshot");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "kitchen subscriber lagged, snapshots dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                // Nothing inbound is expected; pings are answered by axum.
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    tracing::debug!("kitchen subscriber disconnected");
}
