//! Live product feed over WebSocket.

use std::sync::Arc;

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use tokio::sync::broadcast::{Receiver, error::RecvError};

use crate::models::Product;
use crate::state::AppState;

/// `GET /live/products`
///
/// Upgrades to a WebSocket that receives the full product list as a JSON
/// text frame after every catalog mutation. No history is replayed on
/// connect; the first frame arrives with the next mutation.
pub async fn products_feed(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let updates = state.feed().subscribe();
    ws.on_upgrade(move |socket| forward_updates(socket, updates))
}

async fn forward_updates(mut socket: WebSocket, mut updates: Receiver<Arc<Vec<Product>>>) {
    loop {
        match updates.recv().await {
            Ok(products) => {
                let Ok(payload) = serde_json::to_string(products.as_ref()) else {
                    break;
                };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    // Viewer went away.
                    break;
                }
            }
            // A slow viewer skips straight to the newest snapshot.
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "viewer lagged behind the product feed");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
