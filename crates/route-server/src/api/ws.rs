//! WebSocket streaming of route updates.

use crate::state::{AppState, RouteStatus};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Handler for WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
        .into_response()
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.subscribe();

    // New subscribers get the current snapshot straight away.
    if send_status(&mut socket, &state.status()).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            update = rx.recv() => {
                match update {
                    Ok(status) => {
                        if send_status(&mut socket, &status).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("WebSocket client lagged, skipped {} update(s)", skipped);
                        if send_status(&mut socket, &state.status()).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn send_status(socket: &mut WebSocket, status: &RouteStatus) -> Result<(), axum::Error> {
    let payload = match serde_json::to_string(status) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize route status: {}", e);
            return Ok(());
        }
    };
    socket.send(Message::Text(payload)).await
}
