//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message as WsMessage, WebSocket},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, Identity};

use super::events::ClientEvent;
use super::registry::ClientSender;
use super::router::{broadcast_presence, route_private, route_public};
use super::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Drive one connection: a writer task drains the connection's channel into
/// the socket while the read loop parses and dispatches inbound events.
///
/// The connection is not in the registry until its `join` event arrives, and
/// is removed exactly once when either task ends.
pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let handle = ConnectionId::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let (mut sender, mut receiver) = socket.split();

    tracing::info!("connection {} opened", handle);

    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(WsMessage::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let read_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            let ws_msg = match result {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("websocket error on connection {}: {}", handle, e);
                    break;
                }
            };

            match ws_msg {
                WsMessage::Text(text) => {
                    dispatch_event(&read_state, handle, &tx, &text).await;
                }
                WsMessage::Close(_) => {
                    tracing::info!("connection {} requested close", handle);
                    break;
                }
                // Ping/pong is handled by the protocol layer; binary frames
                // are not part of the chat protocol.
                _ => {}
            }
        }
    });

    // If either task completes, tear down the other.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect is the only cancellation signal: remove the registry entry
    // and tell the remaining connections, leaving any in-flight persistence
    // tasks untouched.
    {
        let mut registry = state.registry.lock().await;
        if registry.on_disconnect(&handle) {
            broadcast_presence(&registry);
        }
    }
    tracing::info!("connection {} closed", handle);
}

/// Parse and dispatch one inbound frame.
///
/// There is no response channel for chat events, so malformed frames are
/// dropped and logged; they never crash the connection.
async fn dispatch_event(state: &AppState, handle: ConnectionId, tx: &ClientSender, raw: &str) {
    let event = match serde_json::from_str::<ClientEvent>(raw) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("dropping malformed event on connection {}: {}", handle, e);
            return;
        }
    };

    match event {
        ClientEvent::Join { id, nickname } => {
            let mut registry = state.registry.lock().await;
            registry.on_join(handle, Identity { id, nickname }, tx.clone());
            broadcast_presence(&registry);
        }
        ClientEvent::JoinChatRoom { room_id } => {
            // Room channels belong to the wider application; acknowledged
            // here only so the event is not treated as malformed.
            tracing::debug!("connection {} subscribed to room '{}'", handle, room_id);
        }
        ClientEvent::PublicMessage {
            nickname,
            text,
            user_id,
        } => {
            route_public(state, nickname, user_id, text).await;
        }
        ClientEvent::PrivateMessage {
            to_nickname,
            from_nickname,
            text,
            user_id,
        } => {
            route_private(state, handle, to_nickname, from_nickname, user_id, text).await;
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
