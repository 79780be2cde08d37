use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use pharmhub_core::error::CoreError;
use pharmhub_core::types::DbId;
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters for the WebSocket handshake.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token; required because browsers cannot set headers
    /// on WebSocket upgrade requests.
    pub token: Option<String>,
}

/// Frames clients may send after the upgrade.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    /// Typing indicator relayed to the recipient as `user_typing`.
    Typing { recipient_id: DbId },
}

/// HTTP handler that authenticates the handshake and upgrades to WebSocket.
///
/// The token is validated *before* the upgrade so unauthenticated
/// clients get a proper 401 instead of a dropped socket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let token = params.token.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Missing token in WebSocket handshake".into(),
        ))
    })?;

    let claims = validate_token(&token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, claims.sub)))
}

/// Manage a single authenticated WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Broadcasts `user_status` online.
///   3. Spawns a sender task that forwards messages from the manager channel.
///   4. Processes inbound frames (typing relay) on the current task.
///   5. Cleans up on disconnect and broadcasts `user_status` offline once
///      the user's last connection is gone.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;

    broadcast_user_status(&ws_manager, user_id, true).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_client_frame(&ws_manager, user_id, text.as_str()).await;
            }
            Ok(_) => {
                // Binary and ping frames are ignored.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    ws_manager.remove(&conn_id).await;
    send_task.abort();

    if !ws_manager.user_online(user_id).await {
        broadcast_user_status(&ws_manager, user_id, false).await;
    }
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}

/// Dispatch a parsed client frame. Unknown frames are logged and dropped.
async fn handle_client_frame(ws_manager: &WsManager, user_id: DbId, text: &str) {
    match serde_json::from_str::<ClientFrame>(text) {
        Ok(ClientFrame::Typing { recipient_id }) => {
            let event = serde_json::json!({
                "type": "user_typing",
                "user_id": user_id,
            });
            ws_manager
                .send_to_user(recipient_id, Message::Text(event.to_string().into()))
                .await;
        }
        Err(e) => {
            tracing::debug!(user_id, error = %e, "Unrecognised WebSocket frame");
        }
    }
}

/// Broadcast a `user_status` presence event to all connected clients.
async fn broadcast_user_status(ws_manager: &WsManager, user_id: DbId, online: bool) {
    let event = serde_json::json!({
        "type": "user_status",
        "user_id": user_id,
        "online": online,
    });
    ws_manager
        .broadcast(Message::Text(event.to_string().into()))
        .await;
}
