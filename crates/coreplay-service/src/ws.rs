//! WebSocket wiring: sockets in, room engine events out.
//!
//! Each socket gets a connection ID and an unbounded channel. A writer
//! task drains the channel into the socket as JSON text; the read loop
//! parses frames into [`ClientEvent`]s and hands them to the engine.
//! Malformed frames are logged and dropped before they reach room logic.
//!
//! The credential is taken from the `token` query parameter and verified
//! exactly once, at upgrade time. Failure leaves the connection anonymous
//! — it still connects, gets the history replay, and may join game rooms
//! as a guest.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use coreplay_core::{ConnectionId, UserId};
use coreplay_realtime::{ClientEvent, Identity, ServerEvent};
use coreplay_store::Store;

use crate::auth;
use crate::state::AppState;

/// WebSocket handshake query parameters.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Optional bearer token (browsers cannot set headers on WebSockets).
    pub token: Option<String>,
}

/// Upgrade handler for `GET /ws`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let identity = resolve_identity(&state, params.token.as_deref());
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

/// Single-attempt identity resolution at handshake time.
///
/// The display name is read from the store here and pinned for the
/// connection's lifetime, so chat and room events show the name the user
/// had when they connected.
fn resolve_identity(state: &AppState, token: Option<&str>) -> Option<Identity> {
    let token = token?;
    let claims = auth::verify_token(&state.config.jwt_secret, token)?;
    let user_id = claims.sub.parse::<UserId>().ok()?;
    let user = state.store.get_user(&user_id).ok().flatten()?;

    Some(Identity {
        user_id,
        username: user.display_name,
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Option<Identity>) {
    let id = ConnectionId::generate();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let write_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(payload) = serde_json::to_string(&event) else {
                continue;
            };
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    state.engine().connect(id, identity, tx);

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => state.engine().handle_event(id, event),
                Err(error) => {
                    tracing::warn!(connection_id = %id, %error, "invalid inbound event");
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Runs on every exit path, normal close or transport error, so the
    // registry never holds a dead connection.
    state.engine().disconnect(id);
    write_task.abort();
}
