//! The room broadcast engine.
//!
//! Two room kinds exist: the single server-wide chat room and one room per
//! game. The engine owns the presence registry and the history cache, and
//! is handed a durable sink for chat messages. All methods are synchronous
//! and run to completion; the caller serializes access.

use std::sync::Arc;

use serde_json::{Map, Value};

use coreplay_core::{ChatMessage, ConnectionId, GameId};
use coreplay_store::{Result as StoreResult, RocksStore, Store};

use crate::events::{ClientEvent, PlayerInfo, ServerEvent};
use crate::history::HistoryCache;
use crate::presence::{EventSink, Identity, PresenceRegistry};

/// Default maximum chat message length, in characters.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 500;

/// Rejection sent when an anonymous connection tries to chat.
const ERR_UNAUTHENTICATED: &str = "must be authenticated to chat";

/// Rejection sent for empty or over-length messages.
const ERR_INVALID_MESSAGE: &str = "invalid message, max length exceeded";

/// Rejection sent when the durable chat log cannot be written.
const ERR_NOT_DELIVERED: &str = "message could not be delivered";

/// The slice of the store the engine needs: durable chat persistence.
///
/// Narrow on purpose so engine tests can run against an in-memory double
/// instead of a full database.
pub trait MessageStore: Send + Sync {
    /// Append a chat message to the durable log.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the engine fails that message
    /// only.
    fn append_chat_message(&self, message: &ChatMessage) -> StoreResult<()>;
}

impl MessageStore for RocksStore {
    fn append_chat_message(&self, message: &ChatMessage) -> StoreResult<()> {
        Store::append_chat_message(self, message)
    }
}

/// Routes messages and events to the connections that should see them.
pub struct RoomEngine {
    registry: PresenceRegistry,
    history: HistoryCache,
    store: Arc<dyn MessageStore>,
    max_message_len: usize,
}

impl RoomEngine {
    /// Create an engine over the given durable chat sink.
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, history_capacity: usize, max_message_len: usize) -> Self {
        Self {
            registry: PresenceRegistry::new(),
            history: HistoryCache::new(history_capacity),
            store,
            max_message_len,
        }
    }

    /// Dispatch a parsed client event.
    pub fn handle_event(&mut self, id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinServer => self.join_server(id),
            ClientEvent::ChatMessage { message } => self.chat_message(id, &message),
            ClientEvent::JoinGame { game_id } => self.join_game(id, game_id),
            ClientEvent::GameAction { data } => self.game_action(id, data),
            ClientEvent::LeaveGame => self.leave_game(id),
        }
    }

    /// Register a new connection.
    ///
    /// The credential was verified (or not) exactly once before this call;
    /// `identity` is the outcome and never changes afterwards. Everyone
    /// else learns about an Identified arrival, and the newcomer gets the
    /// one-time history replay regardless of identity.
    pub fn connect(&mut self, id: ConnectionId, identity: Option<Identity>, sink: EventSink) {
        let announce = identity.clone();
        self.registry.insert(id, identity, sink);

        if let Some(identity) = announce {
            tracing::debug!(user_id = %identity.user_id, "connection identified");
            self.broadcast_except(
                id,
                &ServerEvent::UserOnline {
                    user_id: identity.user_id,
                    username: identity.username,
                },
            );
        }

        if !self.history.is_empty() {
            let replay = ServerEvent::ChatHistory {
                messages: self.history.recent().to_vec(),
            };
            self.send_to(id, &replay);
        }
    }

    /// Join the server chat room. Idempotent.
    pub fn join_server(&mut self, id: ConnectionId) {
        if let Some(conn) = self.registry.get_mut(&id) {
            conn.in_server_chat = true;
        }
    }

    /// Accept, persist and fan out a chat message.
    ///
    /// Validation failures go back to the sender only and are never
    /// broadcast. A message that fails to persist is neither cached nor
    /// broadcast.
    pub fn chat_message(&mut self, id: ConnectionId, text: &str) {
        let Some(conn) = self.registry.get(&id) else {
            return;
        };

        let Some(identity) = conn.identity.clone() else {
            self.send_to(id, &ServerEvent::chat_error(ERR_UNAUTHENTICATED));
            return;
        };

        let body = text.trim();
        if body.is_empty() || body.chars().count() > self.max_message_len {
            self.send_to(id, &ServerEvent::chat_error(ERR_INVALID_MESSAGE));
            return;
        }

        let message = ChatMessage::new(identity.user_id, identity.username, body.to_string());

        if let Err(error) = self.store.append_chat_message(&message) {
            tracing::error!(%error, "failed to persist chat message");
            self.send_to(id, &ServerEvent::chat_error(ERR_NOT_DELIVERED));
            return;
        }

        self.history.push(message.clone());

        let event = ServerEvent::ChatMessage { message };
        for (_, conn) in self.registry.iter().filter(|(_, c)| c.in_server_chat) {
            let _ = conn.sink.send(event.clone());
        }
    }

    /// Join a game room.
    ///
    /// A connection occupies at most one game room: joining a new one
    /// leaves the previous one first, announcement included. The joiner
    /// gets the room's current member list back.
    pub fn join_game(&mut self, id: ConnectionId, game_id: GameId) {
        if self
            .registry
            .get(&id)
            .is_some_and(|c| c.game_room.is_some())
        {
            self.leave_game(id);
        }

        let Some(conn) = self.registry.get_mut(&id) else {
            return;
        };
        conn.game_room = Some(game_id);
        let player = PlayerInfo::from_identity(conn.identity.as_ref());

        self.broadcast_room_except(game_id, id, &ServerEvent::PlayerJoined { player });

        let players: Vec<PlayerInfo> = self
            .registry
            .iter()
            .filter(|(_, c)| c.game_room == Some(game_id))
            .filter_map(|(_, c)| c.identity.as_ref())
            .map(|identity| PlayerInfo::from_identity(Some(identity)))
            .collect();

        self.send_to(id, &ServerEvent::GamePlayers { players });
    }

    /// Broadcast a game action to the *other* members of the sender's
    /// room. No-op when the sender is not in a room.
    pub fn game_action(&mut self, id: ConnectionId, mut data: Map<String, Value>) {
        let Some(conn) = self.registry.get(&id) else {
            return;
        };
        let Some(game_id) = conn.game_room else {
            return;
        };

        // Identity and timestamp come from the server; a payload cannot
        // supply its own.
        data.remove("userId");
        data.remove("username");
        data.remove("timestamp");

        let player = PlayerInfo::from_identity(conn.identity.as_ref());
        let event = ServerEvent::GameStateUpdate {
            user_id: player.user_id,
            username: player.username,
            timestamp: chrono::Utc::now().timestamp_millis(),
            data,
        };

        self.broadcast_room_except(game_id, id, &event);
    }

    /// Leave the current game room, announcing to whoever remains.
    /// Idempotent when not in a room.
    pub fn leave_game(&mut self, id: ConnectionId) {
        let Some(conn) = self.registry.get_mut(&id) else {
            return;
        };
        let Some(game_id) = conn.game_room.take() else {
            return;
        };
        let player = PlayerInfo::from_identity(conn.identity.as_ref());

        self.broadcast_room_except(game_id, id, &ServerEvent::PlayerLeft { player });
    }

    /// Tear down a connection on any disconnect path.
    ///
    /// Game-room peers are told first, then global presence — the same
    /// order a deliberate leave-then-logout would produce.
    pub fn disconnect(&mut self, id: ConnectionId) {
        self.leave_game(id);

        let Some(conn) = self.registry.remove(&id) else {
            return;
        };

        if let Some(identity) = conn.identity {
            tracing::debug!(user_id = %identity.user_id, "connection closed");
            self.broadcast_except(
                id,
                &ServerEvent::UserOffline {
                    user_id: identity.user_id,
                },
            );
        }
    }

    /// Identities of all currently online (Identified) connections.
    #[must_use]
    pub fn online_users(&self) -> Vec<Identity> {
        self.registry.online_users()
    }

    /// Resolve a connection to its identity.
    #[must_use]
    pub fn resolve(&self, id: ConnectionId) -> Option<Identity> {
        self.registry.resolve(&id).cloned()
    }

    // Delivery is fire-and-forget: a closed sink means the peer is gone
    // and the event is silently dropped for them.

    fn send_to(&self, id: ConnectionId, event: &ServerEvent) {
        if let Some(conn) = self.registry.get(&id) {
            let _ = conn.sink.send(event.clone());
        }
    }

    fn broadcast_except(&self, exclude: ConnectionId, event: &ServerEvent) {
        for (conn_id, conn) in self.registry.iter() {
            if *conn_id != exclude {
                let _ = conn.sink.send(event.clone());
            }
        }
    }

    fn broadcast_room_except(&self, game_id: GameId, exclude: ConnectionId, event: &ServerEvent) {
        for (conn_id, conn) in self.registry.iter() {
            if *conn_id != exclude && conn.game_room == Some(game_id) {
                let _ = conn.sink.send(event.clone());
            }
        }
    }
}

impl ServerEvent {
    fn chat_error(message: &str) -> Self {
        Self::ChatError {
            message: message.to_string(),
        }
    }
}
