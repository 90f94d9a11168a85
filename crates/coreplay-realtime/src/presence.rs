//! The presence registry: live connections and their identities.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::mpsc;

use coreplay_core::{ConnectionId, GameId, UserId};

use crate::events::ServerEvent;

/// The delivery channel for one connection.
///
/// Unbounded by design: the engine never blocks on a slow consumer, and
/// backpressure is the transport's problem (spec'd as fire-and-forget).
pub type EventSink = mpsc::UnboundedSender<ServerEvent>;

/// A resolved identity: who a connection is.
///
/// `username` is the user's display name captured at handshake time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// The user ID.
    pub user_id: UserId,

    /// Display name at connect time.
    pub username: String,
}

/// State held for one live connection.
///
/// A connection is Anonymous (`identity: None`) or Identified; the only
/// transition is Anonymous → Identified at registration, there is no way
/// back. The record is destroyed on disconnect and never persisted.
#[derive(Debug)]
pub(crate) struct Connection {
    /// Resolved identity, if the handshake credential verified.
    pub identity: Option<Identity>,

    /// Channel to the connection's writer.
    pub sink: EventSink,

    /// Whether the connection joined the server chat room.
    pub in_server_chat: bool,

    /// The game room the connection is in, at most one.
    pub game_room: Option<GameId>,
}

/// Registry of live connections.
///
/// Owned state with exclusive internal mutation — injected into the room
/// engine rather than shared as a global, so tests can run isolated
/// instances side by side.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl PresenceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. Identity is fixed here: the handshake gets
    /// one verification attempt and the outcome sticks for the
    /// connection's lifetime.
    pub(crate) fn insert(&mut self, id: ConnectionId, identity: Option<Identity>, sink: EventSink) {
        self.connections.insert(
            id,
            Connection {
                identity,
                sink,
                in_server_chat: false,
                game_room: None,
            },
        );
    }

    /// Remove a connection, returning its final state.
    pub(crate) fn remove(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(id)
    }

    pub(crate) fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&ConnectionId, &Connection)> {
        self.connections.iter()
    }

    /// Resolve a connection to its identity, if Identified.
    #[must_use]
    pub fn resolve(&self, id: &ConnectionId) -> Option<&Identity> {
        self.connections.get(id).and_then(|c| c.identity.as_ref())
    }

    /// Identities of all currently Identified connections.
    ///
    /// Reflects exactly the live connection set — one entry per
    /// connection, so a user connected twice appears twice.
    #[must_use]
    pub fn online_users(&self) -> Vec<Identity> {
        self.connections
            .values()
            .filter_map(|c| c.identity.clone())
            .collect()
    }

    /// Number of live connections (identified or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether no connections are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> EventSink {
        mpsc::unbounded_channel().0
    }

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::generate(),
            username: name.to_string(),
        }
    }

    #[test]
    fn resolve_distinguishes_anonymous() {
        let mut registry = PresenceRegistry::new();
        let known = ConnectionId::generate();
        let guest = ConnectionId::generate();

        registry.insert(known, Some(identity("ana")), sink());
        registry.insert(guest, None, sink());

        assert_eq!(registry.resolve(&known).unwrap().username, "ana");
        assert!(registry.resolve(&guest).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn online_users_has_no_stale_entries() {
        let mut registry = PresenceRegistry::new();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        registry.insert(a, Some(identity("ana")), sink());
        registry.insert(b, Some(identity("bob")), sink());
        assert_eq!(registry.online_users().len(), 2);

        registry.remove(&a);
        let online = registry.online_users();
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].username, "bob");

        registry.remove(&b);
        assert!(registry.online_users().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn anonymous_connections_do_not_count_as_online() {
        let mut registry = PresenceRegistry::new();
        registry.insert(ConnectionId::generate(), None, sink());
        assert!(registry.online_users().is_empty());
        assert_eq!(registry.len(), 1);
    }
}
