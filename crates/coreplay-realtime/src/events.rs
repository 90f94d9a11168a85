//! Wire events for the real-time channel.
//!
//! Both directions are tagged unions: the `type` field selects the
//! variant and the payload keys are camelCase, matching the browser
//! client. Parsing happens at the engine boundary — a frame that does not
//! deserialize into [`ClientEvent`] is dropped before it reaches any room
//! logic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use coreplay_core::{ChatMessage, GameId, UserId};

use crate::presence::Identity;

/// Events accepted from clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join the server-wide chat room. Idempotent.
    JoinServer,

    /// Send a chat message to the server room.
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        /// Message body.
        message: String,
    },

    /// Join a game room, leaving the current one if any.
    #[serde(rename_all = "camelCase")]
    JoinGame {
        /// The game to join.
        game_id: GameId,
    },

    /// Broadcast an action to the other members of the current game room.
    GameAction {
        /// Arbitrary action payload, forwarded as-is.
        #[serde(flatten)]
        data: Map<String, Value>,
    },

    /// Leave the current game room. Idempotent.
    LeaveGame,
}

/// A room member as shown on the wire.
///
/// Identity is optional by design: anonymous connections may join and act
/// in game rooms, and render as the guest placeholder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    /// The member's user ID, if identified.
    pub user_id: Option<UserId>,

    /// Display name, or the guest placeholder.
    pub username: String,
}

/// Placeholder label for anonymous room members.
pub const GUEST_LABEL: &str = "Guest";

impl PlayerInfo {
    /// Render an optional identity, substituting the guest placeholder.
    #[must_use]
    pub fn from_identity(identity: Option<&Identity>) -> Self {
        match identity {
            Some(identity) => Self {
                user_id: Some(identity.user_id),
                username: identity.username.clone(),
            },
            None => Self {
                user_id: None,
                username: GUEST_LABEL.to_string(),
            },
        }
    }
}

/// Events emitted to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// An identified user came online (sent to everyone else).
    #[serde(rename_all = "camelCase")]
    UserOnline {
        /// The user who connected.
        user_id: UserId,
        /// Their display name.
        username: String,
    },

    /// An identified user went offline.
    #[serde(rename_all = "camelCase")]
    UserOffline {
        /// The user who disconnected.
        user_id: UserId,
    },

    /// One-time replay of recent chat, oldest first.
    ChatHistory {
        /// The replayed messages.
        messages: Vec<ChatMessage>,
    },

    /// A live chat message.
    ChatMessage {
        /// The message.
        #[serde(flatten)]
        message: ChatMessage,
    },

    /// A chat rejection, sent to the offending sender only.
    ChatError {
        /// Human-readable reason.
        message: String,
    },

    /// Someone joined the game room (sent to the other members).
    PlayerJoined {
        /// The joiner.
        #[serde(flatten)]
        player: PlayerInfo,
    },

    /// Current member list of a game room (reply to the joiner).
    GamePlayers {
        /// Identified members, including the joiner.
        players: Vec<PlayerInfo>,
    },

    /// A game action from another room member.
    #[serde(rename_all = "camelCase")]
    GameStateUpdate {
        /// The acting user, if identified.
        user_id: Option<UserId>,
        /// Display name or guest placeholder.
        username: String,
        /// Server receive time, Unix millis.
        timestamp: i64,
        /// The action payload, merged in.
        #[serde(flatten)]
        data: Map<String, Value>,
    },

    /// Someone left the game room (sent to the remaining members).
    PlayerLeft {
        /// The leaver.
        #[serde(flatten)]
        player: PlayerInfo,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_parse_from_tagged_json() {
        let event: ClientEvent = serde_json::from_str(r#"{"type":"join-server"}"#).unwrap();
        assert!(matches!(event, ClientEvent::JoinServer));

        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"chat-message","message":"hi"}"#).unwrap();
        assert!(matches!(event, ClientEvent::ChatMessage { message } if message == "hi"));

        let event: ClientEvent = serde_json::from_str(
            r#"{"type":"game-action","x":3,"y":7,"action":"move"}"#,
        )
        .unwrap();
        let ClientEvent::GameAction { data } = event else {
            panic!("expected game-action");
        };
        assert_eq!(data.get("action").unwrap(), "move");
        assert_eq!(data.get("x").unwrap(), 3);
    }

    #[test]
    fn unknown_or_malformed_events_fail_to_parse() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type":"hack-server"}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>(r#"{"message":"no tag"}"#).is_err());
        assert!(
            serde_json::from_str::<ClientEvent>(r#"{"type":"join-game","gameId":"nope"}"#).is_err()
        );
    }

    #[test]
    fn server_events_carry_kebab_tags() {
        let event = ServerEvent::UserOffline {
            user_id: UserId::generate(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "user-offline");
        assert!(json.get("userId").is_some());
    }

    #[test]
    fn guest_placeholder_for_anonymous_members() {
        let player = PlayerInfo::from_identity(None);
        assert_eq!(player.username, GUEST_LABEL);
        let json = serde_json::to_value(&player).unwrap();
        assert!(json["userId"].is_null());
    }

    #[test]
    fn game_state_update_merges_payload() {
        let mut data = Map::new();
        data.insert("x".into(), Value::from(3));
        let event = ServerEvent::GameStateUpdate {
            user_id: None,
            username: GUEST_LABEL.into(),
            timestamp: 1_700_000_000_000,
            data,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "game-state-update");
        assert_eq!(json["x"], 3);
        assert_eq!(json["username"], "Guest");
    }
}
