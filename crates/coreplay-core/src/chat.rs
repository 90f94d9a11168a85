//! Chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MessageId, UserId};

/// A server-chat message.
///
/// The same shape is persisted to the durable log, mirrored in the
/// in-memory history cache, and broadcast on the wire, so it serializes
/// with the wire's camelCase keys and millisecond timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message ID (ULID, time-ordered).
    pub id: MessageId,

    /// The author.
    pub user_id: UserId,

    /// The author's display name at the time of sending.
    pub username: String,

    /// Message body, already validated for length.
    pub message: String,

    /// Server-side send time.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a message sent now with a fresh ID.
    #[must_use]
    pub fn new(user_id: UserId, username: String, message: String) -> Self {
        Self {
            id: MessageId::generate(),
            user_id,
            username,
            message,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_camel_case_millis() {
        let msg = ChatMessage::new(UserId::generate(), "Ana".into(), "hola".into());
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").unwrap().is_i64());
        assert_eq!(json.get("message").unwrap(), "hola");
    }
}
