//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families.

use coreplay_core::{GameId, ItemId, MessageId, UserId};

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a game key from a game ID.
#[must_use]
pub fn game_key(game_id: &GameId) -> Vec<u8> {
    game_id.as_bytes().to_vec()
}

/// Create a catalog-item key from an item ID.
#[must_use]
pub fn item_key(item_id: &ItemId) -> Vec<u8> {
    item_id.as_bytes().to_vec()
}

/// Create an inventory key.
///
/// Format: `user_id (16 bytes) || item_id (16 bytes)`.
///
/// One key per `(user, item)` pair; prefix iteration over `user_id` lists
/// a user's inventory.
#[must_use]
pub fn inventory_key(user_id: &UserId, item_id: &ItemId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(item_id.as_bytes());
    key
}

/// Create a prefix for iterating a user's inventory.
#[must_use]
pub fn inventory_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a promo-code key from a normalized code.
#[must_use]
pub fn promo_code_key(code: &str) -> Vec<u8> {
    code.as_bytes().to_vec()
}

/// Create a promo-redemption key.
///
/// Format: `user_id (16 bytes) || code (utf-8)`.
#[must_use]
pub fn redemption_key(user_id: &UserId, code: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + code.len());
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(code.as_bytes());
    key
}

/// Create a chat-message key from a message ID.
///
/// ULIDs sort chronologically, so the chat log iterates in send order.
#[must_use]
pub fn chat_message_key(message_id: &MessageId) -> Vec<u8> {
    message_id.to_bytes().to_vec()
}

/// Create a friendship key from an already-ordered pair.
///
/// Format: `user_lo (16 bytes) || user_hi (16 bytes)`.
#[must_use]
pub fn friendship_key(user_lo: &UserId, user_hi: &UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_lo.as_bytes());
    key.extend_from_slice(user_hi.as_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_key_format() {
        let user_id = UserId::generate();
        let item_id = ItemId::generate();
        let key = inventory_key(&user_id, &item_id);

        assert_eq!(key.len(), 32);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(&key[16..], item_id.as_bytes());
        assert!(key.starts_with(&inventory_prefix(&user_id)));
    }

    #[test]
    fn redemption_key_embeds_code() {
        let user_id = UserId::generate();
        let key = redemption_key(&user_id, "WELCOME10");
        assert_eq!(key.len(), 16 + 9);
        assert_eq!(&key[16..], b"WELCOME10");
    }

    #[test]
    fn chat_message_key_length() {
        let id = MessageId::generate();
        assert_eq!(chat_message_key(&id).len(), 16);
    }
}
