//! Published games.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, UserId};

/// Maximum game name length.
pub const GAME_NAME_MAX: usize = 60;
/// Maximum game description length.
pub const GAME_DESC_MAX: usize = 500;

/// A game published from the scene editor.
///
/// `data` is the opaque scene document the editor produces; the backend
/// stores and serves it without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// The game ID.
    pub id: GameId,

    /// The publishing user.
    pub creator_id: UserId,

    /// Game name.
    pub name: String,

    /// Short description.
    pub description: String,

    /// Optional thumbnail URL.
    pub thumbnail_url: String,

    /// Opaque scene document.
    pub data: serde_json::Value,

    /// Whether the game shows up in public listings.
    pub is_public: bool,

    /// How many times the game was played.
    pub plays_count: u64,

    /// How many likes the game received.
    pub likes_count: u64,

    /// When the game was published.
    pub created_at: DateTime<Utc>,

    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Create a new public game. Description is clamped to its limit.
    #[must_use]
    pub fn new(creator_id: UserId, name: String, description: &str, data: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: GameId::generate(),
            creator_id,
            name,
            description: description.chars().take(GAME_DESC_MAX).collect(),
            thumbnail_url: String::new(),
            data,
            is_public: true,
            plays_count: 0,
            likes_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_clamped() {
        let long = "x".repeat(GAME_DESC_MAX + 100);
        let game = Game::new(UserId::generate(), "Maze".into(), &long, serde_json::json!({}));
        assert_eq!(game.description.len(), GAME_DESC_MAX);
        assert!(game.is_public);
        assert_eq!(game.plays_count, 0);
    }
}
