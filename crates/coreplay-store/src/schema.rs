//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary user records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: `username` → `user_id`. Value is the 16-byte user ID.
    pub const USERS_BY_USERNAME: &str = "users_by_username";

    /// Index: `email` → `user_id`. Value is the 16-byte user ID.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Index: `display_name` → `user_id`. Value is the 16-byte user ID.
    pub const USERS_BY_DISPLAY_NAME: &str = "users_by_display_name";

    /// Published games, keyed by `game_id`.
    pub const GAMES: &str = "games";

    /// Catalog items, keyed by `item_id`. Seed data, immutable.
    pub const CATALOG_ITEMS: &str = "catalog_items";

    /// Inventory entries, keyed by `user_id || item_id`.
    /// The key shape itself enforces at most one entry per pair.
    pub const INVENTORY: &str = "inventory";

    /// Promo codes, keyed by the normalized code string.
    pub const PROMO_CODES: &str = "promo_codes";

    /// Promo redemptions, keyed by `user_id || code`.
    pub const PROMO_REDEMPTIONS: &str = "promo_redemptions";

    /// Durable chat log, keyed by `message_id` (ULID, time-ordered).
    pub const CHAT_MESSAGES: &str = "chat_messages";

    /// Friendships, keyed by the ordered user-ID pair `lo || hi`.
    pub const FRIENDSHIPS: &str = "friendships";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_USERNAME,
        cf::USERS_BY_EMAIL,
        cf::USERS_BY_DISPLAY_NAME,
        cf::GAMES,
        cf::CATALOG_ITEMS,
        cf::INVENTORY,
        cf::PROMO_CODES,
        cf::PROMO_REDEMPTIONS,
        cf::CHAT_MESSAGES,
        cf::FRIENDSHIPS,
    ]
}
