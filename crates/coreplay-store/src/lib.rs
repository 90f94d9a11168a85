//! `RocksDB` storage layer for coreplay.
//!
//! This crate is the platform's ledger store: durable records for users
//! (including CoreCoin balances), the catalog, inventories, promo codes and
//! their redemptions, published games, friendships, and the chat log. It
//! uses `RocksDB` with column families for efficient indexing, with CBOR
//! values.
//!
//! The two compound operations — [`Store::purchase_item`] and
//! [`Store::redeem_code`] — are the platform's transaction engine: each
//! runs its checks in a fixed order and commits all of its row effects in a
//! single atomic write batch, serialized against other compound operations
//! so counters and balances can never be driven negative by a race.
//!
//! # Example
//!
//! ```no_run
//! use coreplay_store::{RocksStore, Store};
//! use coreplay_core::User;
//!
//! let store = RocksStore::open("/tmp/coreplay-db").unwrap();
//!
//! let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
//! store.create_user(&user).unwrap();
//!
//! let retrieved = store.get_user(&user.id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use coreplay_core::{
    CatalogItem, ChatMessage, Friendship, Game, GameId, InventoryEntry, ItemId, PromoCode, User,
    UserId,
};

/// Outcome of a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Balance after the debit.
    pub balance: u64,
}

/// Outcome of a successful promo-code redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeemReceipt {
    /// CoreCoins granted by the code.
    pub coins_added: u64,
    /// Balance after the grant.
    pub balance: u64,
}

/// Ordering for public game listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameSort {
    /// Newest first.
    #[default]
    Recent,
    /// Most played first.
    Popular,
    /// Most liked first.
    Likes,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a new user, claiming its username, email and display-name
    /// index entries.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the username, email or
    /// display name is taken.
    fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Get a user by (normalized) username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get a user by (normalized) email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Change a user's display name, keeping the uniqueness index.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::AlreadyExists` if the name is taken by someone else.
    fn set_display_name(&self, user_id: &UserId, display_name: &str) -> Result<()>;

    /// Replace a user's avatar descriptor.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    fn set_avatar(&self, user_id: &UserId, avatar: serde_json::Value) -> Result<()>;

    /// Stamp a successful login.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    fn touch_last_login(&self, user_id: &UserId) -> Result<()>;

    /// Search users by username or display name substring
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn search_users(&self, query: &str, limit: usize) -> Result<Vec<User>>;

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Insert a catalog item (seed data).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_catalog_item(&self, item: &CatalogItem) -> Result<()>;

    /// Get a catalog item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_catalog_item(&self, item_id: &ItemId) -> Result<Option<CatalogItem>>;

    /// List catalog items, optionally filtered by type tag, ordered by
    /// type then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_catalog_items(
        &self,
        item_type: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CatalogItem>>;

    /// Whether the catalog has no items (drives startup seeding).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn catalog_is_empty(&self) -> Result<bool>;

    // =========================================================================
    // Inventory Operations
    // =========================================================================

    /// Whether the user owns the item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn owns_item(&self, user_id: &UserId, item_id: &ItemId) -> Result<bool>;

    /// List a user's inventory, newest purchase first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_inventory(&self, user_id: &UserId) -> Result<Vec<InventoryEntry>>;

    // =========================================================================
    // Promo Code Operations
    // =========================================================================

    /// Insert a promo code (admin/seed path). The code is stored under its
    /// normalized form.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the code exists.
    fn put_promo_code(&self, code: &PromoCode) -> Result<()>;

    /// Get a promo code by its normalized string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_promo_code(&self, code: &str) -> Result<Option<PromoCode>>;

    // =========================================================================
    // Chat Log Operations
    // =========================================================================

    /// Append a chat message to the durable log.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn append_chat_message(&self, message: &ChatMessage) -> Result<()>;

    /// The newest `limit` chat messages, in chronological order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn recent_chat_messages(&self, limit: usize) -> Result<Vec<ChatMessage>>;

    // =========================================================================
    // Game Operations
    // =========================================================================

    /// Insert or update a game record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_game(&self, game: &Game) -> Result<()>;

    /// Get a game by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_game(&self, game_id: &GameId) -> Result<Option<Game>>;

    /// Delete a game.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the game doesn't exist.
    fn delete_game(&self, game_id: &GameId) -> Result<()>;

    /// List public games with optional name/description search, sorted and
    /// paginated. Returns the page and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_public_games(
        &self,
        query: Option<&str>,
        sort: GameSort,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Game>, usize)>;

    /// Increment a game's play counter, returning the new count.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the game doesn't exist.
    fn increment_plays(&self, game_id: &GameId) -> Result<u64>;

    // =========================================================================
    // Friendship Operations
    // =========================================================================

    /// Get the friendship record for a pair, in either order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_friendship(&self, a: &UserId, b: &UserId) -> Result<Option<Friendship>>;

    /// Insert or update a friendship record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_friendship(&self, friendship: &Friendship) -> Result<()>;

    /// Remove the friendship record for a pair.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record exists.
    fn delete_friendship(&self, a: &UserId, b: &UserId) -> Result<()>;

    /// All friendship records involving a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_friendships(&self, user_id: &UserId) -> Result<Vec<Friendship>>;

    // =========================================================================
    // Compound Operations (the transaction engine)
    // =========================================================================

    /// Purchase a catalog item: debit the balance and create the inventory
    /// entry atomically.
    ///
    /// Checks run in order, first failure wins: item exists → user exists →
    /// balance covers price → not already owned.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound { entity: "item" | "user" }`
    /// - `StoreError::InsufficientCoins` if the balance is too low.
    /// - `StoreError::AlreadyOwned` if an inventory entry exists.
    fn purchase_item(&self, user_id: &UserId, item_id: &ItemId) -> Result<PurchaseReceipt>;

    /// Redeem a promo code: decrement its remaining uses, credit the user,
    /// and record the redemption atomically. The raw code is normalized
    /// before lookup.
    ///
    /// Checks run in order: code exists → uses left → not expired → not
    /// already redeemed by this user.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound { entity: "code" }`
    /// - `StoreError::CodeExhausted` if no uses remain.
    /// - `StoreError::CodeExpired` if past its expiry.
    /// - `StoreError::AlreadyRedeemed` on a repeat redemption.
    /// - `StoreError::NotFound { entity: "user" }` if the user is gone.
    fn redeem_code(&self, user_id: &UserId, raw_code: &str) -> Result<RedeemReceipt>;
}
