//! Error types for coreplay storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
///
/// Ledger business failures (insufficient coins, already owned, exhausted
/// codes) live here alongside infrastructure failures: the compound
/// operations that detect them are storage-level, and every caller maps
/// them to its own surface exactly once.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found")]
    NotFound {
        /// The kind of record that was missing (`user`, `item`, `code`, ...).
        entity: &'static str,
    },

    /// A unique field is already taken (username, email, display name).
    #[error("{field} already taken")]
    AlreadyExists {
        /// The conflicting field.
        field: &'static str,
    },

    /// Balance does not cover the price.
    #[error("insufficient coins: balance={balance}, price={price}")]
    InsufficientCoins {
        /// Current balance.
        balance: u64,
        /// Item price.
        price: u64,
    },

    /// The user already owns the item.
    #[error("item already owned")]
    AlreadyOwned,

    /// The promo code has no uses left.
    #[error("code exhausted")]
    CodeExhausted,

    /// The promo code expired.
    #[error("code expired")]
    CodeExpired,

    /// The user already redeemed this code.
    #[error("code already redeemed")]
    AlreadyRedeemed,
}
