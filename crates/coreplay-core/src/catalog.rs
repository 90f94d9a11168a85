//! Catalog items and user inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, UserId};

/// An item for sale in the catalog.
///
/// Catalog items are seed data: immutable after creation and read-only to
/// the purchase path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// The item ID.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Type tag, e.g. `hat`, `shirt`, `accessory`.
    pub item_type: String,

    /// Descriptive text.
    pub description: String,

    /// Price in CoreCoins.
    pub price_coins: u64,

    /// Optional URL to the item's rendered asset.
    pub asset_url: Option<String>,

    /// When the item was seeded.
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Create a new catalog item (used by the seeder and tests).
    #[must_use]
    pub fn new(name: &str, item_type: &str, description: &str, price_coins: u64) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.to_string(),
            item_type: item_type.to_string(),
            description: description.to_string(),
            price_coins,
            asset_url: None,
            created_at: Utc::now(),
        }
    }
}

/// A purchased item in a user's inventory.
///
/// At most one entry exists per `(user, item)` pair — purchases are
/// non-repeatable. Entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// The owning user.
    pub user_id: UserId,

    /// The purchased item.
    pub item_id: ItemId,

    /// When the purchase happened.
    pub purchased_at: DateTime<Utc>,
}

impl InventoryEntry {
    /// Record a purchase made now.
    #[must_use]
    pub fn new(user_id: UserId, item_id: ItemId) -> Self {
        Self {
            user_id,
            item_id,
            purchased_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_carries_price() {
        let item = CatalogItem::new("Crown", "hat", "Golden crown", 500);
        assert_eq!(item.price_coins, 500);
        assert_eq!(item.item_type, "hat");
        assert!(item.asset_url.is_none());
    }
}
