//! Catalog seed data.

use coreplay_core::CatalogItem;
use coreplay_store::{Result, Store};

/// Seed the catalog with the starter items if it is empty.
///
/// Returns how many items were inserted (0 when the catalog already has
/// data).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn seed_catalog(store: &dyn Store) -> Result<usize> {
    if !store.catalog_is_empty()? {
        return Ok(0);
    }

    let items = [
        CatalogItem::new("Basic Hat", "hat", "A classic hat for your avatar", 50),
        CatalogItem::new("Blue Shirt", "shirt", "A casual blue shirt", 75),
        CatalogItem::new("Sunglasses", "accessory", "Stylish sunglasses", 100),
        CatalogItem::new("Golden Crown", "hat", "A golden crown", 500),
    ];

    for item in &items {
        store.put_catalog_item(item)?;
    }

    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coreplay_store::RocksStore;
    use tempfile::TempDir;

    #[test]
    fn seeding_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        assert_eq!(seed_catalog(&store).unwrap(), 4);
        assert_eq!(seed_catalog(&store).unwrap(), 0);
        assert_eq!(store.list_catalog_items(None, 50, 0).unwrap().len(), 4);
    }
}
