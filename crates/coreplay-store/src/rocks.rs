//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use coreplay_core::friend::ordered_pair;
use coreplay_core::{
    normalize_code, CatalogItem, ChatMessage, Friendship, Game, GameId, InventoryEntry, ItemId,
    PromoCode, PromoRedemption, User, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{GameSort, PurchaseReceipt, RedeemReceipt, Store};

/// RocksDB-backed storage implementation.
///
/// A write batch makes each compound operation all-or-nothing on disk, but
/// batches do not isolate the read-check-write sequence from a concurrent
/// one. The `ledger` mutex closes that gap: every operation that reads a
/// row, checks it, and writes a conclusion (purchases, redemptions,
/// unique-index claims) holds it for the whole sequence, so a promo
/// counter or balance can never be decremented past the value its check
/// saw. Plain reads never take it.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    ledger: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            ledger: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read and deserialize a record.
    fn get_record<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Serialize and write a record.
    fn put_record<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let value = Self::serialize(value)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Raw key presence check.
    fn key_exists(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(cf_name)?;
        Ok(self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some())
    }

    /// Commit a write batch.
    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Take the ledger lock, recovering from poisoning: a panicked holder
    /// has not committed anything (batches commit last), so the guard data
    /// is still consistent.
    fn ledger_guard(&self) -> MutexGuard<'_, ()> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deserialize every record in a column family.
    fn scan_all<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            records.push(Self::deserialize(&value)?);
        }
        Ok(records)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn create_user(&self, user: &User) -> Result<()> {
        let _guard = self.ledger_guard();

        if self.key_exists(cf::USERS_BY_USERNAME, user.username.as_bytes())? {
            return Err(StoreError::AlreadyExists { field: "username" });
        }
        if self.key_exists(cf::USERS_BY_EMAIL, user.email.as_bytes())? {
            return Err(StoreError::AlreadyExists { field: "email" });
        }
        if self.key_exists(cf::USERS_BY_DISPLAY_NAME, user.display_name.as_bytes())? {
            return Err(StoreError::AlreadyExists {
                field: "display name",
            });
        }

        let cf_users = self.cf(cf::USERS)?;
        let cf_by_username = self.cf(cf::USERS_BY_USERNAME)?;
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;
        let cf_by_display = self.cf(cf::USERS_BY_DISPLAY_NAME)?;

        let value = Self::serialize(user)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, keys::user_key(&user.id), &value);
        batch.put_cf(&cf_by_username, user.username.as_bytes(), user.id.as_bytes());
        batch.put_cf(&cf_by_email, user.email.as_bytes(), user.id.as_bytes());
        batch.put_cf(
            &cf_by_display,
            user.display_name.as_bytes(),
            user.id.as_bytes(),
        );

        self.write(batch)
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.get_record(cf::USERS, &keys::user_key(user_id))
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let cf = self.cf(cf::USERS_BY_USERNAME)?;
        let Some(id_bytes) = self
            .db
            .get_cf(&cf, username.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };
        self.get_record(cf::USERS, &id_bytes)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let cf = self.cf(cf::USERS_BY_EMAIL)?;
        let Some(id_bytes) = self
            .db
            .get_cf(&cf, email.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };
        self.get_record(cf::USERS, &id_bytes)
    }

    fn set_display_name(&self, user_id: &UserId, display_name: &str) -> Result<()> {
        let _guard = self.ledger_guard();

        let mut user = self
            .get_user(user_id)?
            .ok_or(StoreError::NotFound { entity: "user" })?;

        let cf_by_display = self.cf(cf::USERS_BY_DISPLAY_NAME)?;
        if let Some(holder) = self
            .db
            .get_cf(&cf_by_display, display_name.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
        {
            if holder.as_slice() != user_id.as_bytes() {
                return Err(StoreError::AlreadyExists {
                    field: "display name",
                });
            }
        }

        let cf_users = self.cf(cf::USERS)?;
        let old_name = std::mem::replace(&mut user.display_name, display_name.to_string());
        let value = Self::serialize(&user)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_by_display, old_name.as_bytes());
        batch.put_cf(&cf_by_display, display_name.as_bytes(), user_id.as_bytes());
        batch.put_cf(&cf_users, keys::user_key(user_id), &value);

        self.write(batch)
    }

    fn set_avatar(&self, user_id: &UserId, avatar: serde_json::Value) -> Result<()> {
        let mut user = self
            .get_user(user_id)?
            .ok_or(StoreError::NotFound { entity: "user" })?;
        user.avatar = avatar;
        self.put_record(cf::USERS, &keys::user_key(user_id), &user)
    }

    fn touch_last_login(&self, user_id: &UserId) -> Result<()> {
        let mut user = self
            .get_user(user_id)?
            .ok_or(StoreError::NotFound { entity: "user" })?;
        user.last_login = Some(chrono::Utc::now());
        self.put_record(cf::USERS, &keys::user_key(user_id), &user)
    }

    fn search_users(&self, query: &str, limit: usize) -> Result<Vec<User>> {
        let needle = query.trim().to_lowercase();
        if needle.len() < 2 {
            return Ok(Vec::new());
        }

        let cf = self.cf(cf::USERS)?;
        let mut matches = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let user: User = Self::deserialize(&value)?;
            if user.username.contains(&needle)
                || user.display_name.to_lowercase().contains(&needle)
            {
                matches.push(user);
                if matches.len() >= limit {
                    break;
                }
            }
        }
        Ok(matches)
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    fn put_catalog_item(&self, item: &CatalogItem) -> Result<()> {
        self.put_record(cf::CATALOG_ITEMS, &keys::item_key(&item.id), item)
    }

    fn get_catalog_item(&self, item_id: &ItemId) -> Result<Option<CatalogItem>> {
        self.get_record(cf::CATALOG_ITEMS, &keys::item_key(item_id))
    }

    fn list_catalog_items(
        &self,
        item_type: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CatalogItem>> {
        let mut items: Vec<CatalogItem> = self
            .scan_all::<CatalogItem>(cf::CATALOG_ITEMS)?
            .into_iter()
            .filter(|item| item_type.map_or(true, |t| item.item_type == t))
            .collect();

        items.sort_by(|a, b| {
            a.item_type
                .cmp(&b.item_type)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(items.into_iter().skip(offset).take(limit).collect())
    }

    fn catalog_is_empty(&self) -> Result<bool> {
        let cf = self.cf(cf::CATALOG_ITEMS)?;
        Ok(self.db.iterator_cf(&cf, IteratorMode::Start).next().is_none())
    }

    // =========================================================================
    // Inventory Operations
    // =========================================================================

    fn owns_item(&self, user_id: &UserId, item_id: &ItemId) -> Result<bool> {
        self.key_exists(cf::INVENTORY, &keys::inventory_key(user_id, item_id))
    }

    fn list_inventory(&self, user_id: &UserId) -> Result<Vec<InventoryEntry>> {
        let cf = self.cf(cf::INVENTORY)?;
        let prefix = keys::inventory_prefix(user_id);

        let mut entries = Vec::new();
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            entries.push(Self::deserialize::<InventoryEntry>(&value)?);
        }

        entries.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        Ok(entries)
    }

    // =========================================================================
    // Promo Code Operations
    // =========================================================================

    fn put_promo_code(&self, code: &PromoCode) -> Result<()> {
        let _guard = self.ledger_guard();

        let key = keys::promo_code_key(&code.code);
        if self.key_exists(cf::PROMO_CODES, &key)? {
            return Err(StoreError::AlreadyExists { field: "code" });
        }
        self.put_record(cf::PROMO_CODES, &key, code)
    }

    fn get_promo_code(&self, code: &str) -> Result<Option<PromoCode>> {
        self.get_record(cf::PROMO_CODES, &keys::promo_code_key(code))
    }

    // =========================================================================
    // Chat Log Operations
    // =========================================================================

    fn append_chat_message(&self, message: &ChatMessage) -> Result<()> {
        self.put_record(cf::CHAT_MESSAGES, &keys::chat_message_key(&message.id), message)
    }

    fn recent_chat_messages(&self, limit: usize) -> Result<Vec<ChatMessage>> {
        let cf = self.cf(cf::CHAT_MESSAGES)?;

        // ULID keys sort chronologically, so walking backwards from the end
        // yields newest-first.
        let mut messages = Vec::with_capacity(limit);
        for item in self.db.iterator_cf(&cf, IteratorMode::End).take(limit) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            messages.push(Self::deserialize::<ChatMessage>(&value)?);
        }

        messages.reverse();
        Ok(messages)
    }

    // =========================================================================
    // Game Operations
    // =========================================================================

    fn put_game(&self, game: &Game) -> Result<()> {
        self.put_record(cf::GAMES, &keys::game_key(&game.id), game)
    }

    fn get_game(&self, game_id: &GameId) -> Result<Option<Game>> {
        self.get_record(cf::GAMES, &keys::game_key(game_id))
    }

    fn delete_game(&self, game_id: &GameId) -> Result<()> {
        if self.get_game(game_id)?.is_none() {
            return Err(StoreError::NotFound { entity: "game" });
        }
        let cf = self.cf(cf::GAMES)?;
        self.db
            .delete_cf(&cf, keys::game_key(game_id))
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn list_public_games(
        &self,
        query: Option<&str>,
        sort: GameSort,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Game>, usize)> {
        let needle = query.map(str::to_lowercase);

        let mut games: Vec<Game> = self
            .scan_all::<Game>(cf::GAMES)?
            .into_iter()
            .filter(|game| {
                game.is_public
                    && needle.as_deref().map_or(true, |q| {
                        game.name.to_lowercase().contains(q)
                            || game.description.to_lowercase().contains(q)
                    })
            })
            .collect();

        let total = games.len();

        match sort {
            GameSort::Recent => games.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            GameSort::Popular => games.sort_by(|a, b| b.plays_count.cmp(&a.plays_count)),
            GameSort::Likes => games.sort_by(|a, b| b.likes_count.cmp(&a.likes_count)),
        }

        Ok((games.into_iter().skip(offset).take(limit).collect(), total))
    }

    fn increment_plays(&self, game_id: &GameId) -> Result<u64> {
        let _guard = self.ledger_guard();

        let mut game = self
            .get_game(game_id)?
            .ok_or(StoreError::NotFound { entity: "game" })?;
        game.plays_count += 1;
        self.put_record(cf::GAMES, &keys::game_key(game_id), &game)?;
        Ok(game.plays_count)
    }

    // =========================================================================
    // Friendship Operations
    // =========================================================================

    fn get_friendship(&self, a: &UserId, b: &UserId) -> Result<Option<Friendship>> {
        let (lo, hi) = ordered_pair(*a, *b);
        self.get_record(cf::FRIENDSHIPS, &keys::friendship_key(&lo, &hi))
    }

    fn put_friendship(&self, friendship: &Friendship) -> Result<()> {
        self.put_record(
            cf::FRIENDSHIPS,
            &keys::friendship_key(&friendship.user_lo, &friendship.user_hi),
            friendship,
        )
    }

    fn delete_friendship(&self, a: &UserId, b: &UserId) -> Result<()> {
        if self.get_friendship(a, b)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "friendship",
            });
        }
        let (lo, hi) = ordered_pair(*a, *b);
        let cf = self.cf(cf::FRIENDSHIPS)?;
        self.db
            .delete_cf(&cf, keys::friendship_key(&lo, &hi))
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn list_friendships(&self, user_id: &UserId) -> Result<Vec<Friendship>> {
        Ok(self
            .scan_all::<Friendship>(cf::FRIENDSHIPS)?
            .into_iter()
            .filter(|f| f.user_lo == *user_id || f.user_hi == *user_id)
            .collect())
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn purchase_item(&self, user_id: &UserId, item_id: &ItemId) -> Result<PurchaseReceipt> {
        let _guard = self.ledger_guard();

        let item = self
            .get_catalog_item(item_id)?
            .ok_or(StoreError::NotFound { entity: "item" })?;

        let mut user = self
            .get_user(user_id)?
            .ok_or(StoreError::NotFound { entity: "user" })?;

        if user.coins < item.price_coins {
            return Err(StoreError::InsufficientCoins {
                balance: user.coins,
                price: item.price_coins,
            });
        }

        if self.owns_item(user_id, item_id)? {
            return Err(StoreError::AlreadyOwned);
        }

        user.coins -= item.price_coins;
        let entry = InventoryEntry::new(*user_id, *item_id);

        let cf_users = self.cf(cf::USERS)?;
        let cf_inventory = self.cf(cf::INVENTORY)?;

        let user_value = Self::serialize(&user)?;
        let entry_value = Self::serialize(&entry)?;

        // Debit and inventory entry commit together or not at all.
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, keys::user_key(user_id), &user_value);
        batch.put_cf(
            &cf_inventory,
            keys::inventory_key(user_id, item_id),
            &entry_value,
        );

        self.write(batch)?;

        Ok(PurchaseReceipt {
            balance: user.coins,
        })
    }

    fn redeem_code(&self, user_id: &UserId, raw_code: &str) -> Result<RedeemReceipt> {
        let code_str = normalize_code(raw_code);

        let _guard = self.ledger_guard();

        let mut code = self
            .get_promo_code(&code_str)?
            .ok_or(StoreError::NotFound { entity: "code" })?;

        if code.uses_left == 0 {
            return Err(StoreError::CodeExhausted);
        }

        if code.is_expired(chrono::Utc::now()) {
            return Err(StoreError::CodeExpired);
        }

        if self.key_exists(cf::PROMO_REDEMPTIONS, &keys::redemption_key(user_id, &code_str))? {
            return Err(StoreError::AlreadyRedeemed);
        }

        let mut user = self
            .get_user(user_id)?
            .ok_or(StoreError::NotFound { entity: "user" })?;

        code.uses_left -= 1;
        user.coins += code.coins_amount;
        let redemption = PromoRedemption::new(*user_id, code_str.clone());

        let cf_codes = self.cf(cf::PROMO_CODES)?;
        let cf_users = self.cf(cf::USERS)?;
        let cf_redemptions = self.cf(cf::PROMO_REDEMPTIONS)?;

        let code_value = Self::serialize(&code)?;
        let user_value = Self::serialize(&user)?;
        let redemption_value = Self::serialize(&redemption)?;

        // Use-decrement, grant and redemption record commit together.
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_codes, keys::promo_code_key(&code_str), &code_value);
        batch.put_cf(&cf_users, keys::user_key(user_id), &user_value);
        batch.put_cf(
            &cf_redemptions,
            keys::redemption_key(user_id, &code_str),
            &redemption_value,
        );

        self.write(batch)?;

        Ok(RedeemReceipt {
            coins_added: code.coins_amount,
            balance: user.coins,
        })
    }
}
