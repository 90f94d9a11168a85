//! Catalog and purchase handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use coreplay_core::{CatalogItem, ItemId};
use coreplay_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// A catalog item as listed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    /// Item ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Descriptive text.
    pub description: String,
    /// Price in CoreCoins.
    pub price_coins: u64,
    /// Asset URL, if any.
    pub asset_url: Option<String>,
}

impl From<&CatalogItem> for ItemView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            item_type: item.item_type.clone(),
            description: item.description.clone(),
            price_coins: item.price_coins,
            asset_url: item.asset_url.clone(),
        }
    }
}

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// Filter by type tag.
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    /// Maximum items to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// List catalog items.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    let items = state.store.list_catalog_items(
        query.item_type.as_deref(),
        query.limit.min(100),
        query.offset,
    )?;
    Ok(Json(items.iter().map(ItemView::from).collect()))
}

/// An owned item in the inventory listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    /// The owned item.
    #[serde(flatten)]
    pub item: ItemView,
    /// When it was purchased.
    pub purchased_at: String,
}

/// List the current user's inventory, newest purchase first.
pub async fn inventory(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<InventoryView>>, ApiError> {
    let entries = state.store.list_inventory(&auth.user_id)?;

    let mut views = Vec::with_capacity(entries.len());
    for entry in entries {
        // Items are immutable seed data; a missing one means a partial
        // seed wipe, which we surface as an absent row rather than a 500.
        let Some(item) = state.store.get_catalog_item(&entry.item_id)? else {
            continue;
        };
        views.push(InventoryView {
            item: ItemView::from(&item),
            purchased_at: entry.purchased_at.to_rfc3339(),
        });
    }

    Ok(Json(views))
}

/// Purchase request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// The item to buy.
    pub item_id: String,
}

/// Purchase response.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Balance after the debit.
    pub balance: u64,
}

/// Buy a catalog item with CoreCoins.
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let item_id = body
        .item_id
        .parse::<ItemId>()
        .map_err(|_| ApiError::BadRequest("invalid item id".into()))?;

    let receipt = state.store.purchase_item(&auth.user_id, &item_id)?;

    tracing::info!(
        user_id = %auth.user_id,
        item_id = %item_id,
        balance = %receipt.balance,
        "item purchased"
    );

    Ok(Json(PurchaseResponse {
        success: true,
        balance: receipt.balance,
    }))
}
