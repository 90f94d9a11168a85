//! Promo-code handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use chrono::{DateTime, Utc};
use coreplay_core::PromoCode;
use coreplay_store::Store;

use crate::auth::{AdminAuth, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Redemption request.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    /// The code to redeem (case-insensitive).
    pub code: String,
}

/// Redemption response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    /// Always true on the success path.
    pub success: bool,
    /// CoreCoins granted.
    pub coins_added: u64,
    /// Balance after the grant.
    pub balance: u64,
}

/// Redeem a promo code for CoreCoins.
pub async fn redeem(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, ApiError> {
    if body.code.trim().is_empty() {
        return Err(ApiError::BadRequest("code required".into()));
    }

    let receipt = state.store.redeem_code(&auth.user_id, &body.code)?;

    tracing::info!(
        user_id = %auth.user_id,
        coins_added = %receipt.coins_added,
        balance = %receipt.balance,
        "promo code redeemed"
    );

    Ok(Json(RedeemResponse {
        success: true,
        coins_added: receipt.coins_added,
        balance: receipt.balance,
    }))
}

/// Code creation request (admin).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCodeRequest {
    /// The code string (will be normalized).
    pub code: String,
    /// CoreCoins granted per redemption (default: 100).
    #[serde(default = "default_coins_amount")]
    pub coins_amount: u64,
    /// Total redemptions allowed (default: 1).
    #[serde(default = "default_uses_total")]
    pub uses_total: u32,
    /// Optional expiry as Unix millis.
    pub expires_at: Option<i64>,
}

fn default_coins_amount() -> u64 {
    100
}

fn default_uses_total() -> u32 {
    1
}

/// Create a promo code (admin key required).
pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(body): Json<CreateCodeRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if body.code.trim().is_empty() {
        return Err(ApiError::BadRequest("code required".into()));
    }

    let expires_at = body
        .expires_at
        .map(|ms| {
            DateTime::<Utc>::from_timestamp_millis(ms)
                .ok_or_else(|| ApiError::BadRequest("invalid expiry".into()))
        })
        .transpose()?;

    let code = PromoCode::new(&body.code, body.coins_amount, body.uses_total, expires_at);
    state.store.put_promo_code(&code)?;

    tracing::info!(code = %code.code, uses_total = %code.uses_total, "promo code created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "code": code.code })),
    ))
}
