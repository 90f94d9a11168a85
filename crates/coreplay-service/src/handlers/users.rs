//! User profile handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use coreplay_core::{normalize_display_name, User, UserId};
use coreplay_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Public user profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// User ID.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Public display name.
    pub display_name: String,
    /// CoreCoin balance.
    pub coins: u64,
    /// Avatar descriptor.
    pub avatar: serde_json::Value,
    /// Registration timestamp.
    pub created_at: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            coins: user.coins,
            avatar: user.avatar.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// User search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match against usernames and display names.
    #[serde(default)]
    pub q: String,
    /// Maximum results (default: 20).
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    20
}

/// Search users by name.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = state.store.search_users(&query.q, query.limit.min(100))?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

/// Get a user's public profile.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("invalid user id".into()))?;

    let user = state
        .store
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(UserView::from(&user)))
}

/// Display-name change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDisplayNameRequest {
    /// The new display name.
    pub display_name: String,
}

/// Change the current user's display name.
pub async fn update_display_name(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<UpdateDisplayNameRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let name = normalize_display_name(&body.display_name)?;
    state.store.set_display_name(&auth.user_id, &name)?;

    tracing::info!(user_id = %auth.user_id, "display name changed");

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Replace the current user's avatar descriptor.
pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(avatar): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.set_avatar(&auth.user_id, avatar)?;
    Ok(Json(serde_json::json!({ "success": true })))
}
