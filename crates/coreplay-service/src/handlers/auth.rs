//! Registration, login and session handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use coreplay_core::{normalize_email, normalize_username, validate_password, User};
use coreplay_store::Store;

use crate::auth::{self, AuthUser};
use crate::error::ApiError;
use crate::handlers::users::UserView;
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password in the clear (hashed before storage).
    pub password: String,
}

/// Response carrying a fresh session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The user's profile.
    pub user: UserView,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Register a new account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let username = normalize_username(&body.username)?;
    let email = normalize_email(&body.email)?;
    validate_password(&body.password)?;

    let password_hash = auth::hash_password(&body.password)?;
    let user = User::new(username, email, password_hash);

    state.store.create_user(&user)?;

    let token = auth::issue_token(
        &state.config.jwt_secret,
        user.id,
        &user.username,
        state.config.token_ttl_hours,
    )?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&user),
            token,
        }),
    ))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email address.
    pub username_or_email: String,
    /// Password in the clear.
    pub password: String,
}

/// Authenticate and issue a session token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let identifier = body.username_or_email.trim().to_lowercase();

    let user = if identifier.contains('@') {
        state.store.get_user_by_email(&identifier)?
    } else {
        state.store.get_user_by_username(&identifier)?
    };

    // One failure path for unknown user and wrong password alike.
    let user = user
        .filter(|u| auth::verify_password(&u.password_hash, &body.password))
        .ok_or(ApiError::Unauthorized)?;

    state.store.touch_last_login(&user.id)?;

    let token = auth::issue_token(
        &state.config.jwt_secret,
        user.id,
        &user.username,
        state.config.token_ttl_hours,
    )?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

/// Log out.
///
/// Tokens are stateless, so this is a client-side affair; the endpoint
/// exists for the frontend's convenience.
pub async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true }))
}

/// Get the current user's own profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(UserView::from(&user)))
}
