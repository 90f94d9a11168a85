//! Presence handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use coreplay_realtime::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// List the currently online users (one entry per identified connection).
pub async fn online(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Identity>>, ApiError> {
    let users = state.engine().online_users();
    Ok(Json(users))
}
