//! Friendship handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use coreplay_core::{FriendStatus, Friendship, UserId};
use coreplay_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::users::UserView;
use crate::state::AppState;

/// A friendship as seen by one of its members.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendView {
    /// The other user.
    pub user: UserView,
    /// Request state.
    pub status: FriendStatus,
    /// Whether the current user sent the request.
    pub requested_by_me: bool,
}

/// List the current user's friendships, pending requests included.
pub async fn list(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<FriendView>>, ApiError> {
    let friendships = state.store.list_friendships(&auth.user_id)?;

    let mut views = Vec::with_capacity(friendships.len());
    for friendship in friendships {
        let other_id = friendship.other(auth.user_id);
        let Some(other) = state.store.get_user(&other_id)? else {
            continue; // deleted account, record is a leftover
        };
        views.push(FriendView {
            user: UserView::from(&other),
            status: friendship.status,
            requested_by_me: friendship.requested_by == auth.user_id,
        });
    }

    Ok(Json(views))
}

/// Send a friend request, or accept one coming the other way.
pub async fn add(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(friend_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let friend_id = friend_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("invalid user id".into()))?;

    if friend_id == auth.user_id {
        return Err(ApiError::BadRequest("cannot add yourself".into()));
    }

    if state.store.get_user(&friend_id)?.is_none() {
        return Err(ApiError::NotFound("user not found".into()));
    }

    let status = match state.store.get_friendship(&auth.user_id, &friend_id)? {
        None => {
            let friendship = Friendship::request(auth.user_id, friend_id);
            state.store.put_friendship(&friendship)?;
            FriendStatus::Pending
        }
        Some(existing) => match existing.status {
            FriendStatus::Accepted => {
                return Err(ApiError::BadRequest("already friends".into()));
            }
            FriendStatus::Pending if existing.requested_by == auth.user_id => {
                return Err(ApiError::BadRequest("request already sent".into()));
            }
            FriendStatus::Pending => {
                // The other side asked first; this call accepts.
                let accepted = Friendship {
                    status: FriendStatus::Accepted,
                    ..existing
                };
                state.store.put_friendship(&accepted)?;
                FriendStatus::Accepted
            }
        },
    };

    tracing::info!(user_id = %auth.user_id, friend_id = %friend_id, ?status, "friendship updated");

    Ok(Json(serde_json::json!({ "success": true, "status": status })))
}

/// Remove a friendship (or withdraw/decline a request).
pub async fn remove(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(friend_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let friend_id = friend_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("invalid user id".into()))?;

    state.store.delete_friendship(&auth.user_id, &friend_id)?;

    Ok(Json(serde_json::json!({ "success": true })))
}
