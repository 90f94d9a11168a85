//! Game publishing and browsing handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use coreplay_core::{Game, GameId, GAME_DESC_MAX, GAME_NAME_MAX};
use coreplay_store::{GameSort, Store};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// A game in listings and detail responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// Game ID.
    pub id: String,
    /// Creator's user ID.
    pub creator_id: String,
    /// Creator's display name.
    pub creator_name: String,
    /// Game name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// Play count.
    pub plays_count: u64,
    /// Like count.
    pub likes_count: u64,
    /// Publish time.
    pub created_at: String,
    /// Last edit time.
    pub updated_at: String,
    /// The scene document; present on detail responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl GameView {
    fn new(game: &Game, creator_name: String, with_data: bool) -> Self {
        Self {
            id: game.id.to_string(),
            creator_id: game.creator_id.to_string(),
            creator_name,
            name: game.name.clone(),
            description: game.description.clone(),
            thumbnail_url: game.thumbnail_url.clone(),
            plays_count: game.plays_count,
            likes_count: game.likes_count,
            created_at: game.created_at.to_rfc3339(),
            updated_at: game.updated_at.to_rfc3339(),
            data: with_data.then(|| game.data.clone()),
        }
    }
}

fn creator_name(state: &AppState, game: &Game) -> Result<String, ApiError> {
    Ok(state
        .store
        .get_user(&game.creator_id)?
        .map_or_else(|| "unknown".to_string(), |u| u.display_name))
}

/// Game listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    /// Search text matched against names and descriptions.
    pub q: Option<String>,
    /// Sort order: `recent` (default), `popular` or `likes`.
    pub sort: Option<String>,
    /// Maximum games to return (default: 24).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    24
}

/// Game listing response.
#[derive(Debug, Serialize)]
pub struct ListGamesResponse {
    /// The page of games.
    pub games: Vec<GameView>,
    /// Total matches across all pages.
    pub total: usize,
}

/// List public games.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<ListGamesResponse>, ApiError> {
    let sort = match query.sort.as_deref() {
        Some("popular") => GameSort::Popular,
        Some("likes") => GameSort::Likes,
        _ => GameSort::Recent,
    };

    let (games, total) = state.store.list_public_games(
        query.q.as_deref().filter(|q| !q.is_empty()),
        sort,
        query.limit.min(100),
        query.offset,
    )?;

    let mut views = Vec::with_capacity(games.len());
    for game in &games {
        let name = creator_name(&state, game)?;
        views.push(GameView::new(game, name, false));
    }

    Ok(Json(ListGamesResponse {
        games: views,
        total,
    }))
}

/// Get a game with its scene document.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let game = state
        .store
        .get_game(&game_id)?
        .ok_or_else(|| ApiError::NotFound("game not found".into()))?;

    let name = creator_name(&state, &game)?;
    Ok(Json(GameView::new(&game, name, true)))
}

/// Game creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Game name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_url: String,
    /// The scene document.
    pub data: serde_json::Value,
}

/// Publish a new game.
pub async fn create(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() || name.chars().count() > GAME_NAME_MAX {
        return Err(ApiError::BadRequest("invalid name".into()));
    }
    if body.data.is_null() {
        return Err(ApiError::BadRequest("game data required".into()));
    }

    let mut game = Game::new(auth.user_id, name.to_string(), &body.description, body.data);
    game.thumbnail_url = body.thumbnail_url;
    state.store.put_game(&game)?;

    tracing::info!(game_id = %game.id, creator_id = %auth.user_id, "game published");

    let creator = creator_name(&state, &game)?;
    Ok((StatusCode::CREATED, Json(GameView::new(&game, creator, true))))
}

/// Game update request; absent fields are untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// New scene document.
    pub data: Option<serde_json::Value>,
    /// New visibility.
    pub is_public: Option<bool>,
}

/// Update a game. Creator only.
pub async fn update(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(game_id): Path<String>,
    Json(body): Json<UpdateGameRequest>,
) -> Result<Json<GameView>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let mut game = state
        .store
        .get_game(&game_id)?
        .ok_or_else(|| ApiError::NotFound("game not found".into()))?;

    if game.creator_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() || name.chars().count() > GAME_NAME_MAX {
            return Err(ApiError::BadRequest("invalid name".into()));
        }
        game.name = name;
    }
    if let Some(description) = body.description {
        game.description = description.chars().take(GAME_DESC_MAX).collect();
    }
    if let Some(thumbnail_url) = body.thumbnail_url {
        game.thumbnail_url = thumbnail_url;
    }
    if let Some(data) = body.data {
        game.data = data;
    }
    if let Some(is_public) = body.is_public {
        game.is_public = is_public;
    }
    game.updated_at = chrono::Utc::now();

    state.store.put_game(&game)?;

    let creator = creator_name(&state, &game)?;
    Ok(Json(GameView::new(&game, creator, true)))
}

/// Delete a game. Creator only.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(game_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let game = state
        .store
        .get_game(&game_id)?
        .ok_or_else(|| ApiError::NotFound("game not found".into()))?;

    if game.creator_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    state.store.delete_game(&game_id)?;

    tracing::info!(game_id = %game_id, "game deleted");

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Count a play.
pub async fn play(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let plays = state.store.increment_plays(&game_id)?;
    Ok(Json(serde_json::json!({ "plays": plays })))
}

fn parse_game_id(raw: &str) -> Result<GameId, ApiError> {
    raw.parse::<GameId>()
        .map_err(|_| ApiError::BadRequest("invalid game id".into()))
}
