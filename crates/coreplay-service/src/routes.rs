//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, catalog, codes, friends, games, health, presence, users};
use crate::state::AppState;
use crate::ws;

/// Maximum concurrent requests for the REST API.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /ws` - WebSocket upgrade (token optional)
///
/// ## Auth
/// - `POST /api/auth/register`, `POST /api/auth/login`,
///   `POST /api/auth/logout`, `GET /api/auth/me`
///
/// ## Users
/// - `GET /api/users/search`, `GET /api/users/{id}`,
///   `PUT /api/users/me/display-name`, `PUT /api/users/me/avatar`
///
/// ## Friends (auth required)
/// - `GET /api/friends`, `POST /api/friends/{id}`, `DELETE /api/friends/{id}`
///
/// ## Games
/// - `GET /api/games`, `GET /api/games/{id}`, `POST /api/games`,
///   `PUT /api/games/{id}`, `DELETE /api/games/{id}`, `POST /api/games/{id}/play`
///
/// ## Catalog
/// - `GET /api/catalog`, `GET /api/catalog/inventory`, `POST /api/catalog/purchase`
///
/// ## Promo codes
/// - `POST /api/codes/redeem`; `POST /api/codes` (admin key)
///
/// ## Presence
/// - `GET /api/presence/online`
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Users
        .route("/users/search", get(users::search))
        .route("/users/me/display-name", put(users::update_display_name))
        .route("/users/me/avatar", put(users::update_avatar))
        .route("/users/:id", get(users::get_user))
        // Friends
        .route("/friends", get(friends::list))
        .route("/friends/:id", post(friends::add))
        .route("/friends/:id", delete(friends::remove))
        // Games
        .route("/games", get(games::list))
        .route("/games", post(games::create))
        .route("/games/:id", get(games::get))
        .route("/games/:id", put(games::update))
        .route("/games/:id", delete(games::delete))
        .route("/games/:id/play", post(games::play))
        // Catalog
        .route("/catalog", get(catalog::list))
        .route("/catalog/inventory", get(catalog::inventory))
        .route("/catalog/purchase", post(catalog::purchase))
        // Promo codes
        .route("/codes", post(codes::create))
        .route("/codes/redeem", post(codes::redeem))
        // Presence
        .route("/presence/online", get(presence::online))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // REST API
        .nest("/api", api_routes)
        // Real-time channel
        .route("/ws", get(ws::ws_handler))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
