//! Coreplay HTTP and WebSocket API service.
//!
//! This crate fronts the platform with:
//!
//! - Account registration, login and profiles
//! - The catalog and CoreCoin purchases
//! - Promo-code redemption
//! - Game publishing and browsing
//! - Friends
//! - The real-time channel: presence, server chat and game rooms
//!
//! # Authentication
//!
//! End users authenticate with HS256 bearer tokens issued at
//! registration/login. The WebSocket handshake accepts the same token as a
//! query parameter; a missing or invalid token leaves the connection
//! anonymous rather than rejecting it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async for routing consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod seed;
pub mod state;
pub mod ws;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
