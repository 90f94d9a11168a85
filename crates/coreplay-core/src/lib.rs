//! Core types and utilities for coreplay.
//!
//! This crate provides the foundational types used throughout the coreplay
//! platform:
//!
//! - **Identifiers**: `UserId`, `GameId`, `ItemId`, `ConnectionId`, `MessageId`
//! - **Users**: `User` and registration validation
//! - **Catalog**: `CatalogItem`, `InventoryEntry`
//! - **Promo codes**: `PromoCode`, `PromoRedemption`
//! - **Chat**: `ChatMessage`
//! - **Games**: `Game`
//! - **Friends**: `Friendship`, `FriendStatus`
//!
//! # CoreCoins
//!
//! The platform currency is the CoreCoin, stored as `u64` whole units so a
//! balance can never go negative by construction. All balance changes go
//! through the store's compound operations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod chat;
pub mod friend;
pub mod game;
pub mod ids;
pub mod promo;
pub mod user;

pub use catalog::{CatalogItem, InventoryEntry};
pub use chat::ChatMessage;
pub use friend::{FriendStatus, Friendship};
pub use game::{Game, GAME_DESC_MAX, GAME_NAME_MAX};
pub use ids::{ConnectionId, GameId, IdError, ItemId, MessageId, UserId};
pub use promo::{normalize_code, PromoCode, PromoRedemption};
pub use user::{
    normalize_display_name, normalize_email, normalize_username, validate_password, User,
    ValidationError, PASSWORD_MIN, USERNAME_MAX, USERNAME_MIN,
};
