//! Presence, rooms and chat fan-out for coreplay.
//!
//! This crate is the real-time half of the platform: it tracks which live
//! connections belong to which user ([`PresenceRegistry`]), routes chat and
//! game events to the right connection sets ([`RoomEngine`]), and replays a
//! bounded window of recent chat to new arrivals ([`HistoryCache`]).
//!
//! The crate is transport-independent. A connection is a
//! [`ConnectionId`](coreplay_core::ConnectionId) plus an unbounded channel
//! of [`ServerEvent`]s; whatever owns the socket drains that channel.
//! Delivery is fire-and-forget — a closed channel drops the event for that
//! peer and nothing else.
//!
//! The engine does no locking of its own: the caller serializes all calls
//! (the service wraps it in one mutex), so each operation runs to
//! completion without interleaving, exactly as a single-threaded event
//! loop would.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod events;
pub mod history;
pub mod presence;
pub mod rooms;

pub use events::{ClientEvent, PlayerInfo, ServerEvent};
pub use history::HistoryCache;
pub use presence::{EventSink, Identity, PresenceRegistry};
pub use rooms::{MessageStore, RoomEngine};
