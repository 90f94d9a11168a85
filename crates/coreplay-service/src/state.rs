//! Application state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use coreplay_realtime::RoomEngine;
use coreplay_store::RocksStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
///
/// The room engine sits behind one mutex: every presence/room operation
/// runs to completion while holding it, which is the serialization the
/// engine's single-writer design expects. None of those operations block
/// or await, so the lock is held only for in-memory work.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// The real-time room engine.
    pub engine: Arc<Mutex<RoomEngine>>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let engine = RoomEngine::new(
            Arc::clone(&store) as Arc<dyn coreplay_realtime::MessageStore>,
            config.chat_history_capacity,
            config.max_message_len,
        );

        Self {
            store,
            engine: Arc::new(Mutex::new(engine)),
            config,
        }
    }

    /// Lock the room engine, recovering from poisoning (engine state stays
    /// consistent because its operations never panic mid-mutation on the
    /// shared maps).
    pub fn engine(&self) -> MutexGuard<'_, RoomEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
