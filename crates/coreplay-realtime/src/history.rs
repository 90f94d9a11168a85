//! Bounded in-memory chat history.

use coreplay_core::ChatMessage;

/// Default replay window.
pub const DEFAULT_CAPACITY: usize = 50;

/// A bounded buffer of the most recent chat messages.
///
/// Appends are cheap: the buffer is allowed to grow to twice its capacity
/// before one batched trim cuts it back to the newest `capacity` messages.
/// The amortized trim is deliberate — replay only ever reads the newest
/// `capacity`, so the overshoot is invisible to consumers.
///
/// Process-local and lossy across restarts; the durable copy lives in the
/// store's chat log.
#[derive(Debug)]
pub struct HistoryCache {
    capacity: usize,
    messages: Vec<ChatMessage>,
}

impl HistoryCache {
    /// Create a cache replaying up to `capacity` messages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: Vec::new(),
        }
    }

    /// Append a message, trimming in batch once the buffer passes twice
    /// the capacity.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > self.capacity * 2 {
            let excess = self.messages.len() - self.capacity;
            self.messages.drain(..excess);
        }
    }

    /// The newest messages, oldest first, at most `capacity` of them.
    #[must_use]
    pub fn recent(&self) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(self.capacity);
        &self.messages[start..]
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
