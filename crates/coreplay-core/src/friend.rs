//! Friendships.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Friendship request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    /// Requested, not yet accepted by the other side.
    Pending,

    /// Both sides confirmed.
    Accepted,
}

/// A friendship between two users.
///
/// The unordered pair is stored as an ordered pair — smaller UUID first —
/// so exactly one record can exist per pair regardless of who asked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    /// The smaller of the two user IDs.
    pub user_lo: UserId,

    /// The larger of the two user IDs.
    pub user_hi: UserId,

    /// Current state.
    pub status: FriendStatus,

    /// Who sent the request; acceptance must come from the other side.
    pub requested_by: UserId,

    /// When the request was sent.
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// Create a pending request from `requester` to `other`.
    #[must_use]
    pub fn request(requester: UserId, other: UserId) -> Self {
        let (user_lo, user_hi) = ordered_pair(requester, other);
        Self {
            user_lo,
            user_hi,
            status: FriendStatus::Pending,
            requested_by: requester,
            created_at: Utc::now(),
        }
    }

    /// The member of the pair that is not `user_id`.
    #[must_use]
    pub fn other(&self, user_id: UserId) -> UserId {
        if self.user_lo == user_id {
            self.user_hi
        } else {
            self.user_lo
        }
    }
}

/// Order a pair of user IDs (smaller UUID first).
#[must_use]
pub fn ordered_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a.as_bytes() <= b.as_bytes() {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_is_canonical() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_eq!(ordered_pair(a, b), ordered_pair(b, a));
    }

    #[test]
    fn request_is_pending_and_tracks_requester() {
        let a = UserId::generate();
        let b = UserId::generate();
        let friendship = Friendship::request(a, b);
        assert_eq!(friendship.status, FriendStatus::Pending);
        assert_eq!(friendship.requested_by, a);
        assert_eq!(friendship.other(a), b);
        assert_eq!(friendship.other(b), a);
    }
}
