//! Promo codes and redemptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Normalize a promo code for lookup: trimmed, ASCII upper-cased.
///
/// Codes are case-insensitive on the wire; the normalized form is the
/// storage key.
#[must_use]
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// A promotional code granting CoreCoins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    /// The normalized code string (unique).
    pub code: String,

    /// CoreCoins granted per redemption.
    pub coins_amount: u64,

    /// Total redemptions allowed.
    pub uses_total: u32,

    /// Redemptions remaining. Monotonically decreasing, floor 0.
    pub uses_left: u32,

    /// Optional expiry; a code with no expiry never expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the code was created.
    pub created_at: DateTime<Utc>,
}

impl PromoCode {
    /// Create a new code. The code string is normalized here.
    #[must_use]
    pub fn new(code: &str, coins_amount: u64, uses_total: u32, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            code: normalize_code(code),
            coins_amount,
            uses_total,
            uses_left: uses_total,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Whether the code has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}

/// A record that a user redeemed a code.
///
/// At most one redemption exists per `(user, code)` pair; the store checks
/// this before granting currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoRedemption {
    /// The redeeming user.
    pub user_id: UserId,

    /// The normalized code.
    pub code: String,

    /// When the redemption happened.
    pub redeemed_at: DateTime<Utc>,
}

impl PromoRedemption {
    /// Record a redemption made now.
    #[must_use]
    pub fn new(user_id: UserId, code: String) -> Self {
        Self {
            user_id,
            code,
            redeemed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn codes_normalize_case_and_whitespace() {
        assert_eq!(normalize_code("  welcome10 "), "WELCOME10");
        let code = PromoCode::new("welcome10", 10, 1, None);
        assert_eq!(code.code, "WELCOME10");
        assert_eq!(code.uses_left, 1);
    }

    #[test]
    fn expiry_only_when_set() {
        let now = Utc::now();
        let fresh = PromoCode::new("A", 5, 1, Some(now + Duration::hours(1)));
        let stale = PromoCode::new("B", 5, 1, Some(now - Duration::hours(1)));
        let eternal = PromoCode::new("C", 5, 1, None);
        assert!(!fresh.is_expired(now));
        assert!(stale.is_expired(now));
        assert!(!eternal.is_expired(now));
    }
}
