//! User account types and registration validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Minimum username length.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length.
pub const USERNAME_MAX: usize = 20;
/// Minimum password length.
pub const PASSWORD_MIN: usize = 6;

/// A platform user.
///
/// `coins` is the CoreCoin balance; it is mutated only by the store's
/// compound operations (purchases and promo redemptions), never by plain
/// record updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub id: UserId,

    /// Unique login name, lowercased at registration.
    pub username: String,

    /// Unique email, lowercased at registration.
    pub email: String,

    /// Argon2 hash of the password. Never serialized to API responses.
    pub password_hash: String,

    /// Unique public name, shown in chat and game rooms.
    pub display_name: String,

    /// CoreCoin balance.
    pub coins: u64,

    /// Opaque avatar descriptor owned by the editor frontend.
    pub avatar: serde_json::Value,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// Last successful login, if any.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with zero balance.
    ///
    /// The display name starts equal to the username, as registration does
    /// not ask for one.
    #[must_use]
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: UserId::generate(),
            display_name: username.clone(),
            username,
            email,
            password_hash,
            coins: 0,
            avatar: serde_json::Value::Null,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    /// Check whether the balance covers a price.
    #[must_use]
    pub const fn has_coins(&self, price: u64) -> bool {
        self.coins >= price
    }
}

/// Validation failures for user-supplied profile fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Username length or charset violation.
    #[error("username must be {USERNAME_MIN}-{USERNAME_MAX} characters of letters, digits or underscore")]
    InvalidUsername,

    /// Email does not look like an address.
    #[error("invalid email")]
    InvalidEmail,

    /// Password too short.
    #[error("password must be at least {PASSWORD_MIN} characters")]
    PasswordTooShort,

    /// Display name length violation.
    #[error("display name must be {USERNAME_MIN}-{USERNAME_MAX} characters")]
    InvalidDisplayName,
}

/// Normalize and validate a username: trimmed, lowercased, `[a-z0-9_]`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidUsername`] on length or charset violation.
pub fn normalize_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim().to_lowercase();
    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
        return Err(ValidationError::InvalidUsername);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(username)
}

/// Normalize and validate an email: trimmed, lowercased, `local@domain.tld`.
///
/// Deliberately shallow — the mail system is the real validator.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] if the shape is wrong.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

/// Validate a password against the minimum length.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordTooShort`] if too short.
pub fn validate_password(raw: &str) -> Result<(), ValidationError> {
    if raw.len() < PASSWORD_MIN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Normalize and validate a display name: trimmed, length-bounded.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDisplayName`] on length violation.
pub fn normalize_display_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim().to_string();
    if name.len() < USERNAME_MIN || name.len() > USERNAME_MAX {
        return Err(ValidationError::InvalidDisplayName);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_starts_broke() {
        let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
        assert_eq!(user.coins, 0);
        assert_eq!(user.display_name, "alice");
        assert!(user.last_login.is_none());
        assert!(!user.has_coins(1));
        assert!(user.has_coins(0));
    }

    #[test]
    fn username_is_lowercased_and_trimmed() {
        assert_eq!(normalize_username("  Alice_99 ").unwrap(), "alice_99");
    }

    #[test]
    fn username_rejects_bad_charset_and_length() {
        assert!(normalize_username("al").is_err());
        assert!(normalize_username("a".repeat(21).as_str()).is_err());
        assert!(normalize_username("with space").is_err());
        assert!(normalize_username("dash-ed").is_err());
    }

    #[test]
    fn email_shape_checked() {
        assert_eq!(normalize_email(" Bob@Example.COM ").unwrap(), "bob@example.com");
        assert!(normalize_email("nope").is_err());
        assert!(normalize_email("a@b").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn display_name_keeps_case() {
        assert_eq!(normalize_display_name(" Cool Kid ").unwrap(), "Cool Kid");
        assert!(normalize_display_name("x").is_err());
    }
}
