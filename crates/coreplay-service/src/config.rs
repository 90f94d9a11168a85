//! Service configuration.

use coreplay_realtime::history::DEFAULT_CAPACITY;
use coreplay_realtime::rooms::DEFAULT_MAX_MESSAGE_LEN;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:3000").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/coreplay").
    pub data_dir: String,

    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,

    /// Token lifetime in hours (default: 168 = 7 days).
    pub token_ttl_hours: i64,

    /// Admin API key for privileged endpoints (promo-code creation).
    pub admin_api_key: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Chat history replay window.
    pub chat_history_capacity: usize,

    /// Maximum chat message length in characters.
    pub max_message_len: usize,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/coreplay".into()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "coreplay-dev-secret-change-in-production".into()),
            token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(168),
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024), // 10MB, scene documents are large
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            chat_history_capacity: std::env::var("CHAT_HISTORY_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            max_message_len: std::env::var("MAX_MESSAGE_LEN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_MESSAGE_LEN),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".into(),
            data_dir: "/data/coreplay".into(),
            jwt_secret: "coreplay-dev-secret-change-in-production".into(),
            token_ttl_hours: 168,
            admin_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 10 * 1024 * 1024,
            request_timeout_seconds: 30,
            chat_history_capacity: DEFAULT_CAPACITY,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }
}
