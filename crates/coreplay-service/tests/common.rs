//! Common test utilities for coreplay integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use coreplay_service::{create_router, seed, AppState, ServiceConfig};
use coreplay_store::RocksStore;

/// The admin key wired into every test server.
pub const ADMIN_KEY: &str = "test-admin-key";

static CODE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh, seeded database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));
        seed::seed_catalog(store.as_ref()).expect("Failed to seed catalog");

        let config = ServiceConfig {
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: "test-secret".into(),
            admin_api_key: Some(ADMIN_KEY.into()),
            ..ServiceConfig::default()
        };

        let state = AppState::new(store, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Register a user, returning their bearer token and profile.
    pub async fn register(&self, username: &str) -> (String, serde_json::Value) {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "hunter22",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        let token = body["token"].as_str().expect("token in response").to_string();
        (token, body["user"].clone())
    }

    /// Format a bearer header value.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Create a promo code through the admin endpoint.
    pub async fn create_code(&self, code: &str, coins: u64, uses: u32) {
        self.server
            .post("/api/codes")
            .add_header("x-admin-key", ADMIN_KEY.to_string())
            .json(&json!({
                "code": code,
                "coinsAmount": coins,
                "usesTotal": uses,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    /// Grant coins to a user by minting and redeeming a one-off code.
    ///
    /// Funding goes through the transaction engine like any other grant,
    /// so balances stay consistent with the ledger's own rules.
    pub async fn fund(&self, token: &str, coins: u64) {
        let code = format!("FUND{}", CODE_COUNTER.fetch_add(1, Ordering::SeqCst));
        self.create_code(&code, coins, 1).await;

        self.server
            .post("/api/codes/redeem")
            .add_header("authorization", Self::bearer(token))
            .json(&json!({ "code": code }))
            .await
            .assert_status_ok();
    }

    /// Fetch the current balance via the profile endpoint.
    pub async fn balance(&self, token: &str) -> u64 {
        let response = self
            .server
            .get("/api/auth/me")
            .add_header("authorization", Self::bearer(token))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["coins"].as_u64().expect("coins in profile")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
