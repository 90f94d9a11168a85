//! Registration and login integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_success() {
    let harness = TestHarness::new();

    let (token, user) = harness.register("alice").await;
    assert!(!token.is_empty());
    assert_eq!(user["username"], "alice");
    assert_eq!(user["displayName"], "alice");
    assert_eq!(user["coins"], 0);
}

#[tokio::test]
async fn register_normalizes_username() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "  Alice_99 ",
            "email": "ALICE@Example.com",
            "password": "hunter22",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["username"], "alice_99");
}

#[tokio::test]
async fn register_duplicate_username_conflicts() {
    let harness = TestHarness::new();
    harness.register("alice").await;

    let response = harness
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice2@example.com",
            "password": "hunter22",
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let harness = TestHarness::new();

    for (username, email, password) in [
        ("al", "ok@example.com", "hunter22"),        // username too short
        ("has space", "ok@example.com", "hunter22"), // bad charset
        ("alice", "not-an-email", "hunter22"),       // bad email
        ("alice", "ok@example.com", "short"),        // short password
    ] {
        let response = harness
            .server
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .await;
        response.assert_status_bad_request();
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_with_username_and_email() {
    let harness = TestHarness::new();
    harness.register("alice").await;

    for identifier in ["alice", "alice@example.com"] {
        let response = harness
            .server
            .post("/api/auth/login")
            .json(&json!({
                "usernameOrEmail": identifier,
                "password": "hunter22",
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert!(body["token"].as_str().is_some());
        assert_eq!(body["user"]["username"], "alice");
    }
}

#[tokio::test]
async fn login_wrong_password_unauthorized() {
    let harness = TestHarness::new();
    harness.register("alice").await;

    let response = harness
        .server
        .post("/api/auth/login")
        .json(&json!({
            "usernameOrEmail": "alice",
            "password": "wrong",
        }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn login_unknown_user_unauthorized() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth/login")
        .json(&json!({
            "usernameOrEmail": "ghost",
            "password": "hunter22",
        }))
        .await;
    response.assert_status_unauthorized();
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn me_returns_profile() {
    let harness = TestHarness::new();
    let (token, _) = harness.register("alice").await;

    let response = harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn me_without_token_unauthorized() {
    let harness = TestHarness::new();

    harness.server.get("/api/auth/me").await.assert_status_unauthorized();

    harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", "Bearer garbage".to_string())
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn logout_always_succeeds() {
    let harness = TestHarness::new();

    let response = harness.server.post("/api/auth/logout").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
}
