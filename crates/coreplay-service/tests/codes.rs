//! Promo-code integration tests.

mod common;

use axum::http::StatusCode;
use common::{TestHarness, ADMIN_KEY};
use serde_json::json;

#[tokio::test]
async fn redeem_grants_coins_until_exhausted() {
    let harness = TestHarness::new();
    harness.create_code("WELCOME10", 10, 1).await;

    let (token_b, _) = harness.register("bob").await;
    let (token_c, _) = harness.register("carol").await;

    let response = harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token_b))
        .json(&json!({ "code": "WELCOME10" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["coinsAdded"], 10);
    assert_eq!(body["balance"], 10);

    // The single use is gone.
    let response = harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token_c))
        .json(&json!({ "code": "WELCOME10" }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "code exhausted");
    assert_eq!(harness.balance(&token_c).await, 0);
}

#[tokio::test]
async fn second_redemption_by_same_user_rejected() {
    let harness = TestHarness::new();
    harness.create_code("SPRING", 10, 5).await;

    let (token, _) = harness.register("bob").await;

    harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "code": "SPRING" }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "code": "SPRING" }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "code already redeemed");

    // Balance moved exactly once.
    assert_eq!(harness.balance(&token).await, 10);
}

#[tokio::test]
async fn codes_are_case_insensitive() {
    let harness = TestHarness::new();
    harness.create_code("summer", 20, 1).await;

    let (token, _) = harness.register("bob").await;

    let response = harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "code": "  SuMmEr " }))
        .await;
    response.assert_status_ok();
    assert_eq!(harness.balance(&token).await, 20);
}

#[tokio::test]
async fn expired_code_rejected() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/api/codes")
        .add_header("x-admin-key", ADMIN_KEY.to_string())
        .json(&json!({
            "code": "OLDNEWS",
            "coinsAmount": 10,
            "usesTotal": 5,
            "expiresAt": 1_000_000_000_000_i64, // 2001, long gone
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let (token, _) = harness.register("bob").await;

    let response = harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "code": "OLDNEWS" }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "code expired");
}

#[tokio::test]
async fn unknown_code_not_found() {
    let harness = TestHarness::new();
    let (token, _) = harness.register("bob").await;

    let response = harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "code": "NOSUCHCODE" }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn empty_code_rejected() {
    let harness = TestHarness::new();
    let (token, _) = harness.register("bob").await;

    let response = harness
        .server
        .post("/api/codes/redeem")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "code": "   " }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn redeem_requires_auth() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/api/codes/redeem")
        .json(&json!({ "code": "WELCOME10" }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn code_creation_requires_admin_key() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/api/codes")
        .json(&json!({ "code": "SNEAKY" }))
        .await
        .assert_status_unauthorized();

    harness
        .server
        .post("/api/codes")
        .add_header("x-admin-key", "wrong-key".to_string())
        .json(&json!({ "code": "SNEAKY" }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn duplicate_code_conflicts() {
    let harness = TestHarness::new();
    harness.create_code("TWICE", 10, 1).await;

    let response = harness
        .server
        .post("/api/codes")
        .add_header("x-admin-key", ADMIN_KEY.to_string())
        .json(&json!({ "code": "twice" })) // normalizes to the same key
        .await;
    response.assert_status(StatusCode::CONFLICT);
}
