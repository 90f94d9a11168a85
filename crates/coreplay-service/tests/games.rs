//! Game publishing and browsing integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

async fn create_game(harness: &TestHarness, token: &str, name: &str) -> serde_json::Value {
    let response = harness
        .server
        .post("/api/games")
        .add_header("authorization", TestHarness::bearer(token))
        .json(&json!({
            "name": name,
            "description": "a test game",
            "data": { "objects": [], "background": "#87ceeb" },
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn create_and_fetch_game() {
    let harness = TestHarness::new();
    let (token, _) = harness.register("alice").await;

    let game = create_game(&harness, &token, "Maze Runner").await;
    assert_eq!(game["name"], "Maze Runner");
    assert_eq!(game["creatorName"], "alice");
    assert_eq!(game["playsCount"], 0);
    assert_eq!(game["data"]["background"], "#87ceeb");

    let game_id = game["id"].as_str().unwrap();
    let response = harness.server.get(&format!("/api/games/{game_id}")).await;
    response.assert_status_ok();
    let fetched: serde_json::Value = response.json();
    assert_eq!(fetched["data"]["background"], "#87ceeb");
}

#[tokio::test]
async fn listing_excludes_scene_data() {
    let harness = TestHarness::new();
    let (token, _) = harness.register("alice").await;
    create_game(&harness, &token, "Maze Runner").await;

    let response = harness.server.get("/api/games").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    let games = body["games"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert!(games[0].get("data").is_none());
}

#[tokio::test]
async fn listing_searches_and_sorts() {
    let harness = TestHarness::new();
    let (token, _) = harness.register("alice").await;
    let maze = create_game(&harness, &token, "Maze Runner").await;
    create_game(&harness, &token, "Obby Tower").await;

    // Two plays for the maze.
    let maze_id = maze["id"].as_str().unwrap();
    for _ in 0..2 {
        harness
            .server
            .post(&format!("/api/games/{maze_id}/play"))
            .await
            .assert_status_ok();
    }

    let response = harness.server.get("/api/games?q=maze").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["games"][0]["name"], "Maze Runner");

    let response = harness.server.get("/api/games?sort=popular").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["games"][0]["name"], "Maze Runner");
    assert_eq!(body["games"][0]["playsCount"], 2);
}

#[tokio::test]
async fn create_validates_input() {
    let harness = TestHarness::new();
    let (token, _) = harness.register("alice").await;

    let response = harness
        .server
        .post("/api/games")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "name": "   ", "data": {} }))
        .await;
    response.assert_status_bad_request();

    let response = harness
        .server
        .post("/api/games")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "name": "No Data", "data": null }))
        .await;
    response.assert_status_bad_request();

    harness
        .server
        .post("/api/games")
        .json(&json!({ "name": "Anon", "data": {} }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn only_the_creator_updates_or_deletes() {
    let harness = TestHarness::new();
    let (token_a, _) = harness.register("alice").await;
    let (token_b, _) = harness.register("bob").await;

    let game = create_game(&harness, &token_a, "Maze Runner").await;
    let game_id = game["id"].as_str().unwrap();

    // Bob cannot touch it.
    harness
        .server
        .put(&format!("/api/games/{game_id}"))
        .add_header("authorization", TestHarness::bearer(&token_b))
        .json(&json!({ "name": "Hijacked" }))
        .await
        .assert_status_forbidden();

    harness
        .server
        .delete(&format!("/api/games/{game_id}"))
        .add_header("authorization", TestHarness::bearer(&token_b))
        .await
        .assert_status_forbidden();

    // Alice can.
    let response = harness
        .server
        .put(&format!("/api/games/{game_id}"))
        .add_header("authorization", TestHarness::bearer(&token_a))
        .json(&json!({ "name": "Maze Runner 2", "isPublic": false }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["name"], "Maze Runner 2");

    // Unlisted now.
    let response = harness.server.get("/api/games").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 0);

    harness
        .server
        .delete(&format!("/api/games/{game_id}"))
        .add_header("authorization", TestHarness::bearer(&token_a))
        .await
        .assert_status_ok();

    harness
        .server
        .get(&format!("/api/games/{game_id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn unknown_game_not_found() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/api/games/00000000-0000-4000-8000-000000000000")
        .await
        .assert_status_not_found();

    harness
        .server
        .get("/api/games/not-a-uuid")
        .await
        .assert_status_bad_request();
}
