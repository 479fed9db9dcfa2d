//! Launcher integration tests
//!
//! The rendered launcher document for visitors, members and admins.

use axum::http::StatusCode;

use crate::assert_contains;
use crate::common::auth_helpers::{signup_owner, signup_user};
use crate::common::database::TestApp;

#[tokio::test]
async fn test_visitor_launcher_has_no_admin_surface() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/launcher").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();

    assert_contains!(html, "<!DOCTYPE html>");
    assert_contains!(html, r#"id="game-grid""#);
    assert_contains!(html, r#"id="emulation-groups""#);
    assert_contains!(html, "const IS_ADMIN = false;");
    assert_contains!(html, "const TOKEN = null;");
    assert!(!html.contains(r#"id="admin-view""#));
    assert!(!html.contains(r#"id="game-modal""#));
    assert!(!html.contains(r#"id="dev-panel""#));
}

#[tokio::test]
async fn test_member_launcher_shows_name_only() {
    let app = TestApp::new().await;
    let alice = signup_user(&app, "alice").await;

    let html = app
        .server
        .get("/api/launcher")
        .authorization_bearer(&alice.token)
        .await
        .text();

    assert_contains!(html, r#"<span class="user-tag">alice</span>"#);
    assert_contains!(html, "const IS_ADMIN = false;");
    assert!(!html.contains(r#"id="mode-admin""#));
}

#[tokio::test]
async fn test_admin_launcher_embeds_library_and_token() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;

    app.server
        .post("/api/library/games")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({
            "title": "Tetris",
            "url": "https://games.example/tetris",
            "tags": ["Puzzle"],
        }))
        .await
        .assert_status_ok();

    let html = app
        .server
        .get("/api/launcher")
        .authorization_bearer(&owner.token)
        .await
        .text();

    assert_contains!(html, "const IS_ADMIN = true;");
    assert_contains!(html, "const IS_DEV = true;");
    assert_contains!(html, &format!("const TOKEN = \"{}\";", owner.token));
    assert_contains!(html, r#""title":"Tetris""#);
    assert_contains!(html, r#"let TAGS = ["Emulation","Puzzle"];"#);
    assert_contains!(html, r#"id="admin-view""#);
    assert_contains!(html, r#"id="game-modal""#);
    assert_contains!(html, r#"id="dev-panel""#);
}
