//! Library API integration tests
//!
//! Games, groups, tags, view filters and the status endpoint.

use axum::http::StatusCode;
use oasis::shared::{Game, Group, LibraryMetadata, LibrarySnapshot};
use pretty_assertions::assert_eq;

use crate::assert_error_response;
use crate::common::auth_helpers::{signup_owner, signup_user, TestUser};
use crate::common::database::TestApp;

async fn add_game(app: &TestApp, admin: &TestUser, title: &str, tags: &[&str]) -> Game {
    let response = app
        .server
        .post("/api/library/games")
        .authorization_bearer(&admin.token)
        .json(&serde_json::json!({
            "title": title,
            "img": format!("https://img.example/{}.png", title.to_lowercase()),
            "url": format!("https://games.example/{}", title.to_lowercase()),
            "tags": tags,
        }))
        .await;
    response.assert_status_ok();
    response.json()
}

async fn add_tag(app: &TestApp, admin: &TestUser, name: &str) -> LibraryMetadata {
    let response = app
        .server
        .post("/api/library/tags")
        .authorization_bearer(&admin.token)
        .json(&serde_json::json!({ "name": name }))
        .await;
    response.assert_status_ok();
    response.json()
}

fn titles(games: &[Game]) -> Vec<&str> {
    games.iter().map(|g| g.title.as_str()).collect()
}

#[tokio::test]
async fn test_game_writes_are_admin_only() {
    let app = TestApp::new().await;
    let alice = signup_user(&app, "alice").await;
    let body = serde_json::json!({ "title": "Pong", "url": "https://games.example/pong" });

    let anonymous = app.server.post("/api/library/games").json(&body).await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

    let member = app
        .server
        .post("/api/library/games")
        .authorization_bearer(&alice.token)
        .json(&body)
        .await;
    assert_error_response!(member, StatusCode::FORBIDDEN, "Admins only");
}

#[tokio::test]
async fn test_create_game_derives_badge_and_dedupes_tags() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;

    let game = add_game(&app, &owner, "Chess", &["Light", "Strategy", " Heavy ", "Strategy"]).await;
    assert_eq!(game.tags, vec!["Light", "Strategy", "Heavy"]);
    assert_eq!(game.badge, "Heavy");
    assert_eq!(game.order_index, None);
    assert!(!game.is_deleted);

    let response = app
        .server
        .post("/api/library/games")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "title": "No URL" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "Title and URL required");
}

#[tokio::test]
async fn test_update_game() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    let game = add_game(&app, &owner, "Pong", &["Arcade"]).await;

    let response = app
        .server
        .put(&format!("/api/library/games/{}", game.id))
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({
            "title": "Pong Deluxe",
            "url": "https://games.example/pong2",
            "tags": ["Arcade", "Medium"],
        }))
        .await;
    response.assert_status_ok();
    let updated: Game = response.json();
    assert_eq!(updated.id, game.id);
    assert_eq!(updated.title, "Pong Deluxe");
    assert_eq!(updated.badge, "Medium");

    let response = app
        .server
        .put("/api/library/games/missing")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "title": "X", "url": "https://x.example" }))
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND, "Game not found");
}

#[tokio::test]
async fn test_snapshot_sorts_naturally_and_imports_tags() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    add_game(&app, &owner, "Game 10", &["Puzzle"]).await;
    add_game(&app, &owner, "game 2", &["Arcade"]).await;
    add_game(&app, &owner, "Game 1", &[]).await;

    let response = app.server.get("/api/library").await;
    response.assert_status_ok();
    let snapshot: LibrarySnapshot = response.json();

    assert_eq!(titles(&snapshot.games), vec!["Game 1", "game 2", "Game 10"]);
    assert_eq!(snapshot.tags, vec!["Arcade", "Emulation", "Puzzle"]);
    assert_eq!(snapshot.badges, vec!["Light", "Medium", "Heavy"]);
}

#[tokio::test]
async fn test_reorder_games() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    add_game(&app, &owner, "Alpha", &[]).await;
    add_game(&app, &owner, "Bravo", &[]).await;
    add_game(&app, &owner, "Charlie", &[]).await;

    let response = app
        .server
        .post("/api/library/games/reorder")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "from": 0, "to": 2 }))
        .await;
    response.assert_status_ok();
    let games: Vec<Game> = response.json();
    assert_eq!(titles(&games), vec!["Bravo", "Charlie", "Alpha"]);
    let indexes: Vec<Option<i64>> = games.iter().map(|g| g.order_index).collect();
    assert_eq!(indexes, vec![Some(0), Some(1), Some(2)]);

    // Ordered games stay ahead of new, unordered ones
    add_game(&app, &owner, "Aardvark", &[]).await;
    let snapshot: LibrarySnapshot = app.server.get("/api/library").await.json();
    assert_eq!(titles(&snapshot.games), vec!["Bravo", "Charlie", "Alpha", "Aardvark"]);

    let response = app
        .server
        .post("/api/library/games/reorder")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "from": 9, "to": 0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_game_garbage_bin() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    let game = add_game(&app, &owner, "Pong", &[]).await;

    let response = app
        .server
        .delete(&format!("/api/library/games/{}/purge", game.id))
        .authorization_bearer(&owner.token)
        .await;
    assert_error_response!(
        response,
        StatusCode::CONFLICT,
        "Move the game to the garbage bin before purging"
    );

    let response = app
        .server
        .delete(&format!("/api/library/games/{}", game.id))
        .authorization_bearer(&owner.token)
        .await;
    response.assert_status_ok();
    assert!(response.json::<Game>().is_deleted);

    // Visitors no longer see it; admins do, for the garbage tab
    let public: LibrarySnapshot = app.server.get("/api/library").await.json();
    assert!(public.games.is_empty());
    let admin: LibrarySnapshot = app
        .server
        .get("/api/library")
        .authorization_bearer(&owner.token)
        .await
        .json();
    assert_eq!(titles(&admin.games), vec!["Pong"]);

    let response = app
        .server
        .post(&format!("/api/library/games/{}/restore", game.id))
        .authorization_bearer(&owner.token)
        .await;
    response.assert_status_ok();
    assert!(!response.json::<Game>().is_deleted);

    let response = app
        .server
        .post(&format!("/api/library/games/{}/restore", game.id))
        .authorization_bearer(&owner.token)
        .await;
    assert_error_response!(response, StatusCode::CONFLICT, "Game is not in the garbage bin");

    app.server
        .delete(&format!("/api/library/games/{}", game.id))
        .authorization_bearer(&owner.token)
        .await
        .assert_status_ok();
    let response = app
        .server
        .delete(&format!("/api/library/games/{}/purge", game.id))
        .authorization_bearer(&owner.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let admin: LibrarySnapshot = app
        .server
        .get("/api/library")
        .authorization_bearer(&owner.token)
        .await
        .json();
    assert!(admin.games.is_empty());
}

#[tokio::test]
async fn test_list_games_filters() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    add_game(&app, &owner, "Tetris", &["Puzzle"]).await;
    add_game(&app, &owner, "Portal", &["Puzzle", "Shooter"]).await;
    add_game(&app, &owner, "Doom", &["Shooter"]).await;
    add_game(&app, &owner, "Zelda", &["Emulation", "Nintendo"]).await;

    let all: Vec<Game> = app.server.get("/api/library/games").await.json();
    assert_eq!(titles(&all), vec!["Doom", "Portal", "Tetris"]);

    let puzzle: Vec<Game> = app
        .server
        .get("/api/library/games")
        .add_query_param("tag", "Puzzle")
        .await
        .json();
    assert_eq!(titles(&puzzle), vec!["Portal", "Tetris"]);

    // The child tag narrows past the parent
    let shooter: Vec<Game> = app
        .server
        .get("/api/library/games")
        .add_query_param("tag", "Puzzle")
        .add_query_param("child", "Shooter")
        .await
        .json();
    assert_eq!(titles(&shooter), vec!["Doom", "Portal"]);

    // Search ignores the tag
    let search: Vec<Game> = app
        .server
        .get("/api/library/games")
        .add_query_param("tag", "Shooter")
        .add_query_param("q", "TET")
        .await
        .json();
    assert_eq!(titles(&search), vec!["Tetris"]);
}

#[tokio::test]
async fn test_emulation_groups() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    add_game(&app, &owner, "Zelda", &["Emulation", "Nintendo"]).await;
    add_game(&app, &owner, "Sonic", &["Emulation", "Sega"]).await;
    add_game(&app, &owner, "Mario Web", &["Nintendo"]).await;

    // Legacy single `rule` field
    let response = app
        .server
        .post("/api/library/groups")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "title": "Nintendo", "rule": "Nintendo" }))
        .await;
    response.assert_status_ok();
    let group: Group = response.json();
    assert_eq!(group.rules, vec!["Nintendo"]);

    let games: Vec<Game> = app
        .server
        .get("/api/library/games")
        .add_query_param("mode", "emulation")
        .add_query_param("group", &group.id)
        .await
        .json();
    assert_eq!(titles(&games), vec!["Zelda"]);

    let response = app
        .server
        .get("/api/library/games")
        .add_query_param("mode", "emulation")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .get("/api/library/games")
        .add_query_param("group", "missing")
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND, "Group not found");

    let response = app
        .server
        .put(&format!("/api/library/groups/{}", group.id))
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "title": "Consoles", "rules": ["Nintendo", "Sega"] }))
        .await;
    response.assert_status_ok();
    let games: Vec<Game> = app
        .server
        .get("/api/library/games")
        .add_query_param("group", &group.id)
        .await
        .json();
    assert_eq!(titles(&games), vec!["Sonic", "Zelda"]);

    let response = app
        .server
        .post("/api/library/groups")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "title": "Empty" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "Title & Rule required");

    let response = app
        .server
        .delete(&format!("/api/library/groups/{}", group.id))
        .authorization_bearer(&owner.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    let snapshot: LibrarySnapshot = app.server.get("/api/library").await.json();
    assert!(snapshot.groups.is_empty());
}

#[tokio::test]
async fn test_tag_lifecycle() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    let game = add_game(&app, &owner, "Pac-Man", &["Retro", "Light"]).await;

    // Pac-Man's tags are imported (and sorted) before the add
    let meta = add_tag(&app, &owner, "Retro").await;
    assert_eq!(meta.categories, vec!["Emulation", "Light", "Retro"]);
    let meta = add_tag(&app, &owner, " Retro ").await;
    assert_eq!(meta.categories, vec!["Emulation", "Light", "Retro"]);
    let meta = add_tag(&app, &owner, "Arcade").await;
    assert_eq!(meta.categories, vec!["Emulation", "Light", "Retro", "Arcade"]);

    let response = app
        .server
        .put("/api/library/tags/Retro")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "new_name": "Classic", "children": ["Arcade", "Classic"] }))
        .await;
    response.assert_status_ok();
    let meta: LibraryMetadata = response.json();
    assert_eq!(meta.categories, vec!["Emulation", "Light", "Classic", "Arcade"]);
    assert_eq!(meta.hierarchy.get("Classic"), Some(&vec!["Arcade".to_string()]));

    let snapshot: LibrarySnapshot = app.server.get("/api/library").await.json();
    assert_eq!(snapshot.games[0].tags, vec!["Classic", "Light"]);

    let response = app
        .server
        .put("/api/library/tags/Classic")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "new_name": "Arcade" }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT, "Tag 'Arcade' already exists");

    let response = app
        .server
        .post("/api/library/tag-order")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "from": 3, "to": 0 }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<LibraryMetadata>().categories,
        vec!["Arcade", "Emulation", "Light", "Classic"]
    );

    let response = app
        .server
        .delete("/api/library/tags/Classic")
        .add_query_param("strip_from_games", "true")
        .authorization_bearer(&owner.token)
        .await;
    response.assert_status_ok();
    let meta: LibraryMetadata = response.json();
    assert_eq!(meta.categories, vec!["Arcade", "Emulation", "Light"]);
    assert!(meta.hierarchy.get("Classic").is_none());

    let snapshot: LibrarySnapshot = app.server.get("/api/library").await.json();
    let stripped = snapshot.games.iter().find(|g| g.id == game.id).unwrap();
    assert_eq!(stripped.tags, vec!["Light"]);
    assert_eq!(stripped.badge, "Light");

    let response = app
        .server
        .delete("/api/library/tags/Nope")
        .authorization_bearer(&owner.token)
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND, "Unknown tag: Nope");
}

#[tokio::test]
async fn test_tags_imported_from_games_are_editable() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    add_tag(&app, &owner, "Zeta").await;
    let game = add_game(&app, &owner, "Asteroids", &["Alpha", "Beta", "Light"]).await;

    let snapshot: LibrarySnapshot = app
        .server
        .get("/api/library")
        .authorization_bearer(&owner.token)
        .await
        .json();
    assert_eq!(snapshot.tags, vec!["Alpha", "Beta", "Emulation", "Light", "Zeta"]);

    // Positions are the ones the snapshot shows
    let response = app
        .server
        .post("/api/library/tag-order")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "from": 4, "to": 0 }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<LibraryMetadata>().categories,
        vec!["Zeta", "Alpha", "Beta", "Emulation", "Light"]
    );

    let response = app
        .server
        .put("/api/library/tags/Alpha")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "new_name": "Omega" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<LibraryMetadata>().categories,
        vec!["Zeta", "Omega", "Beta", "Emulation", "Light"]
    );

    let response = app
        .server
        .put("/api/library/tags/Omega")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "new_name": "Beta" }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT, "Tag 'Beta' already exists");

    let response = app
        .server
        .delete("/api/library/tags/Beta")
        .add_query_param("strip_from_games", "true")
        .authorization_bearer(&owner.token)
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<LibraryMetadata>().categories,
        vec!["Zeta", "Omega", "Emulation", "Light"]
    );

    let snapshot: LibrarySnapshot = app
        .server
        .get("/api/library")
        .authorization_bearer(&owner.token)
        .await
        .json();
    assert_eq!(snapshot.tags, vec!["Zeta", "Omega", "Emulation", "Light"]);
    let retagged = snapshot.games.iter().find(|g| g.id == game.id).unwrap();
    assert_eq!(retagged.tags, vec!["Omega", "Light"]);
}

#[tokio::test]
async fn test_tag_named_reorder_is_editable() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    add_tag(&app, &owner, "reorder").await;

    let response = app
        .server
        .put("/api/library/tags/reorder")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "new_name": "Sorting" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<LibraryMetadata>().categories, vec!["Emulation", "Sorting"]);

    add_tag(&app, &owner, "reorder").await;
    let response = app
        .server
        .delete("/api/library/tags/reorder")
        .authorization_bearer(&owner.token)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<LibraryMetadata>().categories, vec!["Emulation", "Sorting"]);
}

#[tokio::test]
async fn test_status_counts_live_content() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    add_game(&app, &owner, "Pong", &[]).await;
    let doomed = add_game(&app, &owner, "Doom", &[]).await;
    app.server
        .delete(&format!("/api/library/games/{}", doomed.id))
        .authorization_bearer(&owner.token)
        .await
        .assert_status_ok();

    let response = app.server.get("/api/status").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "Ready");
    assert_eq!(body["games"], 1);
    assert_eq!(body["groups"], 0);
}
