//! Real-time broadcast integration tests
//!
//! Every write endpoint announces itself on the broadcast channel after its
//! database change commits. The SSE endpoint itself streams forever, so
//! these tests subscribe to the channel directly.

use axum::http::StatusCode;
use oasis::shared::{EventType, RealtimeEvent};
use tokio::sync::broadcast::Receiver;

use crate::common::auth_helpers::{signup_owner, signup_user};
use crate::common::database::TestApp;

fn drain(rx: &mut Receiver<RealtimeEvent>) -> Vec<RealtimeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_signup_announces_new_member() {
    let app = TestApp::new().await;
    let mut rx = app.state.realtime_broadcast.subscribe();

    let alice = signup_user(&app, "alice").await;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::Users);
    assert_eq!(events[0].payload["user_id"], alice.id.as_str());
    assert_eq!(events[0].payload["action"], "joined");
}

#[tokio::test]
async fn test_feed_post_event() {
    let app = TestApp::new().await;
    let alice = signup_user(&app, "alice").await;
    let mut rx = app.state.realtime_broadcast.subscribe();

    let response = app
        .server
        .post("/api/feed/bugs")
        .authorization_bearer(&alice.token)
        .json(&serde_json::json!({ "text": "Snake is too fast" }))
        .await;
    response.assert_status_ok();
    let post_id = response.json::<serde_json::Value>()["id"].clone();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::Feed);
    assert_eq!(events[0].payload["channel"], "bugs");
    assert_eq!(events[0].payload["post_id"], post_id);
    assert_eq!(events[0].payload["action"], "created");
}

#[tokio::test]
async fn test_rejected_write_broadcasts_nothing() {
    let app = TestApp::new().await;
    let alice = signup_user(&app, "alice").await;
    let mut rx = app.state.realtime_broadcast.subscribe();

    let response = app
        .server
        .post("/api/library/games")
        .authorization_bearer(&alice.token)
        .json(&serde_json::json!({ "title": "Pong", "url": "https://games.example/pong" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_library_and_metadata_events() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    let mut rx = app.state.realtime_broadcast.subscribe();

    app.server
        .post("/api/library/games")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "title": "Pong", "url": "https://games.example/pong" }))
        .await
        .assert_status_ok();
    app.server
        .post("/api/library/tags")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "name": "Arcade" }))
        .await
        .assert_status_ok();

    let events = drain(&mut rx);
    let types: Vec<&EventType> = events.iter().map(|e| &e.event_type).collect();
    assert_eq!(types, vec![&EventType::Library, &EventType::Metadata]);
    assert_eq!(events[0].payload["kind"], "game");
    assert_eq!(events[1].payload["action"], "tag_added");
}

#[tokio::test]
async fn test_changelog_event_carries_version() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    let mut rx = app.state.realtime_broadcast.subscribe();

    let response = app
        .server
        .put("/api/changelog")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "content": "<p>v2</p>" }))
        .await;
    response.assert_status_ok();
    let updated_at = response.json::<serde_json::Value>()["updated_at"]
        .as_i64()
        .expect("updated_at should be set");

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::Changelog);
    assert_eq!(events[0].version, Some(updated_at.to_string()));
}

#[tokio::test]
async fn test_realtime_requires_event_stream_request() {
    let app = TestApp::new().await;

    let response = app.server.get("/realtime").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
