//! Members API integration tests
//!
//! The members sidebar listing and role management.

use axum::http::StatusCode;
use oasis::backend::auth::UserResponse;
use oasis::shared::Role;

use crate::assert_error_response;
use crate::common::auth_helpers::{signup_owner, signup_user, signup_with_role};
use crate::common::database::TestApp;

fn usernames(users: &[UserResponse]) -> Vec<&str> {
    users.iter().map(|u| u.username.as_str()).collect()
}

#[tokio::test]
async fn test_list_hides_guests_and_banned() {
    let app = TestApp::new().await;
    signup_user(&app, "carol").await;
    signup_user(&app, "alice").await;
    signup_with_role(&app, "mallory", Role::Banned).await;
    signup_with_role(&app, "visitor", Role::Guest).await;

    let response = app.server.get("/api/users").await;
    response.assert_status_ok();
    let users: Vec<UserResponse> = response.json();
    assert_eq!(usernames(&users), vec!["alice", "carol"]);
}

#[tokio::test]
async fn test_list_search_is_case_insensitive() {
    let app = TestApp::new().await;
    signup_user(&app, "Alice").await;
    signup_user(&app, "bob").await;

    let response = app
        .server
        .get("/api/users")
        .add_query_param("search", "ALI")
        .await;
    response.assert_status_ok();
    let users: Vec<UserResponse> = response.json();
    assert_eq!(usernames(&users), vec!["Alice"]);
}

#[tokio::test]
async fn test_owner_promotes_member() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    let member = signup_user(&app, "alice").await;

    let response = app
        .server
        .patch(&format!("/api/users/{}/role", member.id))
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "role": "Developer" }))
        .await;

    response.assert_status_ok();
    let updated: UserResponse = response.json();
    assert_eq!(updated.role, Role::Developer);
}

#[tokio::test]
async fn test_developer_may_only_ban() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;
    let dev = signup_with_role(&app, "dev", Role::Developer).await;
    let member = signup_user(&app, "alice").await;

    let promote = app
        .server
        .patch(&format!("/api/users/{}/role", member.id))
        .authorization_bearer(&dev.token)
        .json(&serde_json::json!({ "role": "Developer" }))
        .await;
    assert_error_response!(
        promote,
        StatusCode::FORBIDDEN,
        "Developer cannot assign the Developer role"
    );

    let ban = app
        .server
        .patch(&format!("/api/users/{}/role", member.id))
        .authorization_bearer(&dev.token)
        .json(&serde_json::json!({ "role": "Banned" }))
        .await;
    ban.assert_status_ok();
    assert_eq!(ban.json::<UserResponse>().role, Role::Banned);

    let ban_owner = app
        .server
        .patch(&format!("/api/users/{}/role", owner.id))
        .authorization_bearer(&dev.token)
        .json(&serde_json::json!({ "role": "Banned" }))
        .await;
    assert_error_response!(
        ban_owner,
        StatusCode::FORBIDDEN,
        "Only an Owner can change an Owner's role"
    );
}

#[tokio::test]
async fn test_member_cannot_change_roles() {
    let app = TestApp::new().await;
    let alice = signup_user(&app, "alice").await;
    let bob = signup_user(&app, "bob").await;

    let response = app
        .server
        .patch(&format!("/api/users/{}/role", bob.id))
        .authorization_bearer(&alice.token)
        .json(&serde_json::json!({ "role": "Banned" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cannot_change_own_role() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;

    let response = app
        .server
        .patch(&format!("/api/users/{}/role", owner.id))
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "role": "Member" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "You cannot change your own role");
}

#[tokio::test]
async fn test_unknown_user_role_change() {
    let app = TestApp::new().await;
    let owner = signup_owner(&app, "root").await;

    let response = app
        .server
        .patch("/api/users/no-such-user/role")
        .authorization_bearer(&owner.token)
        .json(&serde_json::json!({ "role": "Member" }))
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND, "User not found");
}
