//! Authentication API integration tests
//!
//! Tests for signup, login, the current-user endpoints and profile edits.

use axum::http::StatusCode;
use oasis::backend::auth::{AuthResponse, UserResponse};
use oasis::shared::Role;
use pretty_assertions::assert_eq;

use crate::assert_error_response;
use crate::common::auth_helpers::{signup_user, signup_with_role, TEST_PASSWORD};
use crate::common::database::TestApp;

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&serde_json::json!({
            "username": "alice",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();
    let body: AuthResponse = response.json();
    assert!(!body.token.is_empty());
    assert_eq!(body.user.username, "alice");
    assert_eq!(body.user.email, "alice@oasis.fake");
    assert_eq!(body.user.role, Role::Member);
    assert!(body.user.photo_url.starts_with("data:image/svg+xml"));
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = TestApp::new().await;
    signup_user(&app, "alice").await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&serde_json::json!({
            "username": "alice",
            "password": "password123"
        }))
        .await;

    assert_error_response!(response, StatusCode::CONFLICT, "Username already taken");
}

#[tokio::test]
async fn test_signup_rejects_bad_input() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&serde_json::json!({ "username": "", "password": "" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "Please fill all fields");

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&serde_json::json!({ "username": "9lives", "password": "password123" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&serde_json::json!({ "username": "bob", "password": "12345" }))
        .await;
    assert_error_response!(
        response,
        StatusCode::BAD_REQUEST,
        "Password should be at least 6 characters"
    );
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    let user = signup_user(&app, "alice").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "username": "alice",
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status_ok();
    let body: AuthResponse = response.json();
    assert_eq!(body.user.id, user.id);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = TestApp::new().await;
    signup_user(&app, "alice").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "username": "alice", "password": "wrongpassword" }))
        .await;
    assert_error_response!(
        wrong_password,
        StatusCode::UNAUTHORIZED,
        "Invalid username or password"
    );

    let unknown_user = app
        .server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "username": "nobody", "password": "password123" }))
        .await;
    assert_error_response!(
        unknown_user,
        StatusCode::UNAUTHORIZED,
        "Invalid username or password"
    );
}

#[tokio::test]
async fn test_banned_user_cannot_log_in() {
    let app = TestApp::new().await;
    let banned = signup_with_role(&app, "mallory", Role::Banned).await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "username": "mallory", "password": TEST_PASSWORD }))
        .await;
    assert_error_response!(response, StatusCode::FORBIDDEN, "This account has been banned.");

    // Existing sessions are refused too
    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&banned.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_me_requires_session() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/auth/me").await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED, "Please log in first");

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer("not-a-token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_me_with_valid_token() {
    let app = TestApp::new().await;
    let user = signup_user(&app, "alice").await;

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status_ok();
    let me: UserResponse = response.json();
    assert_eq!(me.id, user.id);
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn test_rename_keeps_login_name() {
    let app = TestApp::new().await;
    let user = signup_user(&app, "alice").await;

    let response = app
        .server
        .patch("/api/auth/me/username")
        .authorization_bearer(&user.token)
        .json(&serde_json::json!({ "username": "Alice the Great" }))
        .await;
    response.assert_status_ok();
    let renamed: UserResponse = response.json();
    assert_eq!(renamed.username, "Alice the Great");
    assert_eq!(renamed.email, "alice@oasis.fake");

    let login = app
        .server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "username": "alice", "password": TEST_PASSWORD }))
        .await;
    login.assert_status_ok();

    let empty = app
        .server
        .patch("/api/auth/me/username")
        .authorization_bearer(&user.token)
        .json(&serde_json::json!({ "username": "   " }))
        .await;
    assert_error_response!(empty, StatusCode::BAD_REQUEST, "Username cannot be empty");
}

#[tokio::test]
async fn test_set_and_reset_photo() {
    let app = TestApp::new().await;
    let user = signup_user(&app, "alice").await;

    let response = app
        .server
        .put("/api/auth/me/photo")
        .authorization_bearer(&user.token)
        .json(&serde_json::json!({ "photo_url": "https://cdn.example/alice.png" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<UserResponse>().photo_url, "https://cdn.example/alice.png");

    // Over the 1 KiB test limit
    let big = format!("data:image/png;base64,{}", "A".repeat(2048));
    let response = app
        .server
        .put("/api/auth/me/photo")
        .authorization_bearer(&user.token)
        .json(&serde_json::json!({ "photo_url": big }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "Photo is too large");

    let response = app
        .server
        .put("/api/auth/me/photo")
        .authorization_bearer(&user.token)
        .json(&serde_json::json!({ "photo_url": "" }))
        .await;
    response.assert_status_ok();
    assert!(response
        .json::<UserResponse>()
        .photo_url
        .starts_with("data:image/svg+xml"));
}

#[tokio::test]
async fn test_delete_me_invalidates_token() {
    let app = TestApp::new().await;
    let user = signup_user(&app, "alice").await;

    let response = app
        .server
        .delete("/api/auth/me")
        .authorization_bearer(&user.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&user.token)
        .await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED, "Account not found");
}
