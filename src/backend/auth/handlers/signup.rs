/**
 * Signup Handler
 *
 * POST /api/auth/signup
 *
 * # Registration Process
 *
 * 1. Validate username format and password length
 * 2. Derive the login email `<username>@oasis.fake`
 * 3. Reject if an account already uses that email
 * 4. Hash the password and create the user with the Member role
 * 5. Return a session token and the user
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::backend::auth::passwords::hash_password;
use crate::backend::auth::users::{create_user, get_user_by_email, login_email};
use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::RealtimeEvent;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub(crate) fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    // First character must be a letter
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Signup handler
///
/// # Errors
///
/// * `400 Bad Request` - Invalid username or short password
/// * `409 Conflict` - Username already taken
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let username = request.username.trim();
    tracing::info!("[Auth] Signup request for username: {}", username);

    if username.is_empty() || request.password.is_empty() {
        return Err(BackendError::validation("username", "Please fill all fields"));
    }

    if !is_valid_username(username) {
        tracing::warn!("[Auth] Invalid username format: {}", username);
        return Err(BackendError::validation(
            "username",
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(BackendError::validation(
            "password",
            "Password should be at least 6 characters",
        ));
    }

    let email = login_email(username);
    if get_user_by_email(&state.db_pool, &email).await?.is_some() {
        tracing::warn!("[Auth] Username already exists: {}", username);
        return Err(BackendError::conflict("Username already taken"));
    }

    let password_hash = hash_password(&request.password, state.config.password_hash_cost).await?;

    let user = create_user(&state.db_pool, username, &email, &password_hash)
        .await
        .map_err(|e| match &e {
            // Lost a race with a concurrent signup for the same name
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                BackendError::conflict("Username already taken")
            }
            _ => BackendError::from(e),
        })?;

    let token = state
        .session_keys
        .create_token(&user.id, &user.email, &user.username)?;

    tracing::info!("[Auth] User created: {} ({})", user.username, user.id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::users(&user.id, "joined")).await;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
