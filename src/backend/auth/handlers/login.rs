/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Authentication Process
 *
 * 1. Look up the account by `<username>@oasis.fake`
 * 2. Verify the password with bcrypt
 * 3. Refuse banned accounts
 * 4. Return a session token and the user
 *
 * Unknown usernames and wrong passwords both return 401 with the same
 * message.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::passwords::verify_password;
use crate::backend::auth::users::{get_user_by_email, login_email};
use crate::backend::error::BackendError;
use crate::backend::middleware::BANNED_MESSAGE;
use crate::backend::server::state::AppState;
use crate::shared::Role;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Username or password missing
/// * `401 Unauthorized` - Unknown user or wrong password
/// * `403 Forbidden` - The account is banned
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(BackendError::validation("username", "Please fill all fields"));
    }

    tracing::info!("[Auth] Login request for: {}", username);

    let user = get_user_by_email(&state.db_pool, &login_email(username))
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] User not found: {}", username);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    if !verify_password(&request.password, &user.password_hash).await? {
        tracing::warn!("[Auth] Invalid password for user: {}", username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    if user.role() == Role::Banned {
        tracing::warn!("[Auth] Banned user attempted login: {}", user.id);
        return Err(BackendError::forbidden(BANNED_MESSAGE));
    }

    let token = state
        .session_keys
        .create_token(&user.id, &user.email, &user.username)?;

    tracing::info!("[Auth] User logged in: {} ({})", user.username, user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
