/**
 * Profile Handlers
 *
 * - `PATCH /api/auth/me/username` - change the display name
 * - `PUT /api/auth/me/photo` - set or reset the profile photo
 *
 * The login email never changes, so a renamed user still logs in with the
 * name they signed up with.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{PhotoRequest, RenameRequest, UserResponse};
use crate::backend::auth::users::{update_photo, update_username};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::RealtimeEvent;

const MAX_DISPLAY_NAME_CHARS: usize = 30;

pub async fn rename(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<RenameRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    let new_name = request.username.trim();

    if new_name.is_empty() {
        return Err(BackendError::validation("username", "Username cannot be empty"));
    }
    if new_name.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(BackendError::validation(
            "username",
            "Username must be at most 30 characters",
        ));
    }

    if new_name == user.username {
        return Ok(Json(UserResponse::from(&user)));
    }

    let updated = update_username(&state.db_pool, &user.user_id, new_name)
        .await?
        .ok_or_else(|| BackendError::not_found("Account not found"))?;

    tracing::info!("[Profile] {} renamed to {}", user.username, updated.username);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::users(&updated.id, "updated")).await;

    Ok(Json(UserResponse::from(&updated)))
}

pub async fn set_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<PhotoRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    let photo_url = request.photo_url.trim();
    validate_photo(photo_url, state.config.max_photo_bytes)?;

    let updated = update_photo(&state.db_pool, &user.user_id, photo_url)
        .await?
        .ok_or_else(|| BackendError::not_found("Account not found"))?;

    tracing::info!(
        "[Profile] Photo {} for {}",
        if photo_url.is_empty() { "reset" } else { "updated" },
        user.user_id
    );
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::users(&updated.id, "updated")).await;

    Ok(Json(UserResponse::from(&updated)))
}

/// Accepts an empty value, an inline `data:image/*;base64,` URL within the
/// size limit, or an http(s) link.
pub(crate) fn validate_photo(photo_url: &str, max_bytes: usize) -> Result<(), BackendError> {
    if photo_url.is_empty() {
        return Ok(());
    }

    if photo_url.starts_with("data:image/") {
        if !photo_url.contains(";base64,") {
            return Err(BackendError::validation(
                "photo_url",
                "Photo must be a base64 image",
            ));
        }
        if photo_url.len() > max_bytes {
            return Err(BackendError::validation("photo_url", "Photo is too large"));
        }
        return Ok(());
    }

    if photo_url.starts_with("https://") || photo_url.starts_with("http://") {
        return Ok(());
    }

    Err(BackendError::validation("photo_url", "Unsupported photo format"))
}
