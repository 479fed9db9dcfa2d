/**
 * Current User Handlers
 *
 * - `GET /api/auth/me` - the signed-in account
 * - `DELETE /api/auth/me` - delete the signed-in account
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::delete_user;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::RealtimeEvent;

pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Delete the account document. Existing tokens stop working because the
/// session middleware no longer finds the user.
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, BackendError> {
    if !delete_user(&state.db_pool, &user.user_id).await? {
        return Err(BackendError::not_found("Account not found"));
    }

    tracing::info!("[Auth] Account deleted: {} ({})", user.username, user.user_id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::users(&user.user_id, "deleted")).await;

    Ok(StatusCode::NO_CONTENT)
}
