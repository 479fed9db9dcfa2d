/**
 * Members Handlers
 *
 * - `GET /api/users?search=` - members sidebar
 * - `PATCH /api/users/{id}/role` - promote, demote or ban
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{MemberQuery, RoleRequest, UserResponse};
use crate::backend::auth::users::{get_user_by_id, list_members, update_role};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::{RealtimeEvent, Role};

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MemberQuery>,
) -> Result<Json<Vec<UserResponse>>, BackendError> {
    let users = list_members(&state.db_pool, query.search.as_deref()).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// # Errors
///
/// * `400 Bad Request` - The actor targets their own account
/// * `403 Forbidden` - The actor's role cannot assign the requested role
/// * `404 Not Found` - Unknown user
pub async fn set_role(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<String>,
    Json(request): Json<RoleRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    if actor.user_id == user_id {
        return Err(BackendError::validation("role", "You cannot change your own role"));
    }

    if !actor.role.can_assign(request.role) {
        tracing::warn!(
            "[Members] {} ({}) may not assign {}",
            actor.user_id,
            actor.role,
            request.role
        );
        return Err(BackendError::forbidden(format!(
            "{} cannot assign the {} role",
            actor.role, request.role
        )));
    }

    let target = get_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    // Developers may ban, but never an Owner
    if target.role() == Role::Owner && actor.role != Role::Owner {
        return Err(BackendError::forbidden("Only an Owner can change an Owner's role"));
    }

    let updated = update_role(&state.db_pool, &user_id, request.role)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!(
        "[Members] {} set {} from {} to {}",
        actor.username,
        updated.username,
        target.role,
        updated.role
    );
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::users(&updated.id, "role")).await;

    Ok(Json(UserResponse::from(&updated)))
}
