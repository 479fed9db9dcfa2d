/**
 * Comment Handlers
 *
 * - `GET /api/feed/posts/{id}/comments` - oldest first
 * - `POST /api/feed/posts/{id}/comments` - reply
 * - `PATCH /api/feed/comments/{id}` - edit (author or admin)
 * - `DELETE /api/feed/comments/{id}` - remove (author or admin)
 *
 * Comments inherit the read and write rules of their post's channel. A
 * locked post only takes replies from admins.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::feed::db;
use crate::backend::feed::handlers::{
    clean_text, ensure_author_or_admin, ensure_can_post, load_live_post, load_post, EditTextRequest,
};
use crate::backend::middleware::{AuthUser, AuthenticatedUser, MaybeUser};
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::feed::{Comment, Post};
use crate::shared::RealtimeEvent;

pub async fn list_comments(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(post_id): Path<String>,
) -> BackendResult<Json<Vec<Comment>>> {
    let post = load_post(&state, &post_id, &viewer).await?;
    if post.is_deleted && !viewer.is_admin() {
        return Err(BackendError::not_found("Post not found"));
    }

    Ok(Json(db::list_comments(&state.db_pool, &post_id).await?))
}

/// # Errors
///
/// * `403 Forbidden` - Locked post and the author is not an admin
/// * `404 Not Found` - Unknown or deleted post
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
    Json(request): Json<EditTextRequest>,
) -> BackendResult<Json<Comment>> {
    let post = load_live_post(&state, &post_id, &user).await?;
    ensure_can_post(post.channel, &user)?;

    if post.is_locked && !user.is_admin() {
        return Err(BackendError::forbidden("This thread is locked"));
    }

    let text = clean_text(&request.text)?;
    let comment = db::insert_comment(&state.db_pool, &post_id, &user.user_id, text).await?;

    tracing::info!("[Feed] {} commented {} on {}", user.username, comment.id, post_id);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::comment(post.channel.as_str(), &post_id, &comment.id, "created"),
    )
    .await;

    Ok(Json(comment))
}

/// A comment together with its post, checked for the author-or-admin rule.
async fn load_owned_comment(
    state: &AppState,
    comment_id: &str,
    user: &AuthenticatedUser,
) -> BackendResult<(Comment, Post)> {
    let comment = db::get_comment(&state.db_pool, comment_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    let post = load_live_post(state, &comment.post_id, user).await?;
    ensure_author_or_admin(&comment.author.id, user)?;
    Ok((comment, post))
}

pub async fn edit_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<String>,
    Json(request): Json<EditTextRequest>,
) -> BackendResult<Json<Comment>> {
    let (comment, post) = load_owned_comment(&state, &comment_id, &user).await?;
    let text = clean_text(&request.text)?;

    db::update_comment_text(&state.db_pool, &comment_id, text).await?;
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::comment(post.channel.as_str(), &post.id, &comment.id, "edited"),
    )
    .await;

    let updated = db::get_comment(&state.db_pool, &comment_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    Ok(Json(updated))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<String>,
) -> BackendResult<StatusCode> {
    let (comment, post) = load_owned_comment(&state, &comment_id, &user).await?;

    db::delete_comment(&state.db_pool, &comment).await?;
    tracing::info!("[Feed] {} removed comment {} from {}", user.username, comment.id, post.id);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::comment(post.channel.as_str(), &post.id, &comment.id, "deleted"),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
