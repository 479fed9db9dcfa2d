/**
 * Garbage Bin
 *
 * Admin view over soft-deleted posts of every channel.
 *
 * - `GET /api/feed/garbage` - deleted posts, newest first
 * - `POST /api/feed/posts/{id}/restore` - clear `is_deleted`
 * - `DELETE /api/feed/posts/{id}/purge` - remove the post and its comments
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::SqlitePool;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::feed::db::{self, PostFlag};
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::feed::{FeedChannel, Post};
use crate::shared::RealtimeEvent;

/// Deleted posts across all channels, newest first.
///
/// A channel that fails to load is logged and left out rather than failing
/// the whole bin.
pub async fn collect_garbage(pool: &SqlitePool) -> Vec<Post> {
    let mut posts = Vec::new();

    for channel in FeedChannel::ALL {
        match db::deleted_posts(pool, channel).await {
            Ok(found) => posts.extend(found),
            Err(e) => tracing::error!("[Feed] Garbage scan of {} failed: {}", channel, e),
        }
    }

    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    posts
}

pub async fn list_garbage(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<Vec<Post>>> {
    user.require_admin()?;
    Ok(Json(collect_garbage(&state.db_pool).await))
}

async fn load_deleted(state: &AppState, id: &str, user: &AuthenticatedUser) -> BackendResult<Post> {
    user.require_admin()?;

    let post = db::get_post(&state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;
    if !post.is_deleted {
        return Err(BackendError::conflict("Post is not in the garbage bin"));
    }
    Ok(post)
}

pub async fn restore_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Post>> {
    let post = load_deleted(&state, &id, &user).await?;

    db::set_post_flag(&state.db_pool, &id, PostFlag::Deleted, false).await?;
    tracing::info!("[Feed] {} restored {}", user.username, id);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::feed(post.channel.as_str(), &id, "restored"),
    )
    .await;

    let restored = db::get_post(&state.db_pool, &id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;
    Ok(Json(restored))
}

pub async fn purge_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<StatusCode> {
    let post = load_deleted(&state, &id, &user).await?;

    db::purge_post(&state.db_pool, &id).await?;
    tracing::info!("[Feed] {} purged {}", user.username, id);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::feed(post.channel.as_str(), &id, "purged"),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
