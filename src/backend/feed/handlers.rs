/**
 * Feed Post Handlers
 *
 * - `GET /api/feed/{channel}` - list a channel
 * - `POST /api/feed/{channel}` - create a post or poll
 * - `GET /api/feed/posts/{id}` - one post
 * - `PATCH /api/feed/posts/{id}` - edit text (author or admin)
 * - `DELETE /api/feed/posts/{id}` - soft delete (author or admin)
 * - `POST /api/feed/posts/{id}/pin` / `lock` - moderation toggles (admin)
 * - `POST /api/feed/posts/{id}/vote` - vote on a poll
 * - `GET /api/feed/posts/{id}/poll` - poll percentages
 *
 * # Permissions
 *
 * The hosted database enforced these through security rules; here every
 * handler checks them before touching the pool.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::feed::db::{self, NewPost, PostFlag};
use crate::backend::feed::poll::{self, VoteOutcome};
use crate::backend::middleware::{AuthUser, AuthenticatedUser, MaybeUser};
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::feed::{FeedChannel, PollTally, Post, PostKind};
use crate::shared::RealtimeEvent;

/// Longest accepted post or comment body, in characters
pub const MAX_TEXT_CHARS: usize = 10_000;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePostRequest {
    pub text: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub kind: PostKind,
    #[serde(default)]
    pub poll_options: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EditTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VoteRequest {
    pub option_id: u32,
}

pub(crate) fn parse_channel(raw: &str) -> BackendResult<FeedChannel> {
    raw.parse()
        .map_err(|_| BackendError::not_found(format!("Unknown channel: {}", raw)))
}

pub(crate) fn ensure_readable(channel: FeedChannel, viewer: &MaybeUser) -> BackendResult<()> {
    if channel.readable_by(viewer.role()) {
        Ok(())
    } else {
        Err(BackendError::forbidden("Admins only"))
    }
}

/// Write rule of a channel: general chat needs a chat-capable role, admin
/// chat needs an admin, boards take any session.
pub(crate) fn ensure_can_post(channel: FeedChannel, user: &AuthenticatedUser) -> BackendResult<()> {
    match channel {
        FeedChannel::GeneralChat if !user.role.can_chat() => {
            Err(BackendError::forbidden("You must log in to chat."))
        }
        FeedChannel::AdminChat => user.require_admin(),
        _ => Ok(()),
    }
}

pub(crate) fn ensure_author_or_admin(author_id: &str, user: &AuthenticatedUser) -> BackendResult<()> {
    if author_id == user.user_id || user.is_admin() {
        Ok(())
    } else {
        Err(BackendError::forbidden("You can only change your own posts"))
    }
}

/// Trimmed, non-empty, bounded message text.
pub(crate) fn clean_text(raw: &str) -> BackendResult<&str> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(BackendError::validation("text", "Please enter a message."));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(BackendError::validation(
            "text",
            "Message is too long (max 10000 characters)",
        ));
    }
    Ok(text)
}

/// Chat view: the newest `limit` posts minus deleted ones, oldest first.
pub(crate) fn arrange_chat(newest_first: Vec<Post>) -> Vec<Post> {
    let mut posts: Vec<Post> = newest_first.into_iter().filter(|p| !p.is_deleted).collect();
    posts.reverse();
    posts
}

/// Load a post the viewer may read.
pub(crate) async fn load_post(state: &AppState, id: &str, viewer: &MaybeUser) -> BackendResult<Post> {
    let post = db::get_post(&state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;
    ensure_readable(post.channel, viewer)?;
    Ok(post)
}

/// Load a readable post that has not been soft-deleted.
pub(crate) async fn load_live_post(
    state: &AppState,
    id: &str,
    user: &AuthenticatedUser,
) -> BackendResult<Post> {
    let post = load_post(state, id, &MaybeUser(Some(user.clone()))).await?;
    if post.is_deleted {
        return Err(BackendError::not_found("Post not found"));
    }
    Ok(post)
}

async fn reload(state: &AppState, id: &str) -> BackendResult<Post> {
    db::get_post(&state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))
}

pub async fn list_posts(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(channel): Path<String>,
) -> BackendResult<Json<Vec<Post>>> {
    let channel = parse_channel(&channel)?;
    ensure_readable(channel, &viewer)?;

    let posts = if channel.is_chat() {
        let newest = db::newest_posts(&state.db_pool, channel, state.config.chat_history_limit).await?;
        arrange_chat(newest)
    } else {
        db::board_posts(&state.db_pool, channel).await?
    };

    tracing::debug!("[Feed] Listed {} posts from {}", posts.len(), channel);
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Post>> {
    let post = load_post(&state, &id, &viewer).await?;
    if post.is_deleted && !viewer.is_admin() {
        return Err(BackendError::not_found("Post not found"));
    }
    Ok(Json(post))
}

/// # Errors
///
/// * `400 Bad Request` - Empty or oversized text, bad poll options
/// * `403 Forbidden` - The role may not post here, or a non-admin poll
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(channel): Path<String>,
    Json(request): Json<CreatePostRequest>,
) -> BackendResult<Json<Post>> {
    let channel = parse_channel(&channel)?;
    ensure_can_post(channel, &user)?;
    let text = clean_text(&request.text)?;

    let poll_options = match request.kind {
        PostKind::Text => Vec::new(),
        PostKind::Poll => {
            user.require_admin()?;
            if channel.is_chat() {
                return Err(BackendError::validation(
                    "kind",
                    "Polls can only be posted to suggestions or bugs",
                ));
            }
            poll::build_options(&request.poll_options)?
        }
    };

    let post = db::insert_post(
        &state.db_pool,
        NewPost {
            channel,
            text,
            author_id: &user.user_id,
            is_pinned: request.is_pinned && user.is_admin(),
            is_locked: request.is_locked && user.is_admin(),
            kind: request.kind,
            poll_options,
        },
    )
    .await?;

    tracing::info!("[Feed] {} posted {} to {}", user.username, post.id, channel);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::feed(channel.as_str(), &post.id, "created"),
    )
    .await;

    Ok(Json(post))
}

pub async fn edit_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<EditTextRequest>,
) -> BackendResult<Json<Post>> {
    let post = load_live_post(&state, &id, &user).await?;
    ensure_author_or_admin(&post.author.id, &user)?;
    let text = clean_text(&request.text)?;

    db::update_post_text(&state.db_pool, &id, text).await?;
    tracing::info!("[Feed] {} edited {}", user.username, id);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::feed(post.channel.as_str(), &id, "edited"),
    )
    .await;

    Ok(Json(reload(&state, &id).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Post>> {
    let post = load_live_post(&state, &id, &user).await?;
    ensure_author_or_admin(&post.author.id, &user)?;

    db::set_post_flag(&state.db_pool, &id, PostFlag::Deleted, true).await?;
    tracing::info!("[Feed] {} moved {} to the garbage bin", user.username, id);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::feed(post.channel.as_str(), &id, "deleted"),
    )
    .await;

    Ok(Json(reload(&state, &id).await?))
}

/// Admin switches on a live post. Deletion goes through the garbage bin.
#[derive(Debug, Clone, Copy)]
enum Toggle {
    Pin,
    Lock,
}

async fn toggle(
    state: &AppState,
    user: &AuthenticatedUser,
    id: &str,
    kind: Toggle,
) -> BackendResult<Post> {
    user.require_admin()?;
    let post = load_live_post(state, id, user).await?;

    let (flag, current, action) = match kind {
        Toggle::Pin => (
            PostFlag::Pinned,
            post.is_pinned,
            if post.is_pinned { "unpinned" } else { "pinned" },
        ),
        Toggle::Lock => (
            PostFlag::Locked,
            post.is_locked,
            if post.is_locked { "unlocked" } else { "locked" },
        ),
    };

    db::set_post_flag(&state.db_pool, id, flag, !current).await?;
    tracing::info!("[Feed] {} {} {}", user.username, action, id);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::feed(post.channel.as_str(), id, action),
    )
    .await;

    reload(state, id).await
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Post>> {
    Ok(Json(toggle(&state, &user, &id, Toggle::Pin).await?))
}

pub async fn toggle_lock(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Post>> {
    Ok(Json(toggle(&state, &user, &id, Toggle::Lock).await?))
}

pub async fn vote(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<VoteRequest>,
) -> BackendResult<Json<Post>> {
    let post = load_live_post(&state, &id, &user).await?;

    let outcome = db::record_vote(&state.db_pool, &id, |options, voters| {
        poll::apply_vote(options, voters, &user.user_id, request.option_id)
    })
    .await?;

    if outcome != VoteOutcome::Unchanged {
        tracing::info!("[Feed] {} voted {} on {} ({:?})", user.username, request.option_id, id, outcome);
        broadcast_event(
            &state.realtime_broadcast,
            RealtimeEvent::feed(post.channel.as_str(), &id, "voted"),
        )
        .await;
    }

    Ok(Json(reload(&state, &id).await?))
}

pub async fn poll_results(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Vec<PollTally>>> {
    let post = load_post(&state, &id, &viewer).await?;
    if post.kind != PostKind::Poll {
        return Err(BackendError::validation("post", "This post is not a poll"));
    }
    Ok(Json(poll::tally(&post.poll_options)))
}
