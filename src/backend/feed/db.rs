//! Database operations for the community feed
//!
//! Posts and comments are joined against `users` so every row carries its
//! author. A missing account renders as Guest.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::feed::poll::VoteOutcome;
use crate::shared::avatar::effective_photo;
use crate::shared::feed::{Author, Comment, FeedChannel, PollOption, Post, PostKind};
use crate::shared::Role;

const POST_SELECT: &str = r#"
    SELECT p.id, p.channel, p.text, p.author_id, p.reply_count, p.is_pinned,
           p.is_locked, p.is_deleted, p.kind, p.poll_options, p.voted_users,
           p.created_at,
           u.username AS author_username, u.role AS author_role,
           u.photo_url AS author_photo
    FROM posts p
    LEFT JOIN users u ON u.id = p.author_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.text, c.author_id, c.created_at,
           u.username AS author_username, u.role AS author_role,
           u.photo_url AS author_photo
    FROM comments c
    LEFT JOIN users u ON u.id = c.author_id
"#;

#[derive(Debug, FromRow)]
struct PostRow {
    id: String,
    channel: String,
    text: String,
    author_id: String,
    reply_count: i64,
    is_pinned: bool,
    is_locked: bool,
    is_deleted: bool,
    kind: String,
    poll_options: String,
    voted_users: String,
    created_at: i64,
    author_username: Option<String>,
    author_role: Option<String>,
    author_photo: Option<String>,
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    text: String,
    author_id: String,
    created_at: i64,
    author_username: Option<String>,
    author_role: Option<String>,
    author_photo: Option<String>,
}

fn author_from(
    id: String,
    username: Option<String>,
    role: Option<String>,
    photo: Option<String>,
) -> Author {
    match username {
        Some(username) => Author {
            photo_url: effective_photo(photo.as_deref().unwrap_or(""), &username),
            role: role.and_then(|r| r.parse().ok()).unwrap_or(Role::Guest),
            id,
            username,
        },
        None => Author {
            id,
            username: "Guest".to_string(),
            role: Role::Guest,
            photo_url: effective_photo("", "Guest"),
        },
    }
}

impl TryFrom<PostRow> for Post {
    type Error = BackendError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "poll" => PostKind::Poll,
            _ => PostKind::Text,
        };

        Ok(Post {
            channel: row.channel.parse()?,
            poll_options: serde_json::from_str(&row.poll_options)?,
            voted_users: serde_json::from_str(&row.voted_users)?,
            author: author_from(
                row.author_id,
                row.author_username,
                row.author_role,
                row.author_photo,
            ),
            id: row.id,
            text: row.text,
            timestamp: row.created_at,
            reply_count: row.reply_count,
            is_pinned: row.is_pinned,
            is_locked: row.is_locked,
            is_deleted: row.is_deleted,
            kind,
        })
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            author: author_from(
                row.author_id,
                row.author_username,
                row.author_role,
                row.author_photo,
            ),
            id: row.id,
            post_id: row.post_id,
            text: row.text,
            timestamp: row.created_at,
        }
    }
}

fn into_posts(rows: Vec<PostRow>) -> BackendResult<Vec<Post>> {
    rows.into_iter().map(Post::try_from).collect()
}

/// Fields of a post about to be inserted
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub channel: FeedChannel,
    pub text: &'a str,
    pub author_id: &'a str,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub kind: PostKind,
    pub poll_options: Vec<PollOption>,
}

pub async fn insert_post(pool: &SqlitePool, post: NewPost<'_>) -> BackendResult<Post> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO posts (id, channel, text, author_id, reply_count, is_pinned, is_locked,
                           is_deleted, kind, poll_options, voted_users, created_at, updated_at)
        VALUES (?, ?, ?, ?, 0, ?, ?, 0, ?, ?, '{}', ?, ?)
        "#,
    )
    .bind(&id)
    .bind(post.channel.as_str())
    .bind(post.text)
    .bind(post.author_id)
    .bind(post.is_pinned)
    .bind(post.is_locked)
    .bind(post.kind.as_str())
    .bind(serde_json::to_string(&post.poll_options)?)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_post(pool, &id)
        .await?
        .ok_or_else(|| BackendError::internal(format!("post {} vanished after insert", id)))
}

/// Load a post, deleted or not.
pub async fn get_post(pool: &SqlitePool, id: &str) -> BackendResult<Option<Post>> {
    let row = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Post::try_from).transpose()
}

/// The newest `limit` posts of a chat channel, including deleted ones,
/// newest first.
pub async fn newest_posts(
    pool: &SqlitePool,
    channel: FeedChannel,
    limit: u32,
) -> BackendResult<Vec<Post>> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "{POST_SELECT} WHERE p.channel = ? ORDER BY p.created_at DESC, p.rowid DESC LIMIT ?"
    ))
    .bind(channel.as_str())
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    into_posts(rows)
}

/// Live posts of a board channel: pinned first, then newest first.
pub async fn board_posts(pool: &SqlitePool, channel: FeedChannel) -> BackendResult<Vec<Post>> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        r#"{POST_SELECT}
        WHERE p.channel = ? AND p.is_deleted = 0
        ORDER BY p.is_pinned DESC, p.created_at DESC, p.rowid DESC"#
    ))
    .bind(channel.as_str())
    .fetch_all(pool)
    .await?;

    into_posts(rows)
}

/// Soft-deleted posts of one channel, newest first.
pub async fn deleted_posts(pool: &SqlitePool, channel: FeedChannel) -> BackendResult<Vec<Post>> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        r#"{POST_SELECT}
        WHERE p.channel = ? AND p.is_deleted = 1
        ORDER BY p.created_at DESC, p.rowid DESC"#
    ))
    .bind(channel.as_str())
    .fetch_all(pool)
    .await?;

    into_posts(rows)
}

pub async fn update_post_text(pool: &SqlitePool, id: &str, text: &str) -> BackendResult<bool> {
    let result = sqlx::query("UPDATE posts SET text = ?, updated_at = ? WHERE id = ?")
        .bind(text)
        .bind(Utc::now().timestamp_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Boolean moderation columns on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFlag {
    Pinned,
    Locked,
    Deleted,
}

impl PostFlag {
    fn update_sql(&self) -> &'static str {
        match self {
            PostFlag::Pinned => "UPDATE posts SET is_pinned = ?, updated_at = ? WHERE id = ?",
            PostFlag::Locked => "UPDATE posts SET is_locked = ?, updated_at = ? WHERE id = ?",
            PostFlag::Deleted => "UPDATE posts SET is_deleted = ?, updated_at = ? WHERE id = ?",
        }
    }
}

pub async fn set_post_flag(
    pool: &SqlitePool,
    id: &str,
    flag: PostFlag,
    value: bool,
) -> BackendResult<bool> {
    let result = sqlx::query(flag.update_sql())
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a post and its comments for good.
pub async fn purge_post(pool: &SqlitePool, id: &str) -> BackendResult<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM comments WHERE post_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Record a vote inside one transaction.
///
/// The poll is re-read inside the transaction, so concurrent voters never
/// overwrite each other's tallies. `apply` decides the outcome from the
/// current options and voters.
pub async fn record_vote<F>(pool: &SqlitePool, post_id: &str, apply: F) -> BackendResult<VoteOutcome>
where
    F: FnOnce(&mut Vec<PollOption>, &mut BTreeMap<String, u32>) -> BackendResult<VoteOutcome>,
{
    let mut tx = pool.begin().await?;

    let row: Option<(String, String, String, bool)> = sqlx::query_as(
        "SELECT kind, poll_options, voted_users, is_deleted FROM posts WHERE id = ?",
    )
    .bind(post_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (kind, options_json, voters_json, is_deleted) =
        row.ok_or_else(|| BackendError::not_found("Post not found"))?;
    if is_deleted {
        return Err(BackendError::not_found("Post not found"));
    }
    if kind != PostKind::Poll.as_str() {
        return Err(BackendError::validation("post", "This post is not a poll"));
    }

    let mut options: Vec<PollOption> = serde_json::from_str(&options_json)?;
    let mut voters: BTreeMap<String, u32> = serde_json::from_str(&voters_json)?;

    let outcome = apply(&mut options, &mut voters)?;

    if outcome != VoteOutcome::Unchanged {
        sqlx::query("UPDATE posts SET poll_options = ?, voted_users = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&options)?)
            .bind(serde_json::to_string(&voters)?)
            .bind(Utc::now().timestamp_millis())
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(outcome)
}

pub async fn list_comments(pool: &SqlitePool, post_id: &str) -> BackendResult<Vec<Comment>> {
    let rows = sqlx::query_as::<_, CommentRow>(&format!(
        "{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.created_at ASC, c.rowid ASC"
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

pub async fn get_comment(pool: &SqlitePool, id: &str) -> BackendResult<Option<Comment>> {
    let row = sqlx::query_as::<_, CommentRow>(&format!("{COMMENT_SELECT} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Comment::from))
}

/// Insert a comment and bump the post's reply count atomically.
pub async fn insert_comment(
    pool: &SqlitePool,
    post_id: &str,
    author_id: &str,
    text: &str,
) -> BackendResult<Comment> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO comments (id, post_id, text, author_id, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(post_id)
        .bind(text)
        .bind(author_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE posts SET reply_count = reply_count + 1, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_comment(pool, &id)
        .await?
        .ok_or_else(|| BackendError::internal(format!("comment {} vanished after insert", id)))
}

pub async fn update_comment_text(pool: &SqlitePool, id: &str, text: &str) -> BackendResult<bool> {
    let result = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
        .bind(text)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a comment and decrement the post's reply count, never below 0.
pub async fn delete_comment(pool: &SqlitePool, comment: &Comment) -> BackendResult<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(&comment.id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() > 0 {
        sqlx::query(
            "UPDATE posts SET reply_count = MAX(reply_count - 1, 0), updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now().timestamp_millis())
        .bind(&comment.post_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
