//! Database operations for the game library
//!
//! Tags and rules are stored as JSON arrays. The `metadata` system document
//! holds categories, hierarchy and badges.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::library::ordering::sort_games;
use crate::shared::library::GroupInput;
use crate::shared::{Game, Group, LibraryMetadata};

/// Key of the library metadata document in `system_documents`
pub const METADATA_KEY: &str = "metadata";

#[derive(Debug, FromRow)]
struct GameRow {
    id: String,
    title: String,
    img: String,
    url: String,
    tags: String,
    badge: String,
    order_index: Option<i64>,
    is_deleted: bool,
}

impl TryFrom<GameRow> for Game {
    type Error = BackendError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        Ok(Game {
            tags: serde_json::from_str(&row.tags)?,
            id: row.id,
            title: row.title,
            img: row.img,
            url: row.url,
            badge: row.badge,
            order_index: row.order_index,
            is_deleted: row.is_deleted,
        })
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    id: String,
    title: String,
    img: String,
    rules: String,
}

impl TryFrom<GroupRow> for Group {
    type Error = BackendError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        Ok(Group {
            rules: serde_json::from_str(&row.rules)?,
            id: row.id,
            title: row.title,
            img: row.img,
        })
    }
}

const GAME_COLUMNS: &str = "id, title, img, url, tags, badge, order_index, is_deleted";

/// Every game, deleted ones included, in display order.
pub async fn load_games(pool: &SqlitePool) -> BackendResult<Vec<Game>> {
    let rows = sqlx::query_as::<_, GameRow>(&format!(
        "SELECT {GAME_COLUMNS} FROM games ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;

    let mut games = rows
        .into_iter()
        .map(Game::try_from)
        .collect::<BackendResult<Vec<_>>>()?;
    sort_games(&mut games);
    Ok(games)
}

pub async fn get_game(pool: &SqlitePool, id: &str) -> BackendResult<Option<Game>> {
    let row = sqlx::query_as::<_, GameRow>(&format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Game::try_from).transpose()
}

/// Validated game fields
#[derive(Debug, Clone)]
pub struct GameFields {
    pub title: String,
    pub img: String,
    pub url: String,
    pub tags: Vec<String>,
    pub badge: String,
}

pub async fn insert_game(pool: &SqlitePool, fields: &GameFields) -> BackendResult<Game> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO games (id, title, img, url, tags, badge, order_index, is_deleted, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, NULL, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&fields.title)
    .bind(&fields.img)
    .bind(&fields.url)
    .bind(serde_json::to_string(&fields.tags)?)
    .bind(&fields.badge)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_game(pool, &id)
        .await?
        .ok_or_else(|| BackendError::internal(format!("game {} vanished after insert", id)))
}

pub async fn update_game(pool: &SqlitePool, id: &str, fields: &GameFields) -> BackendResult<Option<Game>> {
    let result = sqlx::query(
        "UPDATE games SET title = ?, img = ?, url = ?, tags = ?, badge = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&fields.title)
    .bind(&fields.img)
    .bind(&fields.url)
    .bind(serde_json::to_string(&fields.tags)?)
    .bind(&fields.badge)
    .bind(Utc::now().timestamp_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_game(pool, id).await
}

pub async fn set_game_deleted(pool: &SqlitePool, id: &str, is_deleted: bool) -> BackendResult<bool> {
    let result = sqlx::query("UPDATE games SET is_deleted = ?, updated_at = ? WHERE id = ?")
        .bind(is_deleted)
        .bind(Utc::now().timestamp_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn purge_game(pool: &SqlitePool, id: &str) -> BackendResult<bool> {
    let result = sqlx::query("DELETE FROM games WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Write `order_index = position` for each id, in one transaction.
pub async fn save_game_order(pool: &SqlitePool, ordered_ids: &[String]) -> BackendResult<()> {
    let now = Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    for (position, id) in ordered_ids.iter().enumerate() {
        sqlx::query("UPDATE games SET order_index = ?, updated_at = ? WHERE id = ?")
            .bind(position as i64)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn load_groups(pool: &SqlitePool) -> BackendResult<Vec<Group>> {
    let rows = sqlx::query_as::<_, GroupRow>(
        "SELECT id, title, img, rules FROM game_groups ORDER BY created_at, rowid",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Group::try_from).collect()
}

pub async fn get_group(pool: &SqlitePool, id: &str) -> BackendResult<Option<Group>> {
    let row = sqlx::query_as::<_, GroupRow>("SELECT id, title, img, rules FROM game_groups WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Group::try_from).transpose()
}

/// Insert (`id == None`) or update a group. Returns `None` when updating
/// an unknown id.
pub async fn save_group(
    pool: &SqlitePool,
    id: Option<&str>,
    input: &GroupInput,
    rules: &[String],
) -> BackendResult<Option<Group>> {
    let now = Utc::now().timestamp_millis();
    let rules_json = serde_json::to_string(rules)?;

    let id = match id {
        Some(id) => {
            let result = sqlx::query(
                "UPDATE game_groups SET title = ?, img = ?, rules = ?, updated_at = ? WHERE id = ?",
            )
            .bind(input.title.trim())
            .bind(input.img.trim())
            .bind(&rules_json)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
            if result.rows_affected() == 0 {
                return Ok(None);
            }
            id.to_string()
        }
        None => {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO game_groups (id, title, img, rules, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(input.title.trim())
            .bind(input.img.trim())
            .bind(&rules_json)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await?;
            id
        }
    };

    get_group(pool, &id).await
}

pub async fn delete_group(pool: &SqlitePool, id: &str) -> BackendResult<bool> {
    let result = sqlx::query("DELETE FROM game_groups WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The metadata document, or the default when it was never written.
pub async fn load_metadata(pool: &SqlitePool) -> BackendResult<LibraryMetadata> {
    let body: Option<String> = sqlx::query_scalar("SELECT body FROM system_documents WHERE key = ?")
        .bind(METADATA_KEY)
        .fetch_optional(pool)
        .await?;

    match body {
        Some(body) => Ok(serde_json::from_str(&body)?),
        None => Ok(LibraryMetadata::default()),
    }
}

pub async fn save_metadata(pool: &SqlitePool, metadata: &LibraryMetadata) -> BackendResult<()> {
    save_tag_change(pool, metadata, &[]).await
}

/// Persist a metadata document together with the games a tag edit touched.
pub async fn save_tag_change(
    pool: &SqlitePool,
    metadata: &LibraryMetadata,
    games: &[Game],
) -> BackendResult<()> {
    let now = Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    for game in games {
        sqlx::query("UPDATE games SET tags = ?, badge = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&game.tags)?)
            .bind(&game.badge)
            .bind(now)
            .bind(&game.id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO system_documents (key, body, updated_at) VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at
        "#,
    )
    .bind(METADATA_KEY)
    .bind(serde_json::to_string(metadata)?)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
