/**
 * Library Handlers
 *
 * Public reads:
 * - `GET /api/library` - snapshot (games, groups, tags, hierarchy, badges)
 * - `GET /api/library/games` - filtered games
 *
 * Admin writes:
 * - `POST /api/library/games`, `PUT /api/library/games/{id}` - save a game
 * - `DELETE /api/library/games/{id}` - move to the garbage bin
 * - `POST /api/library/games/{id}/restore`, `DELETE /api/library/games/{id}/purge`
 * - `POST /api/library/games/reorder` - drag-and-drop order
 * - `POST /api/library/groups`, `PUT|DELETE /api/library/groups/{id}`
 * - `POST /api/library/tags`, `PUT|DELETE /api/library/tags/{name}`
 * - `POST /api/library/tag-order`
 *
 * Game and group writes broadcast `library` events; tag writes broadcast
 * `metadata` events.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::library::db::{self, GameFields};
use crate::backend::library::filter::{self, dedupe_tags, derive_badge, GameQuery};
use crate::backend::library::metadata::{self, move_item};
use crate::backend::middleware::{AuthUser, MaybeUser};
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::library::{GameInput, GroupInput};
use crate::shared::{Game, Group, LibraryMetadata, LibrarySnapshot, RealtimeEvent};

#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AddTagRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteTagQuery {
    #[serde(default)]
    pub strip_from_games: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RenameTagRequest {
    pub new_name: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Games (sorted), groups and metadata with tags auto-imported.
///
/// Soft-deleted games are only included when `include_deleted` is set, for
/// the admin garbage tab.
pub async fn load_snapshot(pool: &SqlitePool, include_deleted: bool) -> BackendResult<LibrarySnapshot> {
    let mut games = db::load_games(pool).await?;
    if !include_deleted {
        games.retain(|g| !g.is_deleted);
    }
    let groups = db::load_groups(pool).await?;
    let metadata = db::load_metadata(pool).await?;

    let (tags, imported) = filter::auto_import_tags(&metadata.categories, &games, &groups);
    if imported {
        tracing::debug!("[Library] Auto-imported tags into the snapshot");
    }

    Ok(LibrarySnapshot {
        games,
        groups,
        tags,
        hierarchy: metadata.hierarchy,
        badges: metadata.badges,
    })
}

pub async fn get_library(
    State(state): State<AppState>,
    viewer: MaybeUser,
) -> BackendResult<Json<LibrarySnapshot>> {
    Ok(Json(load_snapshot(&state.db_pool, viewer.is_admin()).await?))
}

/// # Errors
///
/// * `400 Bad Request` - Emulation mode without a group
/// * `404 Not Found` - Unknown group
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> BackendResult<Json<Vec<Game>>> {
    let games = db::load_games(&state.db_pool).await?;

    let group_id = query.group.as_deref().map(str::trim).filter(|g| !g.is_empty());
    if let Some(group_id) = group_id {
        let group = db::get_group(&state.db_pool, group_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Group not found"))?;
        return Ok(Json(filter::group_pool(&games, &group)));
    }

    if query.is_emulation() {
        return Err(BackendError::validation("group", "Pick a group to list emulation games"));
    }

    Ok(Json(filter::filter_games(&games, &query)))
}

fn game_fields(input: &GameInput) -> BackendResult<GameFields> {
    let title = input.title.trim();
    let url = input.url.trim();
    if title.is_empty() || url.is_empty() {
        return Err(BackendError::validation("title", "Title and URL required"));
    }

    let tags = dedupe_tags(&input.tags);
    Ok(GameFields {
        title: title.to_string(),
        img: input.img.trim().to_string(),
        url: url.to_string(),
        badge: derive_badge(&tags),
        tags,
    })
}

pub async fn create_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<GameInput>,
) -> BackendResult<Json<Game>> {
    user.require_admin()?;
    let fields = game_fields(&input)?;

    let game = db::insert_game(&state.db_pool, &fields).await?;
    tracing::info!("[Library] {} added game {} ({})", user.username, game.title, game.id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", &game.id, "created")).await;

    Ok(Json(game))
}

pub async fn update_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<GameInput>,
) -> BackendResult<Json<Game>> {
    user.require_admin()?;
    let fields = game_fields(&input)?;

    let game = db::update_game(&state.db_pool, &id, &fields)
        .await?
        .ok_or_else(|| BackendError::not_found("Game not found"))?;
    tracing::info!("[Library] {} updated game {}", user.username, id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", &id, "updated")).await;

    Ok(Json(game))
}

async fn load_game(pool: &SqlitePool, id: &str) -> BackendResult<Game> {
    db::get_game(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Game not found"))
}

pub async fn delete_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Game>> {
    user.require_admin()?;
    load_game(&state.db_pool, &id).await?;

    db::set_game_deleted(&state.db_pool, &id, true).await?;
    tracing::info!("[Library] {} moved game {} to the garbage bin", user.username, id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", &id, "deleted")).await;

    Ok(Json(load_game(&state.db_pool, &id).await?))
}

pub async fn restore_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<Json<Game>> {
    user.require_admin()?;
    let game = load_game(&state.db_pool, &id).await?;
    if !game.is_deleted {
        return Err(BackendError::conflict("Game is not in the garbage bin"));
    }

    db::set_game_deleted(&state.db_pool, &id, false).await?;
    tracing::info!("[Library] {} restored game {}", user.username, id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", &id, "restored")).await;

    Ok(Json(load_game(&state.db_pool, &id).await?))
}

pub async fn purge_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<StatusCode> {
    user.require_admin()?;
    let game = load_game(&state.db_pool, &id).await?;
    if !game.is_deleted {
        return Err(BackendError::conflict("Move the game to the garbage bin before purging"));
    }

    db::purge_game(&state.db_pool, &id).await?;
    tracing::info!("[Library] {} purged game {}", user.username, id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", &id, "purged")).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Move one active game and renumber every active game 0..n.
pub async fn reorder_games(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ReorderRequest>,
) -> BackendResult<Json<Vec<Game>>> {
    user.require_admin()?;

    let mut active: Vec<Game> = db::load_games(&state.db_pool)
        .await?
        .into_iter()
        .filter(|g| !g.is_deleted)
        .collect();
    move_item(&mut active, request.from, request.to)?;

    let ordered_ids: Vec<String> = active.iter().map(|g| g.id.clone()).collect();
    db::save_game_order(&state.db_pool, &ordered_ids).await?;

    tracing::info!("[Library] {} moved game {} -> {}", user.username, request.from, request.to);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", "*", "reordered")).await;

    let games = db::load_games(&state.db_pool)
        .await?
        .into_iter()
        .filter(|g| !g.is_deleted)
        .collect();
    Ok(Json(games))
}

async fn save_group(
    state: &AppState,
    id: Option<&str>,
    input: &GroupInput,
) -> BackendResult<Group> {
    let rules = input.normalized_rules();
    if input.title.trim().is_empty() || rules.is_empty() {
        return Err(BackendError::validation("title", "Title & Rule required"));
    }

    db::save_group(&state.db_pool, id, input, &rules)
        .await?
        .ok_or_else(|| BackendError::not_found("Group not found"))
}

pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<GroupInput>,
) -> BackendResult<Json<Group>> {
    user.require_admin()?;
    let group = save_group(&state, None, &input).await?;

    tracing::info!("[Library] {} created group {} ({})", user.username, group.title, group.id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("group", &group.id, "created")).await;

    Ok(Json(group))
}

pub async fn update_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<GroupInput>,
) -> BackendResult<Json<Group>> {
    user.require_admin()?;
    let group = save_group(&state, Some(&id), &input).await?;

    tracing::info!("[Library] {} updated group {}", user.username, id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("group", &id, "updated")).await;

    Ok(Json(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<StatusCode> {
    user.require_admin()?;
    if !db::delete_group(&state.db_pool, &id).await? {
        return Err(BackendError::not_found("Group not found"));
    }

    tracing::info!("[Library] {} deleted group {}", user.username, id);
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("group", &id, "deleted")).await;

    Ok(StatusCode::NO_CONTENT)
}

/// The metadata document with auto-imported tags written into its
/// categories, and every game including the garbage bin.
///
/// Tag edits resolve names and positions against this list, which is the
/// one the admin snapshot shows. The flag is set when tags were imported.
async fn load_tag_state(pool: &SqlitePool) -> BackendResult<(LibraryMetadata, Vec<Game>, bool)> {
    let mut meta = db::load_metadata(pool).await?;
    let games = db::load_games(pool).await?;
    let groups = db::load_groups(pool).await?;

    let (tags, imported) = filter::auto_import_tags(&meta.categories, &games, &groups);
    meta.categories = tags;
    Ok((meta, games, imported))
}

pub async fn add_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<AddTagRequest>,
) -> BackendResult<Json<LibraryMetadata>> {
    user.require_admin()?;
    let (mut meta, _, imported) = load_tag_state(&state.db_pool).await?;

    let added = metadata::add_tag(&mut meta, &request.name);
    if added || imported {
        db::save_metadata(&state.db_pool, &meta).await?;
    }
    if added {
        tracing::info!("[Library] {} added tag {}", user.username, request.name.trim());
        broadcast_event(&state.realtime_broadcast, RealtimeEvent::metadata("tag_added")).await;
    }

    Ok(Json(meta))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(name): Path<String>,
    Query(query): Query<DeleteTagQuery>,
) -> BackendResult<Json<LibraryMetadata>> {
    user.require_admin()?;
    let (meta, games, _) = load_tag_state(&state.db_pool).await?;

    let change = metadata::delete_tag(&meta, &games, &name, query.strip_from_games)?;
    db::save_tag_change(&state.db_pool, &change.metadata, &change.games).await?;

    tracing::info!(
        "[Library] {} deleted tag {} ({} games updated)",
        user.username,
        name,
        change.games.len()
    );
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::metadata("tag_deleted")).await;
    if !change.games.is_empty() {
        broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", "*", "retagged")).await;
    }

    Ok(Json(change.metadata))
}

/// # Errors
///
/// * `400 Bad Request` - Blank new name
/// * `404 Not Found` - Unknown tag
/// * `409 Conflict` - Another tag already has the new name
pub async fn rename_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(name): Path<String>,
    Json(request): Json<RenameTagRequest>,
) -> BackendResult<Json<LibraryMetadata>> {
    user.require_admin()?;
    let (meta, games, _) = load_tag_state(&state.db_pool).await?;

    let change = metadata::rename_tag(&meta, &games, &name, &request.new_name, &request.children)?;
    db::save_tag_change(&state.db_pool, &change.metadata, &change.games).await?;

    tracing::info!("[Library] {} saved tag {} as {}", user.username, name, request.new_name.trim());
    broadcast_event(&state.realtime_broadcast, RealtimeEvent::metadata("tag_saved")).await;
    if !change.games.is_empty() {
        broadcast_event(&state.realtime_broadcast, RealtimeEvent::library("game", "*", "retagged")).await;
    }

    Ok(Json(change.metadata))
}

pub async fn reorder_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ReorderRequest>,
) -> BackendResult<Json<LibraryMetadata>> {
    user.require_admin()?;
    let (mut meta, _, _) = load_tag_state(&state.db_pool).await?;

    move_item(&mut meta.categories, request.from, request.to)?;
    db::save_metadata(&state.db_pool, &meta).await?;

    broadcast_event(&state.realtime_broadcast, RealtimeEvent::metadata("tags_reordered")).await;
    Ok(Json(meta))
}
