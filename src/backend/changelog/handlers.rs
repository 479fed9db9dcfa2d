/**
 * Changelog Handlers
 *
 * - `GET /api/changelog` - public; the default document until an admin saves one
 * - `PUT /api/changelog` - admin only; content is sanitized before storing
 */

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::changelog::sanitize::sanitize_html;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::RealtimeEvent;

/// Key of the changelog document in `system_documents`
pub const CHANGELOG_KEY: &str = "updates";

/// Shown until an admin saves a changelog
pub const DEFAULT_CHANGELOG: &str =
    r#"<div style="font-size: 1.875rem; font-weight: 800;">Admin Panel & Smart Badges</div>"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub content: String,
    /// Milliseconds since the epoch of the last save, absent for the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

pub async fn load_changelog(pool: &SqlitePool) -> BackendResult<Changelog> {
    let row: Option<(String, i64)> =
        sqlx::query_as("SELECT body, updated_at FROM system_documents WHERE key = ?")
            .bind(CHANGELOG_KEY)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((body, updated_at)) => {
            let mut doc: Changelog = serde_json::from_str(&body)?;
            doc.updated_at = Some(updated_at);
            Ok(doc)
        }
        None => Ok(Changelog {
            content: DEFAULT_CHANGELOG.to_string(),
            updated_at: None,
        }),
    }
}

pub async fn get_changelog(State(state): State<AppState>) -> BackendResult<Json<Changelog>> {
    Ok(Json(load_changelog(&state.db_pool).await?))
}

pub async fn put_changelog(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<Changelog>,
) -> BackendResult<Json<Changelog>> {
    user.require_admin()?;

    let content = sanitize_html(&request.content);
    if content != request.content {
        tracing::warn!("[Changelog] Sanitizer rewrote {}'s changelog", user.username);
    }

    let now = Utc::now().timestamp_millis();
    let body = serde_json::to_string(&Changelog {
        content: content.clone(),
        updated_at: None,
    })?;

    sqlx::query(
        r#"
        INSERT INTO system_documents (key, body, updated_at) VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at
        "#,
    )
    .bind(CHANGELOG_KEY)
    .bind(body)
    .bind(now)
    .execute(&state.db_pool)
    .await?;

    tracing::info!("[Changelog] {} saved the changelog", user.username);
    broadcast_event(
        &state.realtime_broadcast,
        RealtimeEvent::changelog().with_version(now.to_string()),
    )
    .await;

    Ok(Json(Changelog {
        content,
        updated_at: Some(now),
    }))
}
