/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container, holding:
 * - The SQLite connection pool
 * - The realtime broadcast channel
 * - The session signing keys
 * - The loaded configuration
 *
 * Every field is cheap to clone (`Arc` or a handle type), so handlers can
 * extract the whole state or, through `FromRef`, only the part they need.
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::realtime::broadcast::RealtimeEventBroadcast;
use crate::shared::AppConfig;

/// Application state shared by every handler
///
/// # Usage
///
/// ```rust,ignore
/// use oasis::backend::server::state::AppState;
/// use axum::extract::State;
///
/// async fn handler(State(app_state): State<AppState>) {
///     let games = oasis::backend::library::db::load_games(&app_state.db_pool).await;
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db_pool: SqlitePool,

    /// Generic real-time event broadcast channel
    ///
    /// Every mutation publishes a content-free event here; `/realtime`
    /// subscribers receive copies filtered by type.
    pub realtime_broadcast: RealtimeEventBroadcast,

    /// Token signing and verification keys
    pub session_keys: SessionKeys,

    pub config: Arc<AppConfig>,
}

/// Implement FromRef for RealtimeEventBroadcast
///
/// This allows the SSE handler to extract the broadcast sender directly
/// from `AppState`.
impl FromRef<AppState> for RealtimeEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime_broadcast.clone()
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.session_keys.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
