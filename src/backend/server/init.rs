/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Create the realtime broadcast channel
 * 2. Open the database, run migrations, seed system documents
 * 3. Derive session keys from the configuration
 * 4. Create and configure the router
 */

use axum::Router;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::{AppConfig, RealtimeEvent};

/// Realtime channel capacity. Slow subscribers past this many events lag
/// and skip ahead.
pub const REALTIME_CHANNEL_CAPACITY: usize = 1000;

/// Build the shared state without a router.
///
/// Integration tests use this to reach the pool and broadcast channel
/// directly.
pub async fn build_state(config: AppConfig) -> Result<AppState, sqlx::Error> {
    let (realtime_broadcast, _) = broadcast::channel::<RealtimeEvent>(REALTIME_CHANNEL_CAPACITY);
    tracing::info!("[Server] Realtime broadcast channel initialized");

    let db_pool = load_database(&config.database_url).await?;
    let session_keys = SessionKeys::from_config(&config);

    Ok(AppState {
        db_pool,
        realtime_broadcast,
        session_keys,
        config: Arc::new(config),
    })
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated.
pub async fn create_app(config: AppConfig) -> Result<Router, sqlx::Error> {
    tracing::info!("[Server] Initializing Oasis backend server");

    let app_state = build_state(config).await?;
    let app = create_router(app_state);

    tracing::info!("[Server] Router configured");
    Ok(app)
}
