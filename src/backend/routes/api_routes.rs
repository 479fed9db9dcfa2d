/**
 * API Route Handlers
 *
 * Accounts, members, realtime, changelog, launcher and status routes.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/signup` - Create an account
 * - `POST /api/auth/login` - Exchange credentials for a session token
 * - `GET /api/auth/me` - Current account (requires authentication)
 * - `DELETE /api/auth/me` - Delete the current account
 * - `PATCH /api/auth/me/username` - Change the display name
 * - `PUT /api/auth/me/photo` - Change or reset the avatar
 *
 * ## Members
 * - `GET /api/users?search=` - Member directory
 * - `PATCH /api/users/{id}/role` - Assign a role (admin)
 *
 * ## Other
 * - `GET /realtime` - SSE event stream
 * - `GET|PUT /api/changelog` - Changelog document
 * - `GET /api/launcher` - Launcher document
 * - `GET /api/status` - Readiness and library counts
 */

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch, post, put},
    Router,
};
use serde::Serialize;

use crate::backend::auth::handlers::members;
use crate::backend::auth::{delete_me, get_me, login, rename, set_photo, signup};
use crate::backend::changelog::{get_changelog, put_changelog};
use crate::backend::error::BackendResult;
use crate::backend::launcher::get_launcher;
use crate::backend::realtime::handle_realtime_subscription;
use crate::backend::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub games: i64,
    pub groups: i64,
}

/// Readiness probe with live game and group counts.
pub async fn status(State(state): State<AppState>) -> BackendResult<Json<StatusResponse>> {
    let games: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM games WHERE is_deleted = 0")
        .fetch_one(&state.db_pool)
        .await?;
    let groups: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM game_groups")
        .fetch_one(&state.db_pool)
        .await?;

    Ok(Json(StatusResponse {
        status: "Ready",
        games,
        groups,
    }))
}

/// Configure account, member and miscellaneous API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me).delete(delete_me))
        .route("/api/auth/me/username", patch(rename))
        .route("/api/auth/me/photo", put(set_photo))
        // Member directory and roles
        .route("/api/users", get(members::list))
        .route("/api/users/{id}/role", patch(members::set_role))
        // Realtime event stream
        .route("/realtime", get(handle_realtime_subscription))
        .route("/api/changelog", get(get_changelog).put(put_changelog))
        .route("/api/launcher", get(get_launcher))
        .route("/api/status", get(status))
}
