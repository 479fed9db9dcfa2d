/**
 * Library Route Handlers
 *
 * - `GET /api/library`, `GET /api/library/games` - public reads
 * - games, groups and tags writes - admin only, checked in the handlers
 */

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::library::handlers;
use crate::backend::server::state::AppState;

/// Configure library routes
pub fn configure_library_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/library", get(handlers::get_library))
        .route(
            "/api/library/games",
            get(handlers::list_games).post(handlers::create_game),
        )
        .route("/api/library/games/reorder", post(handlers::reorder_games))
        .route(
            "/api/library/games/{id}",
            put(handlers::update_game).delete(handlers::delete_game),
        )
        .route("/api/library/games/{id}/restore", post(handlers::restore_game))
        .route("/api/library/games/{id}/purge", delete(handlers::purge_game))
        .route("/api/library/groups", post(handlers::create_group))
        .route(
            "/api/library/groups/{id}",
            put(handlers::update_group).delete(handlers::delete_group),
        )
        .route("/api/library/tags", post(handlers::add_tag))
        .route("/api/library/tag-order", post(handlers::reorder_tags))
        .route(
            "/api/library/tags/{name}",
            put(handlers::rename_tag).delete(handlers::delete_tag),
        )
}
