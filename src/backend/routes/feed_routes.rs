/**
 * Feed Route Handlers
 *
 * Chat channels, boards, comments, polls and the garbage bin. Handlers
 * enforce channel read/write rules themselves; see `backend::feed`.
 */

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::backend::feed::{comments, garbage, handlers};
use crate::backend::server::state::AppState;

/// Configure feed routes
///
/// Static segments (`posts`, `comments`, `garbage`) take priority over
/// the `{channel}` capture.
pub fn configure_feed_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/feed/garbage", get(garbage::list_garbage))
        .route(
            "/api/feed/{channel}",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/feed/posts/{id}",
            get(handlers::get_post)
                .patch(handlers::edit_post)
                .delete(handlers::delete_post),
        )
        .route("/api/feed/posts/{id}/pin", post(handlers::toggle_pin))
        .route("/api/feed/posts/{id}/lock", post(handlers::toggle_lock))
        .route("/api/feed/posts/{id}/vote", post(handlers::vote))
        .route("/api/feed/posts/{id}/poll", get(handlers::poll_results))
        .route("/api/feed/posts/{id}/restore", post(garbage::restore_post))
        .route("/api/feed/posts/{id}/purge", delete(garbage::purge_post))
        .route(
            "/api/feed/posts/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/api/feed/comments/{id}",
            patch(comments::edit_comment).delete(comments::delete_comment),
        )
}
