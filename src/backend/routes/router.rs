/**
 * Router Configuration
 *
 * Combines every route group into one Axum router.
 *
 * # Route Order
 *
 * 1. API routes (auth, members, realtime, changelog, launcher, status)
 * 2. Feed routes
 * 3. Library routes
 * 4. Static files from `static_dir` as the fallback
 *
 * # Layers
 *
 * The session middleware runs on every request, inside the trace and CORS
 * layers, so handlers see the resolved [`AuthenticatedUser`] in the
 * request extensions.
 *
 * [`AuthenticatedUser`]: crate::backend::middleware::AuthenticatedUser
 */

use axum::{
    http::{header, Method},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::backend::middleware::session_middleware;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::feed_routes::configure_feed_routes;
use crate::backend::routes::library_routes::configure_library_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();
    let router = configure_api_routes(router);
    let router = configure_feed_routes(router);
    let router = configure_library_routes(router);

    // Unknown paths fall through to the static front-end; ServeDir answers
    // 404 for files that do not exist
    let router = router.fallback_service(ServeDir::new(&app_state.config.static_dir));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    // Outermost first: trace, CORS, then the session lookup
    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn_with_state(app_state.clone(), session_middleware)),
        )
        .with_state(app_state)
}
