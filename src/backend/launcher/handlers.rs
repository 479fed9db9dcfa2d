/**
 * Launcher Handler
 *
 * `GET /api/launcher` renders the launcher document for the current viewer.
 * The session token that authenticated the request is embedded so the
 * launcher window can call the admin API on the viewer's behalf.
 */

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, HOST},
        HeaderMap,
    },
    response::Html,
};

use crate::backend::error::BackendResult;
use crate::backend::launcher::payload::{render_launcher, LauncherViewer};
use crate::backend::library::load_snapshot;
use crate::backend::middleware::MaybeUser;
use crate::backend::server::state::AppState;
use crate::shared::Role;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Origin the launcher should call back to, from `Host` and
/// `X-Forwarded-Proto`. Empty (same origin) when there is no `Host`.
fn api_base(headers: &HeaderMap) -> String {
    let Some(host) = headers.get(HOST).and_then(|h| h.to_str().ok()) else {
        return String::new();
    };
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");
    format!("{}://{}", scheme, host)
}

pub async fn get_launcher(
    State(state): State<AppState>,
    viewer: MaybeUser,
    headers: HeaderMap,
) -> BackendResult<Html<String>> {
    let snapshot = load_snapshot(&state.db_pool, viewer.is_admin()).await?;

    let launcher_viewer = match &viewer.0 {
        Some(user) => LauncherViewer {
            username: &user.username,
            is_admin: user.is_admin(),
            is_dev: matches!(user.role, Role::Owner | Role::Developer),
            token: bearer_token(&headers),
        },
        None => LauncherViewer {
            username: "Guest",
            ..Default::default()
        },
    };

    let html = render_launcher(&snapshot, &launcher_viewer, &api_base(&headers))?;
    tracing::debug!(
        "[Launcher] Rendered for {} ({} games, {} groups)",
        launcher_viewer.username,
        snapshot.games.len(),
        snapshot.groups.len()
    );

    Ok(Html(html))
}
