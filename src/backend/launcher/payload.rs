/**
 * Launcher Payload
 *
 * Builds the stand-alone launcher document: markup, the stylesheet and
 * client script from `assets/`, and the library snapshot embedded as
 * script data.
 *
 * Admin-only markup (the Admin toggle, the explorer and the edit modals)
 * and the dev-tools panel are left out entirely for viewers without the
 * role, not merely hidden.
 */

use serde::Serialize;

use crate::shared::LibrarySnapshot;

const LAUNCHER_CSS: &str = include_str!("assets/launcher.css");
const LAUNCHER_JS: &str = include_str!("assets/launcher.js");

/// Who the document is rendered for
#[derive(Debug, Clone, Default)]
pub struct LauncherViewer<'a> {
    /// Display name; "Guest" when anonymous
    pub username: &'a str,
    pub is_admin: bool,
    pub is_dev: bool,
    /// Session token the client script sends back to the REST API
    pub token: Option<&'a str>,
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON for embedding inside `<script>`.
///
/// `<`, `>` and `&` only occur inside JSON strings, where `\uXXXX` escapes
/// keep the value intact, so string data can neither close the element nor
/// open an `<!--` escape. Line separators are escaped for older parsers.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn mode_toggle(is_admin: bool) -> String {
    let mut html = String::from(
        r#"<div class="mode-toggle">
                <button class="mode-btn active" id="mode-normal" data-mode="normal">Normal</button>
                <button class="mode-btn" id="mode-emulation" data-mode="emulation">Emulation</button>"#,
    );
    if is_admin {
        html.push_str(
            r#"
                <button class="mode-btn admin" id="mode-admin" data-mode="admin">Admin</button>"#,
        );
    }
    html.push_str("\n            </div>");
    html
}

fn admin_view() -> &'static str {
    r#"<div class="admin-view" id="admin-view">
                <div class="admin-tabs">
                    <div class="admin-tab active" data-tab="games">Games</div>
                    <div class="admin-tab" data-tab="groups">Groups</div>
                    <div class="admin-tab" data-tab="tags">Tags</div>
                    <div class="admin-tab garbage" data-tab="garbage">Garbage</div>
                </div>
                <div class="admin-panel active" id="admin-panel-games">
                    <div class="admin-toolbar">
                        <div><h3>Game Library</h3><div class="hint">Drag rows to reorder</div></div>
                        <div>
                            <input type="text" id="admin-search-games" class="field inline" placeholder="Search games...">
                            <button class="btn primary" data-action="add-game">+ Add Game</button>
                        </div>
                    </div>
                    <table class="admin-table">
                        <thead><tr><th></th><th></th><th>Title</th><th>Tags / Badge</th><th>Actions</th></tr></thead>
                        <tbody id="admin-games"></tbody>
                    </table>
                </div>
                <div class="admin-panel" id="admin-panel-groups">
                    <div class="admin-toolbar">
                        <h3>Groups</h3>
                        <div>
                            <input type="text" id="admin-search-groups" class="field inline" placeholder="Search groups...">
                            <button class="btn primary" data-action="add-group">+ Create Group</button>
                        </div>
                    </div>
                    <table class="admin-table">
                        <thead><tr><th></th><th>Group Name</th><th>Rules (Tags)</th><th>Actions</th></tr></thead>
                        <tbody id="admin-groups"></tbody>
                    </table>
                </div>
                <div class="admin-panel" id="admin-panel-tags">
                    <div class="admin-toolbar">
                        <div><h3>Tags</h3><div class="hint">Manage library tags and badges</div></div>
                        <div>
                            <input type="text" id="admin-search-tags" class="field inline" placeholder="Search tags...">
                            <input type="text" id="new-tag" class="field inline" placeholder="New Tag...">
                            <button class="btn primary" data-action="add-tag">+ Add</button>
                        </div>
                    </div>
                    <table class="admin-table">
                        <thead><tr><th></th><th>Tag Name</th><th>Sub-categories</th><th>Actions</th></tr></thead>
                        <tbody id="admin-tags"></tbody>
                    </table>
                </div>
                <div class="admin-panel" id="admin-panel-garbage">
                    <div class="admin-toolbar">
                        <div><h3>Garbage Bin</h3><div class="hint">Restore or permanently delete games</div></div>
                    </div>
                    <table class="admin-table">
                        <thead><tr><th></th><th>Title</th><th>Actions</th></tr></thead>
                        <tbody id="admin-garbage"></tbody>
                    </table>
                </div>
            </div>"#
}

fn dev_panel(is_admin: bool) -> String {
    let mut html = String::from(
        r#"<aside class="dev-panel" id="dev-panel">
        <header><span>Dev Tools</span><button class="btn" data-action="toggle-dev">&times;</button></header>"#,
    );
    if is_admin {
        html.push_str(
            r#"
        <button class="btn" data-action="add-game">+ Add Game Manually</button>
        <button class="btn" data-action="add-group">+ Create Group</button>
        <button class="btn danger" data-action="open-admin">Open Full Admin Dashboard</button>"#,
        );
    }
    html.push_str("\n    </aside>");
    html
}

fn edit_modals() -> &'static str {
    r#"<div class="modal" id="game-modal">
        <div class="modal-box">
            <h3 id="game-modal-title">Edit Game</h3>
            <label for="game-title">Title</label>
            <input type="text" class="field" id="game-title">
            <label for="game-img">Image URL</label>
            <input type="text" class="field" id="game-img">
            <label for="game-url">Game URL</label>
            <input type="text" class="field" id="game-url">
            <label for="game-tag-search">Tags (Light / Medium / Heavy set the badge)</label>
            <input type="text" class="field" id="game-tag-search" placeholder="Search tags...">
            <div class="checklist" id="game-tags"></div>
            <div class="modal-actions">
                <button class="btn primary" data-action="save-game">Save Changes</button>
                <button class="btn" data-close="game-modal">Cancel</button>
            </div>
        </div>
    </div>

    <div class="modal" id="group-modal">
        <div class="modal-box">
            <h3 id="group-modal-title">Edit Group</h3>
            <label for="group-title">Group Title</label>
            <input type="text" class="field" id="group-title">
            <label for="group-img">Image URL</label>
            <input type="text" class="field" id="group-img">
            <label>Included Tags (Rules)</label>
            <div class="checklist" id="group-rules"></div>
            <div class="modal-actions">
                <button class="btn primary" data-action="save-group">Save Group</button>
                <button class="btn" data-close="group-modal">Cancel</button>
            </div>
        </div>
    </div>

    <div class="modal" id="tag-modal">
        <div class="modal-box">
            <h3>Edit Tag</h3>
            <label for="tag-name">Tag Name</label>
            <input type="text" class="field" id="tag-name">
            <label>Sub-categories</label>
            <div class="checklist" id="tag-children"></div>
            <div class="modal-actions">
                <button class="btn primary" data-action="save-tag">Save Tag</button>
                <button class="btn" data-close="tag-modal">Cancel</button>
            </div>
        </div>
    </div>"#
}

/// Render the launcher document.
///
/// # Errors
///
/// Fails only if the snapshot cannot be serialized.
pub fn render_launcher(
    snapshot: &LibrarySnapshot,
    viewer: &LauncherViewer<'_>,
    api_base: &str,
) -> Result<String, serde_json::Error> {
    let username = escape_html(viewer.username);

    let dev_button = if viewer.is_dev {
        r#"<button class="icon-btn dev" data-action="toggle-dev" title="Developer Tools">&#128295;</button>"#
    } else {
        ""
    };
    let admin_view = if viewer.is_admin { admin_view() } else { "" };
    let dev_panel = if viewer.is_dev { dev_panel(viewer.is_admin) } else { String::new() };
    let modals = if viewer.is_admin { edit_modals() } else { "" };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Oasis</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="backdrop" id="backdrop"></div>
    <div class="shell" id="app-shell">
        <header class="top-bar">
            <div class="brand" data-action="home">
                <div class="logo">Oasis</div>
                <div class="clock"><span id="clock">00:00</span><span class="user-tag">{username}</span></div>
            </div>
            {mode_toggle}
            <div class="controls">
                <div class="tag-picker" id="tag-picker">
                    <button class="pill-btn" data-action="toggle-tags">Tags &#9662;</button>
                    <div class="tag-menu" id="tag-menu"></div>
                </div>
                <button class="icon-btn" data-action="random" title="Random Game">&#127922;</button>
                {dev_button}
                <input type="text" id="game-search" class="search" placeholder="Search...">
            </div>
        </header>

        <div class="ribbon" id="ribbon"></div>

        <main class="dashboard">
            <div class="groups" id="emulation-groups"></div>
            <div class="grid" id="game-grid"></div>
            {admin_view}
        </main>
    </div>

    {dev_panel}

    {modals}

    <div class="player" id="player">
        <header>
            <button class="pill-btn" data-action="close-player">&larr; Back</button>
            <span id="player-title">Game</span>
            <button class="icon-btn" data-action="fullscreen">&#9974;</button>
        </header>
        <div class="player-frame" id="player-frame"><iframe src="about:blank" allowfullscreen></iframe></div>
    </div>

    <script>
        let GAMES = {games};
        let GROUPS = {groups};
        let TAGS = {tags};
        let HIERARCHY = {hierarchy};
        const IS_ADMIN = {is_admin};
        const IS_DEV = {is_dev};
        const API_BASE = {api_base};
        const TOKEN = {token};

{js}
    </script>
</body>
</html>
"#,
        css = LAUNCHER_CSS,
        username = username,
        mode_toggle = mode_toggle(viewer.is_admin),
        dev_button = dev_button,
        admin_view = admin_view,
        dev_panel = dev_panel,
        modals = modals,
        games = script_json(&snapshot.games)?,
        groups = script_json(&snapshot.groups)?,
        tags = script_json(&snapshot.tags)?,
        hierarchy = script_json(&snapshot.hierarchy)?,
        is_admin = viewer.is_admin,
        is_dev = viewer.is_dev,
        api_base = script_json(api_base)?,
        token = script_json(&viewer.token)?,
        js = LAUNCHER_JS,
    ))
}
