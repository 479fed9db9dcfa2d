//! Generated avatars for accounts without a photo.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Fill colours, picked by the initial's code point.
const COLORS: [&str; 26] = [
    "#ef4444", "#f97316", "#f59e0b", "#84cc16", "#10b981", "#06b6d4", "#3b82f6",
    "#6366f1", "#8b5cf6", "#d946ef", "#f43f5e", "#e11d48", "#db2777", "#9333ea",
    "#4f46e5", "#2563eb", "#0284c7", "#0d9488", "#059669", "#65a30d", "#ca8a04",
    "#ea580c", "#dc2626", "#7e22ce", "#be185d", "#4338ca",
];

/// Uppercased first character of `username`, or of "Guest" when empty.
pub fn initial(username: &str) -> String {
    let name = if username.is_empty() { "Guest" } else { username };
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "G".to_string())
}

/// Background colour for an initial. Same letter, same colour.
pub fn color_for(initial: &str) -> &'static str {
    let code = initial.chars().next().map(u32::from).unwrap_or(0);
    COLORS[(code as usize) % COLORS.len()]
}

/// Square SVG avatar showing the user's initial, as a base64 data URL.
pub fn default_avatar(username: &str) -> String {
    let letter = initial(username);
    let fill = color_for(&letter);
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"#,
            r#"<rect width="100" height="100" fill="{fill}"/>"#,
            r#"<text x="50" y="50" font-family="Segoe UI, sans-serif" font-weight="bold" "#,
            r#"font-size="50" fill="white" text-anchor="middle" dy=".35em">{letter}</text>"#,
            r#"</svg>"#,
        ),
        fill = fill,
        letter = escape_xml(&letter),
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Photo to display: the stored one, or the generated fallback.
pub fn effective_photo(photo_url: &str, username: &str) -> String {
    if photo_url.trim().is_empty() {
        default_avatar(username)
    } else {
        photo_url.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
