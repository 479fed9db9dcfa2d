//! Changelog HTML sanitizer
//!
//! Admins write the changelog as HTML and every visitor renders it. The
//! document is parsed and re-serialized through an allow-list (ammonia):
//! unknown elements are dropped, `<script>` and `<style>` lose their bodies,
//! event handler attributes never survive, and URLs must use an allowed
//! scheme after entity decoding. `style` and `class` are kept on every
//! element since the changelog is laid out with inline styles.
//!
//! The builder is configured once and cached in a `OnceLock`.

use ammonia::Builder;
use std::collections::HashSet;
use std::sync::OnceLock;

const EXTRA_ATTRIBUTES: [&str; 2] = ["style", "class"];
const URL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

fn changelog_builder() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .add_generic_attributes(EXTRA_ATTRIBUTES)
        .url_schemes(URL_SCHEMES.into_iter().collect::<HashSet<_>>())
        .link_rel(None);
    builder
}

static SANITIZER: OnceLock<Builder<'static>> = OnceLock::new();

/// Strip active content from changelog HTML.
pub fn sanitize_html(html: &str) -> String {
    SANITIZER.get_or_init(changelog_builder).clean(html).to_string()
}
