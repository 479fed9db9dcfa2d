//! Changelog Module
//!
//! The "what's new" HTML document shown on the portal, stored as the
//! `updates` system document.

/// HTML sanitizer
pub mod sanitize;

/// Changelog endpoints
pub mod handlers;

pub use handlers::{get_changelog, put_changelog, Changelog, DEFAULT_CHANGELOG};
pub use sanitize::sanitize_html;
