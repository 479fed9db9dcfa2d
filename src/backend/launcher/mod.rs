//! Launcher Module
//!
//! The stand-alone game launcher: one HTML document with the library
//! snapshot, stylesheet and client script inlined, opened in its own
//! window. The client script filters locally and refetches
//! `/api/library` whenever the realtime stream reports a library or
//! metadata change.

/// Document builder
pub mod payload;

/// `GET /api/launcher`
pub mod handlers;

pub use handlers::get_launcher;
pub use payload::{render_launcher, LauncherViewer};
