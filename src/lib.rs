//! Oasis - Main Library
//!
//! Oasis is a community portal and game launcher: a realtime chat and
//! feedback feed, a curated game library with emulation groups and tag
//! hierarchies, and a stand-alone launcher document generated per viewer.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by the server and its clients
//!   - Roles, feed and library types, realtime events
//!   - Configuration and error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server over SQLite (sqlx)
//!   - Session auth with bcrypt and JWT
//!   - Feed, library, changelog and launcher endpoints
//!   - Realtime broadcasting over Server-Sent Events
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the backend modules and the `oasis-server` binary.
//!   On by default.
//!
//! # Usage
//!
//! ```rust,ignore
//! use oasis::backend::server::create_app;
//! use oasis::shared::AppConfig;
//!
//! let config = AppConfig::load()?;
//! let app = create_app(config).await?;
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for validation and permission failures
//!   that do not depend on the server
//! - `backend::error::BackendError` for everything a handler can return;
//!   it renders as `{"error": "...", "status": N}`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
