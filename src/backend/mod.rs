//! Backend Module
//!
//! All server-side code for the Oasis portal: an Axum HTTP server over a
//! SQLite pool, with session auth, the community feed, the game library,
//! the changelog, the launcher document and a realtime event stream.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - State, database bootstrap, app creation
//! - **`routes`** - Route groups and router assembly
//! - **`middleware`** - Session resolution and auth extractors
//! - **`auth`** - Accounts, passwords, session tokens, members
//! - **`feed`** - Chat channels, boards, polls, comments, garbage bin
//! - **`library`** - Games, groups, tags and filters
//! - **`changelog`** - The sanitized "what's new" document
//! - **`launcher`** - The stand-alone launcher document
//! - **`realtime`** - Event broadcasting and the SSE stream
//! - **`error`** - Backend error type and HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - `oasis-server` binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── middleware/     - Request middleware
//! ├── auth/           - Authentication and members
//! ├── feed/           - Community feed
//! ├── library/        - Game library
//! ├── changelog/      - Changelog document
//! ├── launcher/       - Launcher document
//! ├── realtime/       - Event broadcasting
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the pool, the broadcast sender, the session keys and
//! the configuration. Everything in it is cheap to clone; handlers pull
//! the parts they need through `FromRef`.
//!
//! # Permissions
//!
//! Every write checks the caller's role in the handler before touching the
//! database. Roles are reloaded on each request, so a role change or a ban
//! applies to existing sessions immediately.
//!
//! # Example
//!
//! ```rust,ignore
//! use oasis::backend::server::create_app;
//! use oasis::shared::AppConfig;
//!
//! let app = create_app(AppConfig::load()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Real-time update system
#[cfg(feature = "ssr")]
pub mod realtime;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// Authentication and user management
#[cfg(feature = "ssr")]
pub mod auth;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Community feed
#[cfg(feature = "ssr")]
pub mod feed;

/// Game library
#[cfg(feature = "ssr")]
pub mod library;

/// Changelog document
#[cfg(feature = "ssr")]
pub mod changelog;

/// Launcher document
#[cfg(feature = "ssr")]
pub mod launcher;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use server::{build_state, create_app, AppState};
#[cfg(feature = "ssr")]
pub use realtime::{handle_realtime_subscription, broadcast_event, RealtimeEventBroadcast};
#[cfg(feature = "ssr")]
pub use error::BackendError;
