//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Session resolution and the `AuthUser` / `MaybeUser` extractors
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, Router};
//! use oasis::backend::middleware::session_middleware;
//! use oasis::backend::server::AppState;
//!
//! fn with_sessions(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.layer(middleware::from_fn_with_state(state, session_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{AuthenticatedUser, AuthUser, MaybeUser, session_middleware, BANNED_MESSAGE};
