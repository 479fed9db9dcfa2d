//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion to responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and status/message mapping
//! └── conversion.rs - IntoResponse and From impls
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use oasis::backend::error::BackendError;
//! use axum::Json;
//!
//! async fn handler() -> Result<Json<()>, BackendError> {
//!     Err(BackendError::not_found("Game not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::{BackendError, UNEXPECTED_ERROR};

/// Result alias used by handlers and database helpers that report
/// [`BackendError`].
pub type BackendResult<T> = Result<T, BackendError>;
