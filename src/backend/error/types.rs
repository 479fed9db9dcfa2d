/**
 * Backend Error Types
 *
 * Error type returned by every HTTP handler. Each variant maps to a status
 * code and a sentence that is safe to show to the user.
 *
 * # Error Categories
 *
 * ## Request Errors
 *
 * Problems with what the client sent or who sent it:
 * - Missing or invalid session (401)
 * - Role does not allow the action (403)
 * - Unknown post, game, group or user (404)
 * - Duplicate names, purging a live record (409)
 * - Validation failures from the shared rules (400)
 *
 * ## Internal Errors
 *
 * Database, hashing, token signing and serialization failures. These are
 * logged with full detail and reported to the client as
 * "An unexpected error occurred."
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Sentence shown for any failure the client cannot act on.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use oasis::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Please fill all fields");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
///
/// let err = BackendError::not_found("Post not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// No session, or the session token is invalid
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The session's role does not permit the action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The addressed record does not exist (or is not visible)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request conflicts with current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal failure outside the database (hashing, signing, ...)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Shared error (validation, permission, serialization)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Shorthand for a 400 validation failure on `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Unauthorized` - 401
    /// - `Forbidden` - 403
    /// - `NotFound` - 404
    /// - `Conflict` - 409
    /// - `SharedError` - 400 for validation, 403 for permission, 500 otherwise
    /// - `Database`, `Internal`, `SerializationError` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::PermissionError { .. } => StatusCode::FORBIDDEN,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_) | Self::Internal(_) | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the user-facing error message
    ///
    /// Internal failures never expose their cause.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message) => message.clone(),
            Self::SharedError(SharedError::SerializationError { .. }) => UNEXPECTED_ERROR.to_string(),
            Self::SharedError(err) => err.user_message().to_string(),
            Self::Database(_) | Self::Internal(_) | Self::SerializationError(_) => {
                UNEXPECTED_ERROR.to_string()
            }
        }
    }

    /// Whether the error is a server-side fault worth an error-level log.
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}
