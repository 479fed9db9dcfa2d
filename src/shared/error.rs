//! Shared Error Types
//!
//! Errors raised by the platform-agnostic rules in [`crate::shared`]: role
//! checks, library and feed validation, serialization of stored documents.
//! The backend wraps these in [`BackendError`](crate::backend::error::BackendError)
//! which maps each variant to an HTTP status.
//!
//! # Usage
//!
//! ```rust
//! use oasis::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Title and URL required");
//! assert_eq!(error.user_message(), "Title and URL required");
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
    },

    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        field: String,
        message: String,
    },

    #[error("Permission denied: {message}")]
    PermissionError {
        message: String,
    },
}

impl SharedError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::PermissionError {
            message: message.into(),
        }
    }

    /// The sentence shown to the person who triggered the error, without
    /// the variant prefix used by `Display`.
    pub fn user_message(&self) -> &str {
        match self {
            Self::SerializationError { message }
            | Self::ValidationError { message, .. }
            | Self::PermissionError { message } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
