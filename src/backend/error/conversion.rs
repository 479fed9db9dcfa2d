/**
 * Error Conversion
 *
 * `IntoResponse` for [`BackendError`], so handlers can return it directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 *
 * Server-side faults are logged here with their full cause before the
 * generic message is sent.
 */

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if self.is_internal() {
            tracing::error!("[Error] {} -> {}", self, status);
        } else {
            tracing::debug!("[Error] {} -> {}", self, status);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, [(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
    }
}

/// Map a bcrypt failure to an internal error.
impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        BackendError::internal(format!("password hashing failed: {}", err))
    }
}

/// Map a token signing failure to an internal error. Token *verification*
/// failures are turned into 401s by the session middleware instead.
impl From<jsonwebtoken::errors::Error> for BackendError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BackendError::internal(format!("token signing failed: {}", err))
    }
}
