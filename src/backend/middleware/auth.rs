/**
 * Session Middleware
 *
 * Runs on every request. When an `Authorization: Bearer <token>` header is
 * present the token is verified, the account is loaded fresh from the
 * database, and an [`AuthenticatedUser`] is attached to the request
 * extensions. Requests without the header pass through anonymously.
 *
 * Handlers read the session through the [`AuthUser`] (required) and
 * [`MaybeUser`] (optional) extractors.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::Role;

/// Message returned to banned accounts.
pub const BANNED_MESSAGE: &str = "This account has been banned.";

/// Authenticated user information, attached to request extensions by
/// [`session_middleware`]
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub photo_url: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with 403 unless the session belongs to an Owner or Developer.
    pub fn require_admin(&self) -> Result<(), BackendError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!("[Auth] {} ({}) attempted an admin action", self.username, self.role);
            Err(BackendError::forbidden("Admins only"))
        }
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        let role = user.role();
        Self {
            user_id: user.id,
            email: user.email,
            username: user.username,
            role,
            photo_url: user.photo_url,
        }
    }
}

/// Resolve the bearer token, if any, into an [`AuthenticatedUser`]
///
/// # Errors
///
/// * `401 Unauthorized` - Malformed header, invalid or expired token, or
///   the account no longer exists
/// * `403 Forbidden` - The account is banned
pub async fn session_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(raw_header) = request.headers().get(AUTHORIZATION) else {
        return next.run(request).await;
    };

    match resolve_session(&app_state, raw_header.to_str().ok()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

async fn resolve_session(
    app_state: &AppState,
    header: Option<&str>,
) -> Result<AuthenticatedUser, BackendError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::warn!("[Auth] Invalid Authorization header format");
            BackendError::unauthorized("Invalid session")
        })?;

    let claims = app_state.session_keys.verify_token(token).map_err(|e| {
        tracing::warn!("[Auth] Invalid token: {:?}", e);
        BackendError::unauthorized("Session expired, please log in again")
    })?;

    let user = get_user_by_id(&app_state.db_pool, &claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] Token for missing user {}", claims.sub);
            BackendError::unauthorized("Account not found")
        })?;

    if user.role() == Role::Banned {
        tracing::warn!("[Auth] Banned user {} rejected", user.id);
        return Err(BackendError::forbidden(BANNED_MESSAGE));
    }

    Ok(AuthenticatedUser::from(user))
}

/// Extractor for handlers that require a session
///
/// Rejects with 401 when the request is anonymous.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| BackendError::unauthorized("Please log in first"))
    }
}

/// Extractor for handlers that serve both visitors and members
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl MaybeUser {
    pub fn role(&self) -> Option<Role> {
        self.0.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(AuthenticatedUser::is_admin)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}
