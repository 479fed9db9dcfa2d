/**
 * Authentication Handler Types
 *
 * Request and response bodies for the auth, profile and members endpoints.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;
use crate::backend::middleware::AuthenticatedUser;
use crate::shared::avatar::effective_photo;
use crate::shared::Role;

/// Sign up request
#[derive(Deserialize, Serialize, Debug)]
pub struct SignupRequest {
    /// Chosen username (3-30 chars, starts with a letter, alphanumeric + underscore)
    pub username: String,
    /// Password (at least 6 characters, hashed before storage)
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// The username used at sign-up (not the current display name)
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Auth response
///
/// Returned by signup and login handlers.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// Session token
    pub token: String,
    pub user: UserResponse,
}

/// User response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Stored photo or the generated initial avatar
    pub photo_url: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            photo_url: effective_photo(&user.photo_url, &user.username),
            role: user.role(),
        }
    }
}

impl From<&AuthenticatedUser> for UserResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.user_id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            photo_url: effective_photo(&user.photo_url, &user.username),
            role: user.role,
        }
    }
}

/// Display name change
#[derive(Deserialize, Serialize, Debug)]
pub struct RenameRequest {
    pub username: String,
}

/// Profile photo change. Empty restores the generated avatar.
#[derive(Deserialize, Serialize, Debug)]
pub struct PhotoRequest {
    #[serde(default)]
    pub photo_url: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Deserialize, Debug, Default)]
pub struct MemberQuery {
    pub search: Option<String>,
}
