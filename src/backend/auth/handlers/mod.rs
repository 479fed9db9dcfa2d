//! Authentication Handlers Module
//!
//! # Handlers
//!
//! - **`signup`** - POST /api/auth/signup
//! - **`login`** - POST /api/auth/login
//! - **`get_me`** - GET /api/auth/me
//! - **`delete_me`** - DELETE /api/auth/me
//! - **`rename`** - PATCH /api/auth/me/username
//! - **`set_photo`** - PUT /api/auth/me/photo
//! - **`members::list`** - GET /api/users
//! - **`members::set_role`** - PATCH /api/users/{id}/role

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login handler
pub mod login;

/// Current user handlers
pub mod me;

/// Display name and photo handlers
pub mod profile;

/// Members sidebar and role management
pub mod members;

pub use types::{AuthResponse, LoginRequest, SignupRequest, UserResponse};

pub use login::login;
pub use me::{delete_me, get_me};
pub use profile::{rename, set_photo};
pub use signup::signup;
