//! Authentication Module
//!
//! Accounts, sessions and the profile and members endpoints.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! ├── passwords.rs    - bcrypt hashing on the blocking pool
//! └── handlers/       - HTTP handlers
//!     ├── types.rs    - Request/response types
//!     ├── signup.rs   - Registration
//!     ├── login.rs    - Authentication
//!     ├── me.rs       - Current account
//!     ├── profile.rs  - Display name and photo
//!     └── members.rs  - Members sidebar and role changes
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: username + password → account created under
//!    `<username>@oasis.fake` → token returned
//! 2. **Login**: username + password → credentials verified → token returned
//! 3. **Requests**: `Authorization: Bearer <token>` → the session middleware
//!    reloads the account on every request
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs; the lifetime comes from `token_ttl_days`
//! - Unknown users and wrong passwords return the same 401
//! - Banned accounts are refused at login and on every request

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Password hashing
pub mod passwords;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, SignupRequest, UserResponse};
pub use handlers::{delete_me, get_me, login, rename, set_photo, signup};
pub use sessions::{Claims, SessionKeys};
