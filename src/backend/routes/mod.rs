//! Route Configuration Module
//!
//! Configures all HTTP routes for the backend server, grouped by area.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports and documentation
//! ├── router.rs          - Main router creation and layers
//! ├── api_routes.rs      - Accounts, members, realtime, changelog, launcher
//! ├── feed_routes.rs     - Chat, boards, comments, polls, garbage bin
//! └── library_routes.rs  - Games, groups and tags
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use oasis::backend::routes::create_router;
//! use oasis::backend::server::build_state;
//!
//! let state = build_state(config).await?;
//! let app = create_router(state);
//! ```

/// Main router creation
pub mod router;

/// Account and miscellaneous API routes
pub mod api_routes;

/// Feed routes
pub mod feed_routes;

/// Library routes
pub mod library_routes;

pub use router::create_router;
