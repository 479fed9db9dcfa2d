//! Game Library Module
//!
//! Games, emulation groups and the tag metadata document behind the
//! launcher. Reads are public; every write is admin only.
//!
//! # Module Structure
//!
//! ```text
//! library/
//! ├── mod.rs       - Module exports and documentation
//! ├── db.rs        - Game, group and metadata queries
//! ├── ordering.rs  - Manual order, then natural title order
//! ├── filter.rs    - Badges, tag auto-import and view filters
//! ├── metadata.rs  - Tag add/delete/rename/reorder
//! └── handlers.rs  - HTTP endpoints
//! ```

/// Library queries
pub mod db;

/// Sort order
pub mod ordering;

/// Badges and filters
pub mod filter;

/// Tag edits
pub mod metadata;

/// Library endpoints
pub mod handlers;

pub use handlers::load_snapshot;
pub use ordering::natural_cmp;
