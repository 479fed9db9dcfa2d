//! Community Feed Module
//!
//! Four channels share one `posts` table:
//!
//! - `general_chat` and `admin_chat` are chats: the newest history, shown
//!   oldest first
//! - `suggestions` and `bugs` are boards: pinned first, then newest first,
//!   with polls, locking and comment threads
//!
//! Deleting a post only sets `is_deleted`; admins restore or purge it from
//! the garbage bin.
//!
//! # Module Structure
//!
//! ```text
//! feed/
//! ├── mod.rs       - Module exports and documentation
//! ├── db.rs        - Post and comment queries
//! ├── poll.rs      - Poll options, votes and tallies
//! ├── handlers.rs  - Post endpoints and permission checks
//! ├── comments.rs  - Comment endpoints
//! └── garbage.rs   - Garbage bin endpoints
//! ```

/// Post and comment queries
pub mod db;

/// Poll rules
pub mod poll;

/// Post endpoints
pub mod handlers;

/// Comment endpoints
pub mod comments;

/// Garbage bin
pub mod garbage;

pub use garbage::collect_garbage;
pub use handlers::MAX_TEXT_CHARS;
