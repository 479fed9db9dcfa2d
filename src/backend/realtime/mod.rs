//! Real-time Update Module
//!
//! Server-Sent Events stream that replaces the hosted database's snapshot
//! listeners. Every write handler publishes a small event naming what
//! changed; clients refetch the affected resource through the REST API.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - Event broadcasting utilities
//! └── subscription.rs - SSE subscription handler
//! ```
//!
//! # Event Types
//!
//! - `feed` - post created, edited, moderated, voted on, restored or purged
//! - `comment` - comment added, edited or removed
//! - `library` - game or group changed
//! - `metadata` - tags or hierarchy changed
//! - `changelog` - changelog saved
//! - `users` - account joined, renamed, re-photographed, re-roled or deleted
//!
//! # Event Filtering
//!
//! - `?types=feed,comment` - Subscribe to feed and comment events
//! - No parameter - Subscribe to all event types

/// Event broadcasting utilities
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

pub use broadcast::{broadcast_event, RealtimeEventBroadcast};
pub use subscription::handle_realtime_subscription;
