//! Shared Module
//!
//! Types and rules shared by the server and by anything that talks to it:
//! roles, feed and library types, realtime events, configuration. None of
//! it depends on the `ssr` feature.

pub mod event;

pub mod error;

pub mod config;

pub mod role;

pub mod avatar;

pub mod feed;

pub mod library;

pub use event::{RealtimeEvent, EventType};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use role::Role;
pub use feed::{FeedChannel, Post, PostKind, PollOption, Comment, Author};
pub use library::{Game, Group, LibraryMetadata, LibrarySnapshot};
