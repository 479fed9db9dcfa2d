//! Community feed types
//!
//! Posts live in one of four channels. Two are chats (newest history,
//! shown oldest first), two are boards (pinned first, newest first).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;
use crate::shared::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedChannel {
    GeneralChat,
    Suggestions,
    Bugs,
    AdminChat,
}

impl FeedChannel {
    pub const ALL: [FeedChannel; 4] = [
        FeedChannel::Suggestions,
        FeedChannel::Bugs,
        FeedChannel::GeneralChat,
        FeedChannel::AdminChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedChannel::GeneralChat => "general_chat",
            FeedChannel::Suggestions => "suggestions",
            FeedChannel::Bugs => "bugs",
            FeedChannel::AdminChat => "admin_chat",
        }
    }

    pub fn is_chat(&self) -> bool {
        matches!(self, FeedChannel::GeneralChat | FeedChannel::AdminChat)
    }

    /// Whether reading and writing require an administrator.
    pub fn is_admin_only(&self) -> bool {
        matches!(self, FeedChannel::AdminChat)
    }

    /// Whether `role` may read this channel.
    pub fn readable_by(&self, role: Option<Role>) -> bool {
        !self.is_admin_only() || role.is_some_and(|r| r.is_admin())
    }
}

impl fmt::Display for FeedChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedChannel {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedChannel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| SharedError::validation("channel", format!("Unknown channel: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Text,
    Poll,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Text => "text",
            PostKind::Poll => "poll",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: u32,
    pub text: String,
    pub votes: u32,
}

/// Public view of a post or comment author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub channel: FeedChannel,
    pub text: String,
    /// Creation time, Unix milliseconds
    pub timestamp: i64,
    pub author: Author,
    pub reply_count: i64,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub is_deleted: bool,
    pub kind: PostKind,
    pub poll_options: Vec<PollOption>,
    /// Voter id to chosen option id
    pub voted_users: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub text: String,
    pub timestamp: i64,
    pub author: Author,
}

/// One row of a rendered poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollTally {
    pub option_id: u32,
    pub text: String,
    pub votes: u32,
    pub percent: u32,
}
