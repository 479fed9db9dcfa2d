/**
 * Real-time Event System
 *
 * Events pushed to `/realtime` subscribers whenever portal state changes.
 * Payloads identify *what* changed (channel, ids, action) and never carry
 * post bodies, so the public stream cannot leak admin chat content; clients
 * refetch through the REST API.
 */
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Post created, edited, moderated or voted on
    Feed,
    /// Comment added, edited or removed
    Comment,
    /// Game or group changed
    Library,
    /// Tags or tag hierarchy changed
    Metadata,
    /// Changelog document saved
    Changelog,
    /// Profile or role changed
    Users,
    Custom(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Feed => "feed",
            Self::Comment => "comment",
            Self::Library => "library",
            Self::Metadata => "metadata",
            Self::Changelog => "changelog",
            Self::Users => "users",
            Self::Custom(name) => name,
        }
    }

    /// Parse a name from a `?types=` filter. Unknown names become custom
    /// event types; blank names are ignored.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "" => None,
            "feed" => Some(Self::Feed),
            "comment" => Some(Self::Comment),
            "library" => Some(Self::Library),
            "metadata" => Some(Self::Metadata),
            "changelog" => Some(Self::Changelog),
            "users" => Some(Self::Users),
            _ => Some(Self::Custom(name)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("empty event type"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    pub event_type: EventType,
    pub payload: serde_json::Value,
    pub timestamp: String,
    pub version: Option<String>,
}

impl RealtimeEvent {
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: None,
        }
    }

    pub fn feed(channel: &str, post_id: &str, action: &str) -> Self {
        Self::new(
            EventType::Feed,
            serde_json::json!({
                "channel": channel,
                "post_id": post_id,
                "action": action,
            }),
        )
    }

    pub fn comment(channel: &str, post_id: &str, comment_id: &str, action: &str) -> Self {
        Self::new(
            EventType::Comment,
            serde_json::json!({
                "channel": channel,
                "post_id": post_id,
                "comment_id": comment_id,
                "action": action,
            }),
        )
    }

    pub fn library(kind: &str, id: &str, action: &str) -> Self {
        Self::new(
            EventType::Library,
            serde_json::json!({
                "kind": kind,
                "id": id,
                "action": action,
            }),
        )
    }

    pub fn metadata(action: &str) -> Self {
        Self::new(EventType::Metadata, serde_json::json!({ "action": action }))
    }

    pub fn changelog() -> Self {
        Self::new(EventType::Changelog, serde_json::json!({ "action": "saved" }))
    }

    pub fn users(user_id: &str, action: &str) -> Self {
        Self::new(
            EventType::Users,
            serde_json::json!({
                "user_id": user_id,
                "action": action,
            }),
        )
    }

    pub fn with_version(mut self, version: String) -> Self {
        self.version = Some(version);
        self
    }
}
