//! Game library types
//!
//! Games, groups and the tag metadata document, as stored and as sent to
//! clients (the REST API and the launcher payload).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag marking games that only appear inside groups in emulation mode.
pub const EMULATION_TAG: &str = "Emulation";

/// Pseudo-tag meaning "no tag filter".
pub const ALL_TAG: &str = "All";

/// Badge tags in descending precedence.
pub const BADGE_TAGS: [&str; 3] = ["Heavy", "Medium", "Light"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub title: String,
    pub img: String,
    pub url: String,
    pub tags: Vec<String>,
    /// One of [`BADGE_TAGS`] or empty, derived from `tags`
    pub badge: String,
    /// Manual position; games without one sort after those with one
    pub order_index: Option<i64>,
    pub is_deleted: bool,
}

impl Game {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_emulation(&self) -> bool {
        self.has_tag(EMULATION_TAG)
    }
}

/// Emulation group: a tile in emulation mode listing the Emulation games
/// that share a tag with its rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    pub img: String,
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Group create/update body. Older clients send a single `rule`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl GroupInput {
    /// `rules`, or `[rule]` when only the legacy field is set. Blank
    /// entries are dropped.
    pub fn normalized_rules(&self) -> Vec<String> {
        let source: Vec<&String> = if self.rules.is_empty() {
            self.rule.iter().collect()
        } else {
            self.rules.iter().collect()
        };
        let mut out: Vec<String> = Vec::new();
        for rule in source {
            let rule = rule.trim();
            if !rule.is_empty() && !out.iter().any(|r| r == rule) {
                out.push(rule.to_string());
            }
        }
        out
    }
}

/// The `metadata` system document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryMetadata {
    /// Ordered tag list shown in the dropdown and admin explorer
    #[serde(default)]
    pub categories: Vec<String>,
    /// Parent tag to its sub-categories
    #[serde(default)]
    pub hierarchy: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub badges: Vec<String>,
}

impl Default for LibraryMetadata {
    fn default() -> Self {
        Self {
            categories: vec![EMULATION_TAG.to_string()],
            hierarchy: BTreeMap::new(),
            badges: BADGE_TAGS.iter().rev().map(|b| b.to_string()).collect(),
        }
    }
}

/// Everything the launcher and the library API hand to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    pub games: Vec<Game>,
    pub groups: Vec<Group>,
    pub tags: Vec<String>,
    pub hierarchy: BTreeMap<String, Vec<String>>,
    pub badges: Vec<String>,
}
