//! Library views
//!
//! Tag auto-import, hierarchy helpers and the game filters behind the
//! launcher's normal and emulation modes.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::shared::library::{ALL_TAG, BADGE_TAGS, EMULATION_TAG};
use crate::shared::{Game, Group};

/// Badge for a tag list: Heavy, then Medium, then Light, else empty.
pub fn derive_badge(tags: &[String]) -> String {
    BADGE_TAGS
        .iter()
        .find(|badge| tags.iter().any(|t| t == *badge))
        .map(|badge| badge.to_string())
        .unwrap_or_default()
}

/// Trim, drop blanks and duplicates, keep first-seen order.
pub fn dedupe_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Add every tag used by a game or group rule that the category list is
/// missing, plus "Emulation". The list is sorted only when something was
/// added, so a curated order survives otherwise.
///
/// Returns the categories and whether any were added.
pub fn auto_import_tags(categories: &[String], games: &[Game], groups: &[Group]) -> (Vec<String>, bool) {
    let mut tags = categories.to_vec();
    let mut added = false;

    let used = games
        .iter()
        .flat_map(|g| g.tags.iter())
        .chain(groups.iter().flat_map(|g| g.rules.iter()))
        .map(String::as_str)
        .chain(std::iter::once(EMULATION_TAG));

    for tag in used {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
            added = true;
        }
    }

    if added {
        tags.sort();
    }
    (tags, added)
}

/// Tags that never appear as anyone's child, sorted.
pub fn root_tags(tags: &[String], hierarchy: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    let children: BTreeSet<&str> = hierarchy.values().flatten().map(String::as_str).collect();
    let mut roots: Vec<String> = tags
        .iter()
        .filter(|t| !children.contains(t.as_str()))
        .cloned()
        .collect();
    roots.sort();
    roots
}

/// Sub-category ribbon for the active tag: its children that still exist.
pub fn ribbon(active_tag: &str, tags: &[String], hierarchy: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    if active_tag == ALL_TAG {
        return Vec::new();
    }
    hierarchy
        .get(active_tag)
        .map(|children| {
            children
                .iter()
                .filter(|child| tags.contains(*child))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Query of `GET /api/library/games`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameQuery {
    /// `normal` (default) or `emulation`
    pub mode: Option<String>,
    pub tag: Option<String>,
    pub child: Option<String>,
    pub q: Option<String>,
    /// Group id, for the emulation group view
    pub group: Option<String>,
}

impl GameQuery {
    pub fn is_emulation(&self) -> bool {
        self.mode.as_deref().map(str::trim) == Some("emulation")
    }

    /// The child tag when one is selected, else the tag, else "All".
    pub fn effective_tag(&self) -> &str {
        non_blank(self.child.as_deref())
            .or_else(|| non_blank(self.tag.as_deref()))
            .unwrap_or(ALL_TAG)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Normal-mode pool: live games outside emulation.
pub fn normal_pool(games: &[Game]) -> Vec<Game> {
    games
        .iter()
        .filter(|g| !g.is_deleted && !g.is_emulation())
        .cloned()
        .collect()
}

/// Emulation games sharing at least one tag with the group's rules.
pub fn group_pool(games: &[Game], group: &Group) -> Vec<Game> {
    games
        .iter()
        .filter(|g| {
            !g.is_deleted && g.is_emulation() && g.tags.iter().any(|t| group.rules.contains(t))
        })
        .cloned()
        .collect()
}

/// Normal-mode filter. A search query wins over tags.
pub fn filter_games(games: &[Game], query: &GameQuery) -> Vec<Game> {
    if let Some(q) = non_blank(query.q.as_deref()) {
        let needle = q.to_lowercase();
        return normal_pool(games)
            .into_iter()
            .filter(|g| g.title.to_lowercase().contains(&needle))
            .collect();
    }

    match query.effective_tag() {
        ALL_TAG => normal_pool(games),
        tag => games
            .iter()
            .filter(|g| !g.is_deleted && g.has_tag(tag))
            .cloned()
            .collect(),
    }
}
