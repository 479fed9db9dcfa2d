//! Tag metadata edits
//!
//! Pure operations on the `metadata` document and the games that carry a
//! tag. Handlers persist the result with `db::save_tag_change`, which
//! writes the games and the document in one transaction.

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::library::filter::derive_badge;
use crate::shared::{Game, LibraryMetadata};

/// Games whose tags (and therefore badge) changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChange {
    pub metadata: LibraryMetadata,
    pub games: Vec<Game>,
}

/// Move `items[from]` to position `to`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> BackendResult<()> {
    if from >= items.len() || to >= items.len() {
        return Err(BackendError::validation(
            "from",
            format!("Positions must be below {}", items.len()),
        ));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// Add a tag. Blank and already-present names leave the document as is.
///
/// Returns whether the tag was added.
pub fn add_tag(metadata: &mut LibraryMetadata, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() || metadata.categories.iter().any(|t| t == name) {
        return false;
    }
    metadata.categories.push(name.to_string());
    true
}

/// Remove a tag from the categories and the hierarchy, and optionally from
/// every game that carries it.
pub fn delete_tag(
    metadata: &LibraryMetadata,
    games: &[Game],
    name: &str,
    strip_from_games: bool,
) -> BackendResult<TagChange> {
    if !metadata.categories.iter().any(|t| t == name) {
        return Err(BackendError::not_found(format!("Unknown tag: {}", name)));
    }

    let mut metadata = metadata.clone();
    metadata.categories.retain(|t| t != name);
    metadata.hierarchy.remove(name);
    for children in metadata.hierarchy.values_mut() {
        children.retain(|c| c != name);
    }

    let games = if strip_from_games {
        games
            .iter()
            .filter(|g| g.has_tag(name))
            .map(|g| {
                let mut game = g.clone();
                game.tags.retain(|t| t != name);
                game.badge = derive_badge(&game.tags);
                game
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(TagChange { metadata, games })
}

/// Rename a tag and replace its children.
///
/// The new name replaces the old one in the categories, in every game's
/// tags, as a hierarchy key and wherever it appears as a child.
pub fn rename_tag(
    metadata: &LibraryMetadata,
    games: &[Game],
    old_name: &str,
    new_name: &str,
    children: &[String],
) -> BackendResult<TagChange> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(BackendError::validation("new_name", "Tag name required"));
    }

    let position = metadata
        .categories
        .iter()
        .position(|t| t == old_name)
        .ok_or_else(|| BackendError::not_found(format!("Unknown tag: {}", old_name)))?;

    let renaming = new_name != old_name;
    if renaming && metadata.categories.iter().any(|t| t == new_name) {
        return Err(BackendError::conflict(format!("Tag '{}' already exists", new_name)));
    }

    let mut metadata = metadata.clone();
    let mut changed_games = Vec::new();

    if renaming {
        metadata.categories[position] = new_name.to_string();

        if let Some(existing) = metadata.hierarchy.remove(old_name) {
            metadata.hierarchy.insert(new_name.to_string(), existing);
        }
        for list in metadata.hierarchy.values_mut() {
            for child in list.iter_mut() {
                if child == old_name {
                    *child = new_name.to_string();
                }
            }
        }

        changed_games = games
            .iter()
            .filter(|g| g.has_tag(old_name))
            .map(|g| {
                let mut game = g.clone();
                for tag in game.tags.iter_mut() {
                    if tag == old_name {
                        *tag = new_name.to_string();
                    }
                }
                game.badge = derive_badge(&game.tags);
                game
            })
            .collect();
    }

    let mut subs: Vec<String> = Vec::new();
    for child in children {
        let child = child.trim();
        if !child.is_empty() && child != new_name && !subs.iter().any(|s| s == child) {
            subs.push(child.to_string());
        }
    }
    metadata.hierarchy.insert(new_name.to_string(), subs);

    Ok(TagChange {
        metadata,
        games: changed_games,
    })
}
