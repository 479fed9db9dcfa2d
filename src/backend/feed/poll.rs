//! Poll rules
//!
//! Option building, vote application and tallying. Everything here is pure;
//! `db::record_vote` runs `apply_vote` inside a transaction.

use std::collections::BTreeMap;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::feed::{PollOption, PollTally};

pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The voter re-selected their current option
    Unchanged,
    Cast,
    /// The voter moved from another option
    Changed { from: u32 },
}

/// Turn raw option texts into poll options with ids `0..n` and no votes.
/// Blank entries are dropped before counting.
pub fn build_options(raw: &[String]) -> BackendResult<Vec<PollOption>> {
    let texts: Vec<&str> = raw
        .iter()
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    if texts.len() < MIN_POLL_OPTIONS {
        return Err(BackendError::validation("poll_options", "Min 2 options required"));
    }
    if texts.len() > MAX_POLL_OPTIONS {
        return Err(BackendError::validation("poll_options", "Max 5 options allowed"));
    }

    Ok(texts
        .into_iter()
        .enumerate()
        .map(|(id, text)| PollOption {
            id: id as u32,
            text: text.to_string(),
            votes: 0,
        })
        .collect())
}

pub fn apply_vote(
    options: &mut [PollOption],
    voters: &mut BTreeMap<String, u32>,
    voter_id: &str,
    option_id: u32,
) -> BackendResult<VoteOutcome> {
    if !options.iter().any(|option| option.id == option_id) {
        return Err(BackendError::validation("option_id", "Unknown poll option"));
    }

    let previous = voters.get(voter_id).copied();
    if previous == Some(option_id) {
        return Ok(VoteOutcome::Unchanged);
    }

    for option in options.iter_mut() {
        if Some(option.id) == previous {
            option.votes = option.votes.saturating_sub(1);
        }
        if option.id == option_id {
            option.votes += 1;
        }
    }
    voters.insert(voter_id.to_string(), option_id);

    Ok(match previous {
        Some(from) => VoteOutcome::Changed { from },
        None => VoteOutcome::Cast,
    })
}

/// Per-option share of the vote, rounded to whole percent. All zero when
/// nobody has voted.
pub fn tally(options: &[PollOption]) -> Vec<PollTally> {
    let total: u64 = options.iter().map(|option| u64::from(option.votes)).sum();

    options
        .iter()
        .map(|option| PollTally {
            option_id: option.id,
            text: option.text.clone(),
            votes: option.votes,
            percent: if total == 0 {
                0
            } else {
                (f64::from(option.votes) / total as f64 * 100.0).round() as u32
            },
        })
        .collect()
}
