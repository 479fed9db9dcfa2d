//! Property-based tests for poll voting

use std::collections::BTreeMap;

use oasis::backend::feed::poll::{apply_vote, build_options, tally};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_votes_match_distinct_voters(
        option_count in 2usize..=5,
        ballots in prop::collection::vec((0u32..6, 0u32..6), 0..40),
    ) {
        let raw: Vec<String> = (0..option_count).map(|i| format!("Option {}", i)).collect();
        let mut options = build_options(&raw).unwrap();
        let mut voters = BTreeMap::new();

        for (voter, option_id) in ballots {
            let result = apply_vote(&mut options, &mut voters, &format!("user-{}", voter), option_id);
            prop_assert_eq!(result.is_ok(), (option_id as usize) < option_count);
        }

        let total: u32 = options.iter().map(|o| o.votes).sum();
        prop_assert_eq!(total as usize, voters.len());
        for option in &options {
            let chosen = voters.values().filter(|v| **v == option.id).count();
            prop_assert_eq!(option.votes as usize, chosen);
        }
    }

    #[test]
    fn test_percentages_sum_to_about_100(votes in prop::collection::vec(0u32..1000, 2..=5)) {
        let raw: Vec<String> = (0..votes.len()).map(|i| format!("Option {}", i)).collect();
        let mut options = build_options(&raw).unwrap();
        for (option, count) in options.iter_mut().zip(&votes) {
            option.votes = *count;
        }

        let rows = tally(&options);
        let sum: u32 = rows.iter().map(|r| r.percent).sum();
        if votes.iter().all(|v| *v == 0) {
            prop_assert_eq!(sum, 0);
        } else {
            prop_assert!(sum.abs_diff(100) <= votes.len() as u32);
        }
    }

    #[test]
    fn test_options_outside_two_to_five_rejected(count in 0usize..10) {
        let raw: Vec<String> = (0..count).map(|i| format!("Choice {}", i)).collect();
        let built = build_options(&raw);
        prop_assert_eq!(built.is_ok(), (2..=5).contains(&count));
        if let Ok(options) = built {
            let ids: Vec<u32> = options.iter().map(|o| o.id).collect();
            prop_assert_eq!(ids, (0..count as u32).collect::<Vec<_>>());
        }
    }
}
