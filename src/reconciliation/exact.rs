//! Exact matching on (date, debit, credit)

use std::collections::{HashMap, VecDeque};

use crate::normalize::NormalizedTable;
use crate::types::ExactKey;

/// Row indices left over after one-to-one matching
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactMatchOutput {
    /// Left rows with no partner, in source order
    pub left_only: Vec<usize>,
    /// Right rows with no partner, in source order
    pub right_only: Vec<usize>,
    /// Number of (left, right) pairs consumed
    pub matched: usize,
}

/// Outer comparison on the canonical key.
///
/// Each left row consumes at most one right row with the same key, so
/// duplicates are matched as a multiset: two equal rows on the left against
/// one on the right leave one left row unmatched. Among equal-key candidates
/// the earliest unconsumed right row is taken.
pub fn match_exact(left: &NormalizedTable, right: &NormalizedTable) -> ExactMatchOutput {
    let mut pending: HashMap<ExactKey, VecDeque<usize>> = HashMap::new();
    for (index, row) in right.rows.iter().enumerate() {
        pending.entry(row.exact_key()).or_default().push_back(index);
    }

    let mut right_used = vec![false; right.rows.len()];
    let mut output = ExactMatchOutput::default();

    for (index, row) in left.rows.iter().enumerate() {
        match pending.get_mut(&row.exact_key()).and_then(VecDeque::pop_front) {
            Some(partner) => {
                right_used[partner] = true;
                output.matched += 1;
            }
            None => output.left_only.push(index),
        }
    }

    output.right_only = right_used
        .iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(index, _)| index)
        .collect();

    output
}
