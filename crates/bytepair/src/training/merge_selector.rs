//! Merge Selection

use crate::types::{Pair, PairCounts, TokenType};
use core::cmp::{Ordering, Reverse};

/// Info about a [`Pair`] that could be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCandidate<T: TokenType> {
    /// The pair to merge.
    pub pair: Pair<T>,

    /// The number of positions at which the pair occurs.
    pub count: usize,
}

impl<T: TokenType> MergeCandidate<T> {
    /// The selection key.
    ///
    /// Max by count; tie-break to the smallest ``(left, right)`` pair.
    pub fn selection_key(&self) -> (usize, Reverse<Pair<T>>) {
        (self.count, Reverse(self.pair))
    }
}

impl<T: TokenType> PartialOrd for MergeCandidate<T> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType> Ord for MergeCandidate<T> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.selection_key().cmp(&other.selection_key())
    }
}

/// Picks the next pair to merge.
///
/// Returns `None` when there are no pairs.
/// The result does not depend on the iteration order of `pair_counts`.
pub fn select_pair<T: TokenType>(pair_counts: &PairCounts<T>) -> Option<MergeCandidate<T>> {
    pair_counts
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(&pair, &count)| MergeCandidate { pair, count })
        .max()
}
