//! Pair Frequency Counting

use crate::types::{Pair, PairCounts, TokenType};

/// Iterate over the adjacent pairs of a token sequence.
pub fn pairs_iter<T: TokenType>(tokens: &[T]) -> impl Iterator<Item = Pair<T>> + '_ {
    tokens.windows(2).map(|w| (w[0], w[1]))
}

/// Counts every adjacent ``(tokens[i], tokens[i + 1])`` pair.
///
/// Sequences shorter than 2 yield an empty map.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(tokens)))]
pub fn count_pairs<T: TokenType>(tokens: &[T]) -> PairCounts<T> {
    let mut pair_counts = PairCounts::with_capacity(tokens.len().min(1 << 16));
    observe_pairs(&mut pair_counts, tokens);
    pair_counts
}

/// Adds the adjacent pairs of `tokens` into `pair_counts`.
pub fn observe_pairs<T: TokenType>(
    pair_counts: &mut PairCounts<T>,
    tokens: &[T],
) {
    for p in pairs_iter(tokens) {
        *pair_counts.entry(p).or_default() += 1;
    }
}
