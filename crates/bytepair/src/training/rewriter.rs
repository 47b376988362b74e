//! Sequence Rewriting
//!
//! One merge pass replaces every non-overlapping occurrence of a pair,
//! scanning left to right. A match consumes both positions, so the run
//! ``[a, a, a]`` under ``(a, a)`` becomes ``[new, a]``.

use crate::types::{Pair, TokenType};

/// Returns `true` if `pair` occurs at any adjacent position.
pub fn contains_pair<T: TokenType>(
    tokens: &[T],
    pair: Pair<T>,
) -> bool {
    tokens.windows(2).any(|w| w[0] == pair.0 && w[1] == pair.1)
}

/// Rewrites `tokens` into a new sequence, replacing `pair` with `token`.
pub fn apply_merge<T: TokenType>(
    tokens: &[T],
    pair: Pair<T>,
    token: T,
) -> Vec<T> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() && tokens[i] == pair.0 && tokens[i + 1] == pair.1 {
            out.push(token);
            i += 2;
        } else {
            out.push(tokens[i]);
            i += 1;
        }
    }
    out
}

/// Rewrites `tokens` in place, replacing `pair` with `token`.
///
/// Same semantics as [`apply_merge`].
///
/// # Returns
/// The number of replacements made.
pub fn merge_in_place<T: TokenType>(
    tokens: &mut Vec<T>,
    pair: Pair<T>,
    token: T,
) -> usize {
    let len = tokens.len();
    let mut replaced = 0;
    let mut read = 0;
    let mut write = 0;
    while read < len {
        if read + 1 < len && tokens[read] == pair.0 && tokens[read + 1] == pair.1 {
            tokens[write] = token;
            read += 2;
            replaced += 1;
        } else {
            tokens[write] = tokens[read];
            read += 1;
        }
        write += 1;
    }
    tokens.truncate(write);
    replaced
}
