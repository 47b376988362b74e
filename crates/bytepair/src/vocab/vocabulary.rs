//! # Dense ``{ T -> Vec<u8> }`` Vocabulary

use crate::errors::{BpeError, BpeResult};
use crate::types::{Pair, TokenType, token_to_u64};
use crate::util::validators::U8_SIZE;
use core::fmt::Debug;

/// Converts a byte into its byte token.
pub fn byte_token<T: TokenType>(byte: u8) -> T {
    T::from_u8(byte).expect("every TokenType holds the u8 range")
}

/// Append-only token vocabulary, indexed densely by token.
///
/// Entries ``0..=255`` are the single bytes; every later entry is the
/// concatenation of the two entries of the pair that created it.
/// Entries are never removed or modified.
#[derive(Clone, PartialEq, Eq)]
pub struct Vocabulary<T: TokenType> {
    entries: Vec<Vec<u8>>,
    max_token: T,
}

impl<T: TokenType> Debug for Vocabulary<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("Vocabulary")
            .field("len", &self.len())
            .field("max_token", &self.max_token)
            .finish()
    }
}

impl<T: TokenType> Default for Vocabulary<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TokenType> Vocabulary<T> {
    /// Creates the base vocabulary of 256 single-byte entries.
    pub fn new() -> Self {
        Self {
            entries: (0..=u8::MAX).map(|b| vec![b]).collect(),
            max_token: byte_token(u8::MAX),
        }
    }

    /// The number of entries, including the 256 byte entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; the byte entries are always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of merge-created entries.
    pub fn merge_count(&self) -> usize {
        self.len() - U8_SIZE
    }

    /// The largest token present.
    pub fn max_token(&self) -> T {
        self.max_token
    }

    /// The only token [`Vocabulary::record`] will accept next.
    ///
    /// `None` if that token is not representable in `T`.
    pub fn next_token(&self) -> Option<T> {
        T::from_usize(self.len())
    }

    /// Is `token` present?
    pub fn contains(
        &self,
        token: T,
    ) -> bool {
        self.get(token).is_some()
    }

    /// Looks up the bytes of `token`.
    pub fn get(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        token
            .to_usize()
            .and_then(|idx| self.entries.get(idx))
            .map(Vec::as_slice)
    }

    /// Looks up the bytes of `token`, failing with [`BpeError::UnknownSymbolId`].
    pub fn try_get(
        &self,
        token: T,
    ) -> BpeResult<&[u8]> {
        self.get(token)
            .ok_or_else(|| BpeError::UnknownSymbolId(token_to_u64(token)))
    }

    /// Iterate over ``(token, bytes)`` in token order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &[u8])> + '_ {
        self.entries.iter().enumerate().filter_map(|(idx, bytes)| {
            T::from_usize(idx).map(|token| (token, bytes.as_slice()))
        })
    }

    /// Records ``token -> vocab[left] ++ vocab[right]``.
    ///
    /// `token` must be exactly one greater than [`Vocabulary::max_token`],
    /// and both halves of `pair` must already be present.
    /// On error the vocabulary is unchanged.
    pub fn record(
        &mut self,
        pair: Pair<T>,
        token: T,
    ) -> BpeResult<()> {
        let expected = self.len();
        if token.to_usize() != Some(expected) {
            return Err(BpeError::InvalidMergeId {
                expected: expected as u64,
                found: token_to_u64(token),
            });
        }

        let (left, right) = pair;
        let left = self.try_get(left)?;
        let right = self.try_get(right)?;

        let mut bytes = Vec::with_capacity(left.len() + right.len());
        bytes.extend_from_slice(left);
        bytes.extend_from_slice(right);

        self.entries.push(bytes);
        self.max_token = token;
        Ok(())
    }

    /// Shrinks the capacity of the underlying storage to fit its current size.
    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }
}
