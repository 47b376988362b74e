//! # Ordered Merge Table

use crate::errors::{BpeError, BpeResult};
use crate::types::{Pair, TokenType, token_to_u64};
use crate::util::validators::U8_SIZE;
use serde::{Deserialize, Serialize};

/// A single ``(left, right) -> token`` merge rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound(serialize = "T: TokenType", deserialize = "T: TokenType"))]
pub struct MergeRule<T: TokenType> {
    /// The adjacent pair replaced by this rule.
    pub pair: Pair<T>,

    /// The token the pair is replaced with.
    pub token: T,
}

impl<T: TokenType> MergeRule<T> {
    /// Creates a new rule.
    pub fn new(
        pair: Pair<T>,
        token: T,
    ) -> Self {
        Self { pair, token }
    }
}

/// Merge rules in creation order.
///
/// Rule tokens strictly increase, starting at 256.
/// Encoding must replay the rules in this order.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "RawMergeTable<T>",
    bound(serialize = "T: TokenType", deserialize = "T: TokenType")
)]
pub struct MergeTable<T: TokenType> {
    rules: Vec<MergeRule<T>>,
}

/// Unchecked wire form; every rule is replayed through [`MergeTable::push`].
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: TokenType"))]
struct RawMergeTable<T: TokenType> {
    rules: Vec<MergeRule<T>>,
}

impl<T: TokenType> TryFrom<RawMergeTable<T>> for MergeTable<T> {
    type Error = BpeError;

    fn try_from(raw: RawMergeTable<T>) -> BpeResult<Self> {
        let mut table = Self::with_capacity(raw.rules.len());
        for rule in raw.rules {
            table.push(rule)?;
        }
        Ok(table)
    }
}

impl<'a, T: TokenType> IntoIterator for &'a MergeTable<T> {
    type Item = &'a MergeRule<T>;
    type IntoIter = std::slice::Iter<'a, MergeRule<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl<T: TokenType> MergeTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates an empty table with room for `capacity` rules.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
        }
    }

    /// The number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules, in creation order.
    pub fn rules(&self) -> &[MergeRule<T>] {
        &self.rules
    }

    /// Iterate over the rules, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &MergeRule<T>> {
        self.rules.iter()
    }

    /// The token the next rule must carry.
    pub fn next_token_index(&self) -> usize {
        U8_SIZE + self.rules.len()
    }

    /// Appends a rule.
    ///
    /// Fails with [`BpeError::InvalidMergeId`] unless
    /// ``rule.token == 256 + self.len()``, and with
    /// [`BpeError::UnknownSymbolId`] if either half of the pair is not
    /// older than the rule's token.
    pub fn push(
        &mut self,
        rule: MergeRule<T>,
    ) -> BpeResult<()> {
        let expected = self.next_token_index();
        if rule.token.to_usize() != Some(expected) {
            return Err(BpeError::InvalidMergeId {
                expected: expected as u64,
                found: token_to_u64(rule.token),
            });
        }
        let (left, right) = rule.pair;
        for operand in [left, right] {
            if operand >= rule.token {
                return Err(BpeError::UnknownSymbolId(token_to_u64(operand)));
            }
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Shrinks the capacity of the underlying storage to fit its current size.
    pub fn shrink_to_fit(&mut self) {
        self.rules.shrink_to_fit();
    }
}
