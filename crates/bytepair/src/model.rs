//! # Trained BPE Model
//!
//! A [`Vocabulary`] paired with the [`MergeTable`] that produced it.
//! Encoding replays the merge rules in creation order; decoding
//! concatenates vocabulary entries.

use crate::codec::{bytes_to_tokens, tokens_to_bytes};
use crate::errors::BpeResult;
use crate::training::rewriter::{contains_pair, merge_in_place};
use crate::training::trainer::TrainResults;
use crate::types::TokenType;
use crate::vocab::merge_table::{MergeRule, MergeTable};
use crate::vocab::vocabulary::Vocabulary;

/// Learned BPE state: vocabulary plus ordered merge rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BpeModel<T: TokenType> {
    vocab: Vocabulary<T>,
    merges: MergeTable<T>,
}

impl<T: TokenType> From<TrainResults<T>> for BpeModel<T> {
    fn from(results: TrainResults<T>) -> Self {
        Self {
            vocab: results.vocab,
            merges: results.merges,
        }
    }
}

impl<T: TokenType> BpeModel<T> {
    /// The base model: 256 byte entries, no merges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a model by replaying each rule of `merges` in order.
    ///
    /// Fails if any rule breaks monotonic growth or references a token
    /// that does not exist yet.
    pub fn from_merge_table(merges: MergeTable<T>) -> BpeResult<Self> {
        let mut model = Self::new();
        for rule in merges.iter() {
            model.push_rule(*rule)?;
        }
        Ok(model)
    }

    /// Appends one merge rule, extending the vocabulary.
    ///
    /// On error the model is unchanged.
    pub fn push_rule(
        &mut self,
        rule: MergeRule<T>,
    ) -> BpeResult<()> {
        self.vocab.record(rule.pair, rule.token)?;
        self.merges.push(rule)
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Vocabulary<T> {
        &self.vocab
    }

    /// The merge rules, in creation order.
    pub fn merges(&self) -> &MergeTable<T> {
        &self.merges
    }

    /// The number of vocabulary entries.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Encodes bytes into tokens.
    ///
    /// Starts from byte tokens, then walks the merge rules in creation
    /// order; a rule whose pair no longer occurs is skipped.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, bytes)))]
    pub fn encode<B: AsRef<[u8]>>(
        &self,
        bytes: B,
    ) -> Vec<T> {
        let mut tokens: Vec<T> = bytes_to_tokens(bytes);
        for rule in &self.merges {
            if tokens.len() < 2 {
                break;
            }
            if contains_pair(&tokens, rule.pair) {
                merge_in_place(&mut tokens, rule.pair, rule.token);
            }
        }
        tokens
    }

    /// Decodes tokens into bytes.
    pub fn decode<S: AsRef<[T]>>(
        &self,
        tokens: S,
    ) -> BpeResult<Vec<u8>> {
        tokens_to_bytes(tokens, &self.vocab)
    }

    /// Decodes tokens into a string.
    pub fn decode_to_string<S: AsRef<[T]>>(
        &self,
        tokens: S,
    ) -> BpeResult<String> {
        Ok(String::from_utf8(self.decode(tokens)?)?)
    }

    /// Decodes a batch of token sequences.
    pub fn decode_batch(
        &self,
        batch: &[Vec<T>],
    ) -> BpeResult<Vec<Vec<u8>>> {
        batch.iter().map(|t| self.decode(t)).collect()
    }

    /// Encodes a batch of byte sequences.
    pub fn encode_batch<B: AsRef<[u8]>>(
        &self,
        batch: &[B],
    ) -> Vec<Vec<T>> {
        batch.iter().map(|b| self.encode(b)).collect()
    }

    /// The longest vocabulary entry, as ``(token, bytes)``.
    ///
    /// Ties resolve to the smallest token.
    pub fn longest_token(&self) -> (T, &[u8]) {
        let mut best = (self.vocab.max_token(), &[][..]);
        for (token, bytes) in self.vocab.iter() {
            if bytes.len() > best.1.len() {
                best = (token, bytes);
            }
        }
        best
    }
}
