//! # Tokenizer Facade
//!
//! A [`Tokenizer`] moves through `Untrained -> Training -> Trained`.
//! `Training` lasts exactly as long as the `&mut self` borrow taken by
//! [`Tokenizer::train`], so no other caller can observe it and
//! [`TokenizerState`] only reports the two resting states. Re-training
//! from `Trained` passes through `Training` again and installs a fresh
//! model when the run returns.

use crate::cleaner::{CleanOptions, TextCleaner};
use crate::errors::{BpeError, BpeResult};
use crate::model::BpeModel;
use crate::training::stop_signal::{NeverStop, StopSignal};
use crate::training::trainer::{BytePairTrainer, StopReason};
use crate::types::TokenType;
use crate::util::validators;
use crate::util::validators::U8_SIZE;
use crate::vocab::io::{
    load_model_from_path, load_model_from_reader, save_merges_to_path, save_merges_to_writer,
};
use crate::vocab::merge_table::MergeTable;
use crate::vocab::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::Path;

/// Options for a [`Tokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerOptions {
    /// The target vocab size, including the 256 byte tokens.
    pub vocab_size: usize,
}

impl TokenizerOptions {
    /// Creates options for the given vocab size.
    ///
    /// # Arguments
    /// * `vocab_size` - The desired vocabulary size; must be >= 256 (the size of the u8 space).
    pub fn new_with_vocab_size(vocab_size: usize) -> Self {
        Self { vocab_size }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size }
    }

    /// Validates the options for token type `T`.
    pub fn validate<T: TokenType>(&self) -> BpeResult<()> {
        validators::try_vocab_size::<T>(self.vocab_size)?;
        Ok(())
    }

    /// The trainer these options describe.
    pub fn trainer(&self) -> BytePairTrainer {
        BytePairTrainer::new_with_vocab_size(self.vocab_size)
    }
}

/// Observable tokenizer state.
///
/// Training runs inside a `&mut` borrow, so it is never observed mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerState {
    /// No model yet; encode/decode fail with [`BpeError::NotTrained`].
    Untrained,

    /// A model is available.
    Trained,
}

/// What a [`Tokenizer::train`] call produced besides the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainOutcome<T: TokenType> {
    /// The training corpus, compressed by every learned merge.
    pub tokens: Vec<T>,

    /// The number of merges learned.
    pub merges_done: usize,

    /// Why training stopped.
    pub stop_reason: StopReason,
}

/// Byte-level BPE tokenizer.
///
/// Owns one [`BpeModel`] once trained. Re-training replaces the model
/// wholesale; nothing carries over from a previous run.
#[derive(Debug, Clone)]
pub struct Tokenizer<T: TokenType> {
    options: TokenizerOptions,
    model: Option<BpeModel<T>>,
}

impl<T: TokenType> Tokenizer<T> {
    /// Creates an untrained tokenizer.
    ///
    /// Fails with [`BpeError::InvalidConfiguration`] if the options are invalid.
    pub fn new(options: TokenizerOptions) -> BpeResult<Self> {
        options.validate::<T>()?;
        Ok(Self {
            options,
            model: None,
        })
    }

    /// Creates an untrained tokenizer with the given vocab size.
    pub fn new_with_vocab_size(vocab_size: usize) -> BpeResult<Self> {
        Self::new(TokenizerOptions::new_with_vocab_size(vocab_size))
    }

    /// Creates a trained tokenizer from an existing model.
    ///
    /// The vocab size is taken from the model.
    pub fn from_model(model: BpeModel<T>) -> Self {
        Self {
            options: TokenizerOptions::new_with_vocab_size(model.vocab_size()),
            model: Some(model),
        }
    }

    /// Creates a trained tokenizer by replaying a merge table.
    pub fn from_merge_table(merges: MergeTable<T>) -> BpeResult<Self> {
        Ok(Self::from_model(BpeModel::from_merge_table(merges)?))
    }

    /// The options.
    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    /// The current state.
    pub fn state(&self) -> TokenizerState {
        match self.model {
            Some(_) => TokenizerState::Trained,
            None => TokenizerState::Untrained,
        }
    }

    /// Has a model been trained or loaded?
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// The trained model.
    pub fn model(&self) -> BpeResult<&BpeModel<T>> {
        self.model.as_ref().ok_or(BpeError::NotTrained)
    }

    /// The trained vocabulary.
    pub fn vocab(&self) -> BpeResult<&Vocabulary<T>> {
        self.model().map(BpeModel::vocab)
    }

    /// The trained merge rules.
    pub fn merges(&self) -> BpeResult<&MergeTable<T>> {
        self.model().map(BpeModel::merges)
    }

    /// Trains on a byte corpus, replacing any previous model.
    pub fn train<B: AsRef<[u8]>>(
        &mut self,
        corpus: B,
    ) -> BpeResult<TrainOutcome<T>> {
        self.train_with_stop(corpus, &NeverStop)
    }

    /// Trains on a byte corpus, polling `stop` once per merge.
    ///
    /// The previous model is kept if training fails. A cancelled run still
    /// installs the partial model built so far.
    pub fn train_with_stop<B, S>(
        &mut self,
        corpus: B,
        stop: &S,
    ) -> BpeResult<TrainOutcome<T>>
    where
        B: AsRef<[u8]>,
        S: StopSignal + ?Sized,
    {
        let mut results = self
            .options
            .trainer()
            .train_bytes_with_stop::<T, S>(corpus.as_ref(), stop)?;

        let outcome = TrainOutcome {
            tokens: std::mem::take(&mut results.tokens),
            merges_done: results.merges.len(),
            stop_reason: results.stop_reason,
        };
        self.model = Some(results.into());

        Ok(outcome)
    }

    /// Cleans `raw` with `cleaner`, then trains on the UTF-8 bytes of the result.
    pub fn train_text<C: TextCleaner + ?Sized>(
        &mut self,
        raw: &str,
        cleaner: &C,
        options: &CleanOptions,
    ) -> BpeResult<TrainOutcome<T>> {
        let cleaned = cleaner.clean(raw, options);
        self.train(cleaned.as_bytes())
    }

    /// Encodes bytes into tokens.
    pub fn encode<B: AsRef<[u8]>>(
        &self,
        bytes: B,
    ) -> BpeResult<Vec<T>> {
        Ok(self.model()?.encode(bytes))
    }

    /// Encodes the UTF-8 bytes of `text` into tokens.
    pub fn encode_str(
        &self,
        text: &str,
    ) -> BpeResult<Vec<T>> {
        self.encode(text.as_bytes())
    }

    /// Decodes tokens into bytes.
    pub fn decode<S: AsRef<[T]>>(
        &self,
        tokens: S,
    ) -> BpeResult<Vec<u8>> {
        self.model()?.decode(tokens)
    }

    /// Decodes tokens into a string.
    pub fn decode_to_string<S: AsRef<[T]>>(
        &self,
        tokens: S,
    ) -> BpeResult<String> {
        self.model()?.decode_to_string(tokens)
    }

    /// Saves the merge rules to a merge file.
    pub fn save_to_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> BpeResult<()> {
        save_merges_to_path(self.merges()?, path)
    }

    /// Saves the merge rules to a writer.
    pub fn save_to_writer<W: Write>(
        &self,
        writer: &mut W,
    ) -> BpeResult<()> {
        save_merges_to_writer(self.merges()?, writer)
    }

    /// Loads a trained tokenizer from a merge file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> BpeResult<Self> {
        load_model_from_path(path).map(Self::from_model)
    }

    /// Loads a trained tokenizer from a merge file stream.
    pub fn load_from_reader<R: BufRead>(reader: R) -> BpeResult<Self> {
        load_model_from_reader(reader).map(Self::from_model)
    }

    /// The number of merges the options allow.
    pub fn merge_budget(&self) -> usize {
        self.options.vocab_size.saturating_sub(U8_SIZE)
    }
}
