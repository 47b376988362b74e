//! # BPE Vocab Trainer

use crate::codec::bytes_to_tokens;
use crate::errors::{BpeError, BpeResult};
use crate::training::merge_selector::{MergeCandidate, select_pair};
use crate::training::pair_counter::count_pairs;
use crate::training::rewriter::merge_in_place;
use crate::training::stop_signal::{NeverStop, StopSignal};
use crate::types::TokenType;
use crate::util::validators;
use crate::util::validators::U8_SIZE;
use crate::vocab::merge_table::{MergeRule, MergeTable};
use crate::vocab::vocabulary::Vocabulary;

/// Why a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All ``vocab_size - 256`` merges were performed.
    BudgetReached,

    /// No adjacent pairs remained before the budget was spent.
    Exhausted,

    /// The [`StopSignal`] fired.
    Cancelled,
}

/// A trainer for byte-level BPE vocabularies.
#[derive(Debug, Clone)]
pub struct BytePairTrainer {
    /// The vocab size.
    pub vocab_size: usize,
}

/// Training results.
#[derive(Debug, Clone)]
pub struct TrainResults<T: TokenType> {
    /// The corpus, compressed by every learned merge.
    pub tokens: Vec<T>,

    /// The learned vocabulary.
    pub vocab: Vocabulary<T>,

    /// The learned merge rules, in creation order.
    pub merges: MergeTable<T>,

    /// Why the merge loop ended.
    pub stop_reason: StopReason,
}

impl BytePairTrainer {
    /// Creates a new [`BytePairTrainer`].
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

    /// The maximum number of merges a run may perform.
    pub fn num_merges(&self) -> usize {
        self.vocab_size.saturating_sub(U8_SIZE)
    }

    /// Trains over a byte corpus, running until the budget is spent
    /// or no pairs remain.
    pub fn train_bytes<T: TokenType>(
        &self,
        corpus: &[u8],
    ) -> BpeResult<TrainResults<T>> {
        self.train_bytes_with_stop(corpus, &NeverStop)
    }

    /// Trains over a byte corpus, polling `stop` before each merge.
    ///
    /// A cancelled run still returns a valid model holding every merge
    /// completed before the signal fired.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, corpus, stop)))]
    pub fn train_bytes_with_stop<T, S>(
        &self,
        corpus: &[u8],
        stop: &S,
    ) -> BpeResult<TrainResults<T>>
    where
        T: TokenType,
        S: StopSignal + ?Sized,
    {
        let vocab_size = validators::try_vocab_size::<T>(self.vocab_size)?;
        let num_merges = vocab_size - U8_SIZE;
        log::info!(
            "Starting BPE training: {} merges to compute over {} bytes",
            num_merges,
            corpus.len()
        );

        let mut tokens: Vec<T> = bytes_to_tokens(corpus);
        let mut vocab: Vocabulary<T> = Vocabulary::new();
        let mut merges: MergeTable<T> = MergeTable::with_capacity(num_merges);

        let mut stop_reason = StopReason::BudgetReached;
        let mut last_log_percent = 0;

        for merges_done in 0..num_merges {
            if stop.should_stop() {
                log::info!("Training cancelled after {} merges", merges_done);
                stop_reason = StopReason::Cancelled;
                break;
            }

            let pair_counts = count_pairs(&tokens);
            let Some(MergeCandidate { pair, count }) = select_pair(&pair_counts) else {
                log::info!("No pairs left to merge after {} merges", merges_done);
                stop_reason = StopReason::Exhausted;
                break;
            };

            let new_token = vocab.next_token().ok_or_else(|| {
                BpeError::InvalidConfiguration(format!(
                    "token {} is not representable",
                    vocab.len()
                ))
            })?;

            merge_in_place(&mut tokens, pair, new_token);
            vocab.record(pair, new_token)?;
            merges.push(MergeRule::new(pair, new_token))?;

            log::debug!("Merge {:?} -> {} (frequency: {})", pair, new_token, count);

            // Log progress every 1%
            let current_percent = ((merges_done + 1) * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} -> {} (frequency: {})",
                    current_percent,
                    merges_done + 1,
                    num_merges,
                    pair,
                    new_token,
                    count
                );
                last_log_percent = current_percent;
            }
        }

        vocab.shrink_to_fit();
        merges.shrink_to_fit();

        log::info!(
            "Finished training: {} merges completed; {} bytes -> {} tokens",
            merges.len(),
            corpus.len(),
            tokens.len()
        );

        Ok(TrainResults {
            tokens,
            vocab,
            merges,
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::stop_signal::StopFn;
    use std::cell::Cell;

    const CLASSIC: &[u8] = b"aaabdaaabac";

    #[test]
    fn test_trainer_options() {
        let trainer = BytePairTrainer::new_with_vocab_size(1000);
        assert_eq!(trainer.vocab_size, 1000);
        assert_eq!(trainer.num_merges(), 744);

        let trainer = trainer.with_vocab_size(2000);
        assert_eq!(trainer.vocab_size, 2000);
        assert!(trainer.validate::<u32>().is_ok());

        assert!(matches!(
            BytePairTrainer::new_with_vocab_size(100).validate::<u32>(),
            Err(BpeError::InvalidConfiguration(_))
        ));
        assert_eq!(BytePairTrainer::new_with_vocab_size(100).num_merges(), 0);
    }

    #[test]
    fn test_classic_example() {
        type T = u32;
        let TrainResults {
            tokens,
            vocab,
            merges,
            stop_reason,
        } = BytePairTrainer::new_with_vocab_size(259)
            .train_bytes::<T>(CLASSIC)
            .unwrap();

        assert_eq!(stop_reason, StopReason::BudgetReached);
        assert_eq!(
            merges.rules(),
            &[
                // (a, a) is the unique maximum, frequency 4.
                MergeRule::new((97, 97), 256),
                // (97, 98) and (256, 97) tie at 2; the smaller pair wins.
                MergeRule::new((97, 98), 257),
                MergeRule::new((256, 257), 258),
            ]
        );
        assert_eq!(tokens, vec![258, 100, 258, 97, 99]);

        assert_eq!(vocab.len(), 259);
        assert_eq!(vocab.get(256), Some(b"aa".as_slice()));
        assert_eq!(vocab.get(257), Some(b"ab".as_slice()));
        assert_eq!(vocab.get(258), Some(b"aaab".as_slice()));
    }

    #[test]
    fn test_classic_example_step_by_step() {
        type T = u16;
        let trainer = BytePairTrainer::new_with_vocab_size(257);
        let results = trainer.train_bytes::<T>(CLASSIC).unwrap();
        assert_eq!(results.tokens, vec![256, 97, 98, 100, 256, 97, 98, 97, 99]);

        let results = trainer
            .with_vocab_size(258)
            .train_bytes::<T>(CLASSIC)
            .unwrap();
        assert_eq!(results.tokens, vec![256, 257, 100, 256, 257, 97, 99]);
    }

    #[test]
    fn test_empty_corpus() {
        type T = u32;
        let results = BytePairTrainer::new_with_vocab_size(300)
            .train_bytes::<T>(b"")
            .unwrap();

        assert!(results.tokens.is_empty());
        assert!(results.merges.is_empty());
        assert_eq!(results.vocab.len(), 256);
        assert_eq!(results.stop_reason, StopReason::Exhausted);
    }

    #[test]
    fn test_exhaustion() {
        type T = u32;
        // "abab" collapses to a single token after two merges.
        let results = BytePairTrainer::new_with_vocab_size(1000)
            .train_bytes::<T>(b"abab")
            .unwrap();

        assert_eq!(results.stop_reason, StopReason::Exhausted);
        assert_eq!(results.merges.len(), 2);
        assert_eq!(results.tokens, vec![257]);
        assert_eq!(results.vocab.get(257), Some(b"abab".as_slice()));
    }

    #[test]
    fn test_no_merge_budget() {
        type T = u32;
        let results = BytePairTrainer::new_with_vocab_size(256)
            .train_bytes::<T>(b"hello")
            .unwrap();

        assert_eq!(results.stop_reason, StopReason::BudgetReached);
        assert!(results.merges.is_empty());
        assert_eq!(results.tokens, vec![104, 101, 108, 108, 111]);
    }

    #[test]
    fn test_invalid_vocab_size() {
        assert!(matches!(
            BytePairTrainer::new_with_vocab_size(255).train_bytes::<u32>(b"abc"),
            Err(BpeError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BytePairTrainer::new_with_vocab_size(70_000).train_bytes::<u16>(b"abc"),
            Err(BpeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_cancellation() {
        type T = u32;
        let polls = Cell::new(0);
        let stop = StopFn(|| {
            polls.set(polls.get() + 1);
            polls.get() > 2
        });

        let results = BytePairTrainer::new_with_vocab_size(1000)
            .train_bytes_with_stop::<T, _>(b"the quick brown fox jumps over the lazy dog", &stop)
            .unwrap();

        assert_eq!(results.stop_reason, StopReason::Cancelled);
        assert_eq!(results.merges.len(), 2);
        assert_eq!(results.vocab.len(), 258);
    }

    #[test]
    fn test_determinism() {
        type T = u32;
        let corpus = b"it's not the heat, it's the humidity; it's not the heat, it's the salt";
        let trainer = BytePairTrainer::new_with_vocab_size(300);

        let a = trainer.train_bytes::<T>(corpus).unwrap();
        let b = trainer.train_bytes::<T>(corpus).unwrap();

        assert_eq!(a.merges, b.merges);
        assert_eq!(a.vocab, b.vocab);
        assert_eq!(a.tokens, b.tokens);
    }

    #[test]
    fn test_merge_invariants() {
        type T = u32;
        let corpus = "hello world, hello san francisco, hello hello".as_bytes();
        let results = BytePairTrainer::new_with_vocab_size(280)
            .train_bytes::<T>(corpus)
            .unwrap();

        for (idx, rule) in results.merges.iter().enumerate() {
            assert_eq!(rule.token as usize, 256 + idx);
            assert!(rule.pair.0 < rule.token);
            assert!(rule.pair.1 < rule.token);

            let mut expected = results.vocab.get(rule.pair.0).unwrap().to_vec();
            expected.extend_from_slice(results.vocab.get(rule.pair.1).unwrap());
            assert_eq!(results.vocab.get(rule.token), Some(expected.as_slice()));
        }
        assert!(results.merges.len() <= 280 - 256);
    }
}
