//! # Byte-Level BPE Tokenizer
//!
//! Learns a vocabulary of byte sequences by repeatedly merging the most
//! frequent adjacent pair, then replays the learned merges, in creation
//! order, to encode new input.
//!
//! # Training Example
//!
//! ```rust
//! use bytepair::tokenizer::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::<u32>::new_with_vocab_size(259)?;
//! let outcome = tokenizer.train(b"aaabdaaabac")?;
//! assert_eq!(outcome.tokens, vec![258, 100, 258, 97, 99]);
//!
//! let tokens = tokenizer.encode_str("aaab")?;
//! assert_eq!(tokens, vec![258]);
//! assert_eq!(tokenizer.decode_to_string(&tokens)?, "aaab");
//! # Ok::<(), bytepair::errors::BpeError>(())
//! ```
#![warn(missing_docs, unused)]

pub mod cleaner;
pub mod codec;
pub mod errors;
pub mod model;
pub mod tokenizer;
pub mod training;
pub mod types;
pub mod util;
pub mod vocab;

pub use errors::{BpeError, BpeResult};
pub use model::BpeModel;
pub use tokenizer::{Tokenizer, TokenizerOptions, TokenizerState, TrainOutcome};
