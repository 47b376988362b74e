//! # Error Types

/// Errors produced by training, encoding, decoding and merge-file IO.
#[derive(Debug, thiserror::Error)]
pub enum BpeError {
    /// The tokenizer options are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A symbol id has no vocabulary entry.
    #[error("unknown symbol id: {0}")]
    UnknownSymbolId(u64),

    /// A merge id broke strict monotonic growth.
    #[error("invalid merge id: expected {expected}, found {found}")]
    InvalidMergeId {
        /// The only id that could have been recorded next.
        expected: u64,
        /// The id that was offered.
        found: u64,
    },

    /// A persisted merge file is malformed or violates the vocabulary invariants.
    #[error("corrupt vocabulary at line {line}: {reason}")]
    CorruptVocabulary {
        /// 1-based line number; 0 when the problem is not tied to a line.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Encode/decode called before training.
    #[error("tokenizer has not been trained")]
    NotTrained,

    /// Decoded bytes are not valid UTF-8.
    #[error("invalid UTF-8 in decoded bytes: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Underlying IO failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BpeError {
    /// Builds a [`BpeError::CorruptVocabulary`].
    pub fn corrupt<S: Into<String>>(
        line: usize,
        reason: S,
    ) -> Self {
        Self::CorruptVocabulary {
            line,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type BpeResult<T> = Result<T, BpeError>;
