//! Validators for various configuration options.
use crate::errors::{BpeError, BpeResult};
use crate::types::TokenType;

/// The size of the u8 space.
pub const U8_SIZE: usize = 256;

/// Validates and returns the vocabulary size.
///
/// The size must be at least the size of the u8 space,
/// and the largest id (``vocab_size - 1``) must be representable in `T`.
pub fn try_vocab_size<T: TokenType>(vocab_size: usize) -> BpeResult<usize> {
    if vocab_size < U8_SIZE {
        return Err(BpeError::InvalidConfiguration(format!(
            "vocab_size ({vocab_size}) must be >= {U8_SIZE} (the size of the u8 space)"
        )));
    }
    if T::from_usize(vocab_size - 1).is_none() {
        return Err(BpeError::InvalidConfiguration(format!(
            "vocab_size ({vocab_size}) exceeds the range of {}",
            std::any::type_name::<T>()
        )));
    }
    Ok(vocab_size)
}
