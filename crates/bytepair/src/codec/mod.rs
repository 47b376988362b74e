//! # Byte Codec
//!
//! Maps raw bytes to byte tokens, and token sequences back to bytes.

use crate::errors::BpeResult;
use crate::types::TokenType;
use crate::vocab::vocabulary::{Vocabulary, byte_token};

/// Maps each byte to the byte token of the same value.
///
/// A `&str` maps through its UTF-8 bytes.
pub fn bytes_to_tokens<T: TokenType, B: AsRef<[u8]>>(bytes: B) -> Vec<T> {
    bytes.as_ref().iter().map(|&b| byte_token(b)).collect()
}

/// Appends ``vocab[t]`` for each token to `buf`.
///
/// Tokens are consumed in order; on an unknown token, `buf` holds the bytes
/// of every token before it.
pub fn append_token_bytes<T: TokenType>(
    tokens: &[T],
    vocab: &Vocabulary<T>,
    buf: &mut Vec<u8>,
) -> BpeResult<()> {
    for &t in tokens {
        buf.extend_from_slice(vocab.try_get(t)?);
    }
    Ok(())
}

/// Concatenates ``vocab[t]`` for each token.
///
/// Fails with [`crate::errors::BpeError::UnknownSymbolId`] on the first
/// token with no vocabulary entry.
pub fn tokens_to_bytes<T: TokenType, S: AsRef<[T]>>(
    tokens: S,
    vocab: &Vocabulary<T>,
) -> BpeResult<Vec<u8>> {
    let tokens = tokens.as_ref();
    let mut buf = Vec::with_capacity(tokens.len() * 2);
    append_token_bytes(tokens, vocab, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BpeError;

    #[test]
    fn test_bytes_to_tokens() {
        type T = u32;
        assert_eq!(bytes_to_tokens::<T, _>(b""), Vec::<T>::new());
        assert_eq!(
            bytes_to_tokens::<T, _>([0_u8, 97, 255]),
            vec![0_u32, 97, 255]
        );
        assert_eq!(bytes_to_tokens::<T, _>("hé"), vec![104, 0xc3, 0xa9]);
    }

    #[test]
    fn test_tokens_to_bytes() {
        type T = u16;
        let mut vocab: Vocabulary<T> = Vocabulary::new();
        vocab.record((b'h' as T, b'i' as T), 256).unwrap();

        assert_eq!(
            tokens_to_bytes([256, b'!' as T, 256], &vocab).unwrap(),
            b"hi!hi".to_vec()
        );
        assert_eq!(tokens_to_bytes(Vec::<T>::new(), &vocab).unwrap(), b"");
    }

    #[test]
    fn test_tokens_to_bytes_unknown() {
        type T = u32;
        let vocab: Vocabulary<T> = Vocabulary::new();

        assert!(matches!(
            tokens_to_bytes([104, 3000, 105], &vocab),
            Err(BpeError::UnknownSymbolId(3000))
        ));

        let mut buf = Vec::new();
        assert!(append_token_bytes(&[104, 105, 256], &vocab, &mut buf).is_err());
        assert_eq!(buf, b"hi");
    }
}
