//! # Common Types and Traits
use core::fmt::{Debug, Display};
use core::hash::Hash;
use num_traits::{FromPrimitive, ToPrimitive, Unsigned};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// An unsigned integer usable as a symbol id.
///
/// Ids ``0..=255`` are the byte symbols; merge-created ids follow densely.
/// Ids are ordered so that merge candidates can be tie-broken, hashed for
/// pair counting, and serializable so merge tables can be persisted.
pub trait TokenType:
    Unsigned
    + FromPrimitive
    + ToPrimitive
    + Copy
    + Ord
    + Hash
    + Default
    + Debug
    + Display
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<T> TokenType for T where
    T: Unsigned
        + FromPrimitive
        + ToPrimitive
        + Copy
        + Ord
        + Hash
        + Default
        + Debug
        + Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// Widens a token to `u64` for error reporting.
///
/// Saturates at `u64::MAX` for ids wider than 64 bits.
pub(crate) fn token_to_u64<T: TokenType>(token: T) -> u64 {
    token.to_u64().unwrap_or(u64::MAX)
}

/// A pair of adjacent tokens.
pub type Pair<T> = (T, T);

/// [`Pair<T>`] to occurrence count map.
pub type PairCounts<T> = ahash::AHashMap<Pair<T>, usize>;

/// Check if a type is `Send`.
#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: S) {}

#[cfg(test)]
/// Check if a type is `Sync`.
pub(crate) fn check_is_sync<S: Sync>(_: S) {}
