//! # BPE Training
//!
//! Each iteration counts adjacent pairs, selects the most frequent one,
//! rewrites the sequence, and records the new token.

pub mod merge_selector;
pub mod pair_counter;
pub mod rewriter;
pub mod stop_signal;
pub mod trainer;

pub use merge_selector::*;
pub use stop_signal::*;
pub use trainer::*;
