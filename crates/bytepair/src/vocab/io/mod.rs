//! # Vocabulary IO

pub mod merge_io;

pub use merge_io::*;
