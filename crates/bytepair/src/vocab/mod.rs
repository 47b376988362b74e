//! # Vocabulary

pub mod io;
pub mod merge_table;
pub mod vocabulary;

pub use merge_table::*;
pub use vocabulary::*;
