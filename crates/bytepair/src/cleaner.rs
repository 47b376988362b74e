//! # Text Cleaner Seam
//!
//! Normalization (contraction expansion, stopword removal, stemming, ...)
//! lives outside this crate. A [`TextCleaner`] is handed the raw text and an
//! immutable [`CleanOptions`]; the tokenizer only sees the returned string.

use serde::{Deserialize, Serialize};

/// Word reduction strategy; stemming and lemmatization are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordReduction {
    /// Suffix-stripping stemmer.
    Stem,
    /// Dictionary lemmatizer.
    Lemmatize,
}

/// Independent cleaning toggles, passed explicitly to every [`TextCleaner`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Expand contractions ("can't" -> "cannot").
    pub expand_contractions: bool,

    /// Drop stopwords.
    pub remove_stopwords: bool,

    /// Strip punctuation.
    pub remove_punctuation: bool,

    /// Strip numbers.
    pub remove_numbers: bool,

    /// Normalize slang and abbreviations.
    pub normalize_slang: bool,

    /// Correct common misspellings.
    pub correct_spelling: bool,

    /// Optional stemming or lemmatization.
    pub reduction: Option<WordReduction>,

    /// Mask named entities.
    pub mask_entities: bool,

    /// Replace words with canonical synonyms.
    pub replace_synonyms: bool,
}

impl CleanOptions {
    /// Sets contraction expansion.
    pub fn with_expand_contractions(
        self,
        expand_contractions: bool,
    ) -> Self {
        Self {
            expand_contractions,
            ..self
        }
    }

    /// Sets stopword removal.
    pub fn with_remove_stopwords(
        self,
        remove_stopwords: bool,
    ) -> Self {
        Self {
            remove_stopwords,
            ..self
        }
    }

    /// Sets punctuation stripping.
    pub fn with_remove_punctuation(
        self,
        remove_punctuation: bool,
    ) -> Self {
        Self {
            remove_punctuation,
            ..self
        }
    }

    /// Sets number stripping.
    pub fn with_remove_numbers(
        self,
        remove_numbers: bool,
    ) -> Self {
        Self {
            remove_numbers,
            ..self
        }
    }

    /// Sets slang normalization.
    pub fn with_normalize_slang(
        self,
        normalize_slang: bool,
    ) -> Self {
        Self {
            normalize_slang,
            ..self
        }
    }

    /// Sets spelling correction.
    pub fn with_correct_spelling(
        self,
        correct_spelling: bool,
    ) -> Self {
        Self {
            correct_spelling,
            ..self
        }
    }

    /// Sets the word reduction strategy.
    pub fn with_reduction(
        self,
        reduction: Option<WordReduction>,
    ) -> Self {
        Self { reduction, ..self }
    }

    /// Sets entity masking.
    pub fn with_mask_entities(
        self,
        mask_entities: bool,
    ) -> Self {
        Self {
            mask_entities,
            ..self
        }
    }

    /// Sets synonym replacement.
    pub fn with_replace_synonyms(
        self,
        replace_synonyms: bool,
    ) -> Self {
        Self {
            replace_synonyms,
            ..self
        }
    }
}

/// Maps raw text to cleaned text.
pub trait TextCleaner {
    /// Cleans `raw` according to `options`.
    fn clean(
        &self,
        raw: &str,
        options: &CleanOptions,
    ) -> String;
}

/// A [`TextCleaner`] that returns its input unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityCleaner;

impl TextCleaner for IdentityCleaner {
    fn clean(
        &self,
        raw: &str,
        _options: &CleanOptions,
    ) -> String {
        raw.to_string()
    }
}

impl<F> TextCleaner for F
where
    F: Fn(&str, &CleanOptions) -> String,
{
    fn clean(
        &self,
        raw: &str,
        options: &CleanOptions,
    ) -> String {
        self(raw, options)
    }
}
