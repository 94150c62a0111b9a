//! Sentence and word tokenization.
//!
//! The pipeline only depends on the [`Tokenizer`] trait; the default
//! implementation uses the Unicode text segmentation rules (UAX #29).

use recap_core::AppResult;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into sentences and words.
pub trait Tokenizer: Send + Sync {
    /// Split text into sentences, trimmed, without empty entries.
    fn sentences(&self, text: &str) -> AppResult<Vec<String>>;

    /// Split text into word tokens, preserving case.
    fn words(&self, text: &str) -> AppResult<Vec<String>>;
}

/// UAX #29 sentence and word boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeTokenizer;

impl Tokenizer for UnicodeTokenizer {
    fn sentences(&self, text: &str) -> AppResult<Vec<String>> {
        Ok(text
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn words(&self, text: &str) -> AppResult<Vec<String>> {
        Ok(text.unicode_words().map(str::to_string).collect())
    }
}

/// Re-segment text into synthetic sentences of `size` words, each ending in
/// a period. Used when the input carries little or no punctuation.
pub fn pseudo_sentences(text: &str, size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(size.max(1))
        .map(|group| format!("{}.", group.join(" ")))
        .collect()
}
