//! Overlapping word-budget chunks.

use crate::text::{normalize, pseudo_sentences, Tokenizer};
use serde::{Deserialize, Serialize};

/// Configuration for word-budget chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Maximum words per chunk (word count is the token proxy)
    pub max_tokens: usize,

    /// Trailing words of a closed chunk that seed the next one
    pub overlap: usize,

    /// Words per synthetic sentence for unpunctuated input
    pub pseudo_sentence_words: usize,

    /// Input is "unpunctuated" when it has fewer than one sentence per this
    /// many words...
    pub sparse_words_per_sentence: usize,

    /// ...and more than this many words
    pub sparse_min_words: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_tokens: 600,
            overlap: 50,
            pseudo_sentence_words: 25,
            sparse_words_per_sentence: 50,
            sparse_min_words: 100,
        }
    }
}

/// How the text was segmented before chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segmentation {
    /// Tokenizer sentences
    Sentences,
    /// Synthetic fixed-size sentences (sparse punctuation)
    PseudoSentences,
    /// Naive ". " split after a tokenizer failure
    NaivePeriods,
}

/// Split text into overlapping chunks of at most `max_tokens` words.
///
/// Non-empty input always yields at least one chunk.
pub fn chunk_words(text: &str, tokenizer: &dyn Tokenizer, config: &ChunkConfig) -> Vec<String> {
    chunk_words_with_mode(text, tokenizer, config).0
}

/// Like [`chunk_words`], also reporting the segmentation that was used.
pub fn chunk_words_with_mode(
    text: &str,
    tokenizer: &dyn Tokenizer,
    config: &ChunkConfig,
) -> (Vec<String>, Segmentation) {
    let text = normalize(text);
    let (sentences, mode) = segment(&text, tokenizer, config);

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for sentence in &sentences {
        let sentence_words: Vec<&str> = sentence.split_whitespace().collect();

        if current.len() + sentence_words.len() <= config.max_tokens {
            current.extend(sentence_words);
            continue;
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }

        let keep = current.len().min(config.overlap);
        current.drain(..current.len() - keep);
        current.extend(sentence_words);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    tracing::debug!(
        chunks = chunks.len(),
        sentences = sentences.len(),
        mode = ?mode,
        "Created word-budget chunks"
    );

    (chunks, mode)
}

fn segment(
    text: &str,
    tokenizer: &dyn Tokenizer,
    config: &ChunkConfig,
) -> (Vec<String>, Segmentation) {
    let sentences = match tokenizer.sentences(text) {
        Ok(sentences) => sentences,
        Err(e) => {
            tracing::warn!("Sentence tokenizer failed, splitting on periods: {}", e);
            let naive = text
                .split(". ")
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect();
            return (naive, Segmentation::NaivePeriods);
        }
    };

    let word_count = text.split_whitespace().count();
    let expected = word_count / config.sparse_words_per_sentence.max(1);

    if sentences.is_empty() && word_count > 0 {
        tracing::warn!(words = word_count, "Tokenizer found no sentences, using pseudo-sentences");
        return (
            pseudo_sentences(text, config.pseudo_sentence_words),
            Segmentation::PseudoSentences,
        );
    }

    if sentences.len() < expected && word_count > config.sparse_min_words {
        tracing::warn!(
            words = word_count,
            sentences = sentences.len(),
            "Detected unpunctuated text, using pseudo-sentences"
        );
        return (
            pseudo_sentences(text, config.pseudo_sentence_words),
            Segmentation::PseudoSentences,
        );
    }

    (sentences, Segmentation::Sentences)
}
