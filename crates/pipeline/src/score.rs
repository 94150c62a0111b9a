//! Sentence importance scoring.
//!
//! Score = keyword frequency mass + proper-noun bonus, with a positional
//! boost for the first sentence of a chunk.

use crate::text::{is_stop_word, pseudo_sentences, PosTag, Tagger, Tokenizer};
use recap_core::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A sentence with its importance score (always >= 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentence {
    pub sentence: String,
    pub score: f64,
}

impl ScoredSentence {
    pub fn new(sentence: impl Into<String>, score: f64) -> Self {
        Self {
            sentence: sentence.into(),
            score,
        }
    }
}

/// Scoring weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added per proper-noun token
    pub proper_noun_bonus: f64,

    /// Multiplier applied to the first sentence only
    pub first_sentence_multiplier: f64,

    /// Pseudo-sentence size when a chunk has fewer than two sentences
    pub pseudo_sentence_words: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            proper_noun_bonus: 2.5,
            first_sentence_multiplier: 1.5,
            pseudo_sentence_words: 25,
        }
    }
}

/// Scores the sentences of a chunk.
pub struct SentenceScorer {
    tokenizer: Arc<dyn Tokenizer>,
    tagger: Arc<dyn Tagger>,
    config: ScoringConfig,
}

impl SentenceScorer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, tagger: Arc<dyn Tagger>, config: ScoringConfig) -> Self {
        Self {
            tokenizer,
            tagger,
            config,
        }
    }

    /// Score every sentence of `chunk`.
    ///
    /// Never fails: if tokenization breaks, every sentence gets a score of 1.
    pub fn score(&self, chunk: &str) -> Vec<ScoredSentence> {
        match self.try_score(chunk) {
            Ok(scored) => scored,
            Err(e) => {
                tracing::warn!("Scoring failed, using uniform scores: {}", e);
                self.uniform(chunk)
            }
        }
    }

    fn try_score(&self, chunk: &str) -> AppResult<Vec<ScoredSentence>> {
        let mut sentences = self.tokenizer.sentences(chunk)?;
        if sentences.len() < 2 {
            sentences = pseudo_sentences(chunk, self.config.pseudo_sentence_words);
        }

        let frequencies = self.keyword_frequencies(chunk)?;

        let mut scored = Vec::with_capacity(sentences.len());
        for (i, sentence) in sentences.into_iter().enumerate() {
            let tokens = self.tokenizer.words(&sentence)?;

            let keyword_score: f64 = tokens
                .iter()
                .filter_map(|t| frequencies.get(t.to_lowercase().as_str()))
                .map(|&count| count as f64)
                .sum();

            let mut score = keyword_score + self.proper_noun_bonus(&tokens);

            if i == 0 {
                score *= self.config.first_sentence_multiplier;
            }

            scored.push(ScoredSentence::new(sentence, score));
        }

        tracing::debug!(sentences = scored.len(), "Scored chunk");
        Ok(scored)
    }

    fn keyword_frequencies(&self, chunk: &str) -> AppResult<HashMap<String, usize>> {
        let mut frequencies = HashMap::new();

        for word in self.tokenizer.words(chunk)? {
            let word = word.to_lowercase();
            if is_stop_word(&word) || is_punctuation(&word) {
                continue;
            }
            *frequencies.entry(word).or_insert(0) += 1;
        }

        Ok(frequencies)
    }

    fn proper_noun_bonus(&self, tokens: &[String]) -> f64 {
        match self.tagger.tag(tokens) {
            Ok(tags) => {
                let proper = tags.iter().filter(|t| **t == PosTag::ProperNoun).count();
                proper as f64 * self.config.proper_noun_bonus
            }
            Err(e) => {
                tracing::debug!("Tagger failed, no proper-noun bonus: {}", e);
                0.0
            }
        }
    }

    fn uniform(&self, chunk: &str) -> Vec<ScoredSentence> {
        match self.tokenizer.sentences(chunk) {
            Ok(sentences) if !sentences.is_empty() => sentences
                .into_iter()
                .map(|s| ScoredSentence::new(s, 1.0))
                .collect(),
            _ if chunk.trim().is_empty() => Vec::new(),
            _ => vec![ScoredSentence::new(chunk.trim(), 1.0)],
        }
    }
}

fn is_punctuation(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{HeuristicTagger, UnicodeTokenizer};
    use recap_core::AppError;

    struct BrokenTagger;

    impl Tagger for BrokenTagger {
        fn tag(&self, _tokens: &[String]) -> AppResult<Vec<PosTag>> {
            Err(AppError::Tokenization("no tagger model".to_string()))
        }
    }

    /// Splits sentences but cannot split words.
    struct SentenceOnlyTokenizer;

    impl Tokenizer for SentenceOnlyTokenizer {
        fn sentences(&self, text: &str) -> AppResult<Vec<String>> {
            UnicodeTokenizer.sentences(text)
        }

        fn words(&self, _text: &str) -> AppResult<Vec<String>> {
            Err(AppError::Tokenization("no word model".to_string()))
        }
    }

    fn scorer() -> SentenceScorer {
        SentenceScorer::new(
            Arc::new(UnicodeTokenizer),
            Arc::new(HeuristicTagger),
            ScoringConfig::default(),
        )
    }

    #[test]
    fn test_proper_nouns_and_position_bias() {
        let scored = scorer().score("Alice met Bob. The weather was nice.");

        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].sentence, "Alice met Bob.");
        // (alice + met + bob) + 2 * 2.5, then * 1.5
        assert!((scored[0].score - 12.0).abs() < 1e-9);
        // weather + nice
        assert!((scored[1].score - 2.0).abs() < 1e-9);
        assert!(scored[0].score > scored[1].score);
    }

    #[test]
    fn test_repeated_keywords_weigh_more() {
        let scored = scorer().score("Rockets fly high today. Rockets need fuel. Cats sleep.");
        assert_eq!(scored.len(), 3);
        // rockets(2) + need + fuel + proper-noun bonus
        assert!(scored[1].score > scored[2].score);
    }

    #[test]
    fn test_single_sentence_uses_pseudo_sentences() {
        let text = (0..60).map(|i| format!("token{}", i)).collect::<Vec<_>>().join(" ");
        let scored = scorer().score(&text);

        assert_eq!(scored.len(), 3);
        assert!(scored.iter().all(|s| s.sentence.ends_with('.')));
    }

    #[test]
    fn test_tagger_failure_gives_no_bonus() {
        let scorer = SentenceScorer::new(
            Arc::new(UnicodeTokenizer),
            Arc::new(BrokenTagger),
            ScoringConfig::default(),
        );
        let scored = scorer.score("Alice met Bob. The weather was nice.");

        assert!((scored[0].score - 4.5).abs() < 1e-9);
        assert!((scored[1].score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_tokenizer_failure_gives_uniform_scores() {
        let scorer = SentenceScorer::new(
            Arc::new(SentenceOnlyTokenizer),
            Arc::new(HeuristicTagger),
            ScoringConfig::default(),
        );
        let scored = scorer.score("Alice met Bob. The weather was nice.");

        assert_eq!(scored.len(), 2);
        assert!(scored.iter().all(|s| s.score == 1.0));
    }

    #[test]
    fn test_empty_chunk() {
        assert!(scorer().score("").is_empty());
    }

    #[test]
    fn test_scores_are_non_negative() {
        let scored = scorer().score("Of the. And the. It is what it is.");
        assert!(scored.iter().all(|s| s.score >= 0.0));
    }
}
