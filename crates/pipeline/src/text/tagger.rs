//! Part-of-speech tagging seam.
//!
//! The scorer only needs to know which tokens are proper nouns, so the tag
//! set is deliberately coarse.

use super::stopwords::is_stop_word;
use recap_core::AppResult;

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    ProperNoun,
    Other,
}

/// Tags word tokens.
pub trait Tagger: Send + Sync {
    /// Tag each token; the result has the same length as `tokens`.
    fn tag(&self, tokens: &[String]) -> AppResult<Vec<PosTag>>;
}

/// Capitalization-based proper-noun detector.
///
/// A token is a proper noun when it is alphabetic, starts with an uppercase
/// letter and its lower-cased form is not a stop word. Sentence-initial
/// common nouns are counted too.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

impl HeuristicTagger {
    fn is_proper_noun(token: &str) -> bool {
        let Some(first) = token.chars().next() else {
            return false;
        };

        first.is_uppercase()
            && token.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')
            && !is_stop_word(&token.to_lowercase())
    }
}

impl Tagger for HeuristicTagger {
    fn tag(&self, tokens: &[String]) -> AppResult<Vec<PosTag>> {
        Ok(tokens
            .iter()
            .map(|token| {
                if Self::is_proper_noun(token) {
                    PosTag::ProperNoun
                } else {
                    PosTag::Other
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(words: &[&str]) -> Vec<PosTag> {
        let tokens: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        HeuristicTagger.tag(&tokens).unwrap()
    }

    #[test]
    fn test_capitalized_names_are_proper_nouns() {
        assert_eq!(
            tags(&["Alice", "met", "Bob"]),
            vec![PosTag::ProperNoun, PosTag::Other, PosTag::ProperNoun]
        );
    }

    #[test]
    fn test_capitalized_stop_words_are_not() {
        assert_eq!(
            tags(&["The", "weather", "I"]),
            vec![PosTag::Other, PosTag::Other, PosTag::Other]
        );
    }

    #[test]
    fn test_numbers_are_not_proper_nouns() {
        assert_eq!(tags(&["2024", "X1"]), vec![PosTag::Other, PosTag::Other]);
    }
}
