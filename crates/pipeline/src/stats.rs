//! Text statistics.

use crate::highlights::MappedHighlight;
use crate::text::Tokenizer;
use crate::types::TextStats;
use serde::{Deserialize, Serialize};

/// Words per sentence assumed for transcripts without punctuation.
const WORDS_PER_SENTENCE: usize = 20;

/// Word, sentence and character counts.
///
/// Unpunctuated text longer than 100 characters is assumed to have one
/// sentence per 20 words. Non-empty text always has at least one sentence.
pub fn text_stats(text: &str, tokenizer: &dyn Tokenizer) -> TextStats {
    if text.is_empty() {
        return TextStats::default();
    }

    let words = text.split_whitespace().count();
    let chars = text.chars().count();

    let sentences = match tokenizer.sentences(text) {
        Ok(sentences) => {
            let estimate = words / WORDS_PER_SENTENCE;
            if sentences.len() < estimate && chars > 100 {
                estimate
            } else {
                sentences.len()
            }
        }
        Err(e) => {
            tracing::debug!("Sentence tokenizer failed, counting periods: {}", e);
            text.split('.').count()
        }
    };

    TextStats {
        words,
        sentences: sentences.max(1),
        chars,
    }
}

/// Statistics reported with quote-mapped highlights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptStats {
    pub words: usize,

    /// Number of periods in the transcript
    pub sentences: usize,

    pub chars: usize,

    /// Combined length of all highlights, e.g. "2m 5s"
    pub total_duration_formatted: String,
}

/// Statistics for a transcript and the highlights selected from it.
pub fn transcript_stats(transcript: &str, highlights: &[MappedHighlight]) -> TranscriptStats {
    let total: f64 = highlights.iter().map(|h| h.duration).sum();

    TranscriptStats {
        words: transcript.split_whitespace().count(),
        sentences: transcript.matches('.').count(),
        chars: transcript.chars().count(),
        total_duration_formatted: format_duration(total),
    }
}

/// Format seconds as "<minutes>m <seconds>s".
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = (seconds % 60.0).floor() as u64;
    format!("{}m {}s", minutes, rest)
}
