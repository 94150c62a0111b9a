//! Domain types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// One timed caption line from a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Declared duration in seconds
    #[serde(default)]
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Descriptive metadata for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoMetadata {
    pub title: String,
    pub category: String,
    pub uploader: String,
    pub tags: Vec<String>,
    pub description: String,
}

impl Default for VideoMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            category: "General".to_string(),
            uploader: "Unknown Creator".to_string(),
            tags: Vec::new(),
            description: String::new(),
        }
    }
}

/// Requested summary length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreference {
    Short,
    #[default]
    Medium,
    Long,
    Detailed,
}

impl LengthPreference {
    /// Parse a user-supplied length; unknown values fall back to medium.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "short" => Self::Short,
            "long" => Self::Long,
            "detailed" => Self::Detailed,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::Detailed => "detailed",
        }
    }
}

/// Requested summary layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    #[default]
    Paragraph,
    Bullet,
}

impl FormatMode {
    /// Parse a user-supplied format; anything not naming bullets is a paragraph.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bullet" | "bullets" | "bullet points" | "bullet-points" => Self::Bullet,
            _ => Self::Paragraph,
        }
    }

    /// Label used inside prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Bullet => "bullet points",
        }
    }
}

/// Word, sentence and character counts for a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    pub chars: usize,
}

/// Statistics for the input and output of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub original: TextStats,
    pub summary: TextStats,
}

/// Result of the summary path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary_text: String,

    /// Absent for empty input and when no skeleton could be extracted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SummaryStats>,
}

impl SummaryResult {
    pub fn without_stats(summary_text: impl Into<String>) -> Self {
        Self {
            summary_text: summary_text.into(),
            stats: None,
        }
    }
}
