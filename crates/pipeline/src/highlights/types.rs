//! Highlight data types.

use serde::{Deserialize, Serialize};

/// Sentinel code: a fallback model produced the result.
pub const MODEL_SWITCHED: &str = "MODEL_SWITCHED";
/// Sentinel code: highlights were requested without a transcript.
pub const NO_TRANSCRIPT: &str = "NO_TRANSCRIPT";
/// Sentinel code: every model was rejected for quota reasons.
pub const QUOTA_EXCEEDED: &str = "QUOTA_EXCEEDED";
/// Sentinel code: every model failed for another reason.
pub const ALL_MODELS_FAILED: &str = "ALL_MODELS_FAILED";
/// Sentinel code: the highlight prompt could not be rendered.
pub const PROMPT_FAILED: &str = "PROMPT_FAILED";

/// A verbatim quote returned by the extraction backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
}

impl Quote {
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
        }
    }
}

/// A quote aligned to transcript time. Seconds are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedHighlight {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

impl MappedHighlight {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start: round2(start),
            end: round2(end),
            duration: round2(end - start),
        }
    }
}

/// A model-selected clip in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightClip {
    pub start: i64,
    pub end: i64,
    pub title: String,
}

impl HighlightClip {
    pub fn new(start: i64, end: i64, title: impl Into<String>) -> Self {
        Self {
            start,
            end,
            title: title.into(),
        }
    }
}

/// One element of a highlight result: a clip, or a warning/error sentinel.
///
/// Serialized untagged, so each variant keeps its flat wire shape
/// (`{start,end,title}`, `{warning,details}`, `{error,details}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HighlightCandidate {
    Clip(HighlightClip),
    Warning { warning: String, details: String },
    Error { error: String, details: String },
}

impl HighlightCandidate {
    pub fn model_switched(model: &str) -> Self {
        Self::Warning {
            warning: MODEL_SWITCHED.to_string(),
            details: format!("Automatically switched to {} due to high traffic.", model),
        }
    }

    pub fn no_transcript() -> Self {
        Self::Warning {
            warning: NO_TRANSCRIPT.to_string(),
            details: "Highlights require a transcript, which is not available for this video. \
                      Please try the 'Summary' mode for a visual analysis."
                .to_string(),
        }
    }

    pub fn error(code: &str, details: impl Into<String>) -> Self {
        Self::Error {
            error: code.to_string(),
            details: details.into(),
        }
    }

    pub fn as_clip(&self) -> Option<&HighlightClip> {
        match self {
            Self::Clip(clip) => Some(clip),
            _ => None,
        }
    }

    /// Warning or error code, if this is a sentinel.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Clip(_) => None,
            Self::Warning { warning, .. } => Some(warning),
            Self::Error { error, .. } => Some(error),
        }
    }
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
