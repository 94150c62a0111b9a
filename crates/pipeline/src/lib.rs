//! Hybrid summarization and highlight pipeline.
//!
//! Summaries are produced in two halves. The extractive half chunks the
//! text, scores every sentence and keeps a fact skeleton, all locally and
//! without a model. The abstractive half asks a model to rewrite that
//! skeleton into a report.
//!
//! Highlights for video transcripts come from either verbatim quotes
//! aligned back to transcript time, or clips picked directly by a model.
//!
//! Everything runs sequentially, and every long-running operation takes a
//! `CancellationToken` that is polled between steps.

pub mod chunk;
pub mod config;
pub mod highlights;
pub mod progress;
pub mod score;
pub mod skeleton;
pub mod stats;
pub mod summarizer;
pub mod synthesis;
pub mod text;
pub mod types;

mod prompting;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{load_pipeline_config, PipelineConfig};
pub use highlights::{
    HighlightCandidate, HighlightClip, MappedHighlight, MergePolicy, Quote, RetryPolicy,
};
pub use progress::{ProgressCallback, ProgressEvent, ProgressReporter};
pub use stats::TranscriptStats;
pub use summarizer::{QuoteHighlights, Summarizer, EMPTY_SKELETON_MESSAGE};
pub use synthesis::TOO_LONG_MESSAGE;
pub use types::{
    FormatMode, LengthPreference, SummaryResult, SummaryStats, TextStats, TranscriptSegment,
    VideoMetadata,
};
