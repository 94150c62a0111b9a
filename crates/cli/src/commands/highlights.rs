//! Highlights command handler.
//!
//! Reads a timed transcript and prints highlight clips, either from verbatim
//! quotes aligned to caption time or from the cloud model's clip picks.

use super::{print_json, read_json, RunContext};
use clap::{Args, ValueEnum};
use recap_pipeline::stats::format_duration;
use recap_pipeline::{HighlightCandidate, QuoteHighlights, TranscriptSegment, VideoMetadata};
use serde::Deserialize;
use std::path::PathBuf;

/// How highlight clips are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HighlightMode {
    /// Local model extracts quotes, mapped back to caption time
    Quotes,
    /// Cloud model picks clips directly from the timed transcript
    Llm,
}

/// Transcript file: a bare segment array, or segments with metadata.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Segments(Vec<TranscriptSegment>),
    Document {
        segments: Vec<TranscriptSegment>,
        #[serde(default)]
        metadata: Option<VideoMetadata>,
    },
}

impl TranscriptFile {
    fn into_parts(self) -> (Vec<TranscriptSegment>, Option<VideoMetadata>) {
        match self {
            TranscriptFile::Segments(segments) => (segments, None),
            TranscriptFile::Document { segments, metadata } => (segments, metadata),
        }
    }
}

/// Pick highlight clips from a timed transcript
#[derive(Args, Debug)]
pub struct HighlightsCommand {
    /// Transcript JSON (`[{"text", "start", "duration"}, ...]`)
    pub transcript: PathBuf,

    /// Video metadata JSON (title, category, uploader, tags, description)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Highlight selection mode
    #[arg(long, value_enum, default_value_t = HighlightMode::Quotes)]
    pub mode: HighlightMode,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print progress events to stderr
    #[arg(long)]
    pub progress: bool,
}

impl HighlightsCommand {
    pub async fn execute(&self, ctx: &RunContext) -> anyhow::Result<()> {
        tracing::info!("Executing highlights command");
        tracing::debug!("Highlights options: {:?}", self);

        let (segments, embedded) = read_json::<TranscriptFile>(&self.transcript)?.into_parts();
        let metadata = match self.metadata {
            Some(ref path) => read_json::<VideoMetadata>(path)?,
            None => embedded.unwrap_or_default(),
        };

        tracing::debug!(
            segments = segments.len(),
            title = %metadata.title,
            "Loaded transcript"
        );

        let summarizer = ctx.summarizer(self.progress)?;

        match self.mode {
            HighlightMode::Quotes => {
                let result = summarizer
                    .quote_highlights(&segments, &metadata, &ctx.cancel)
                    .await?;
                if self.json {
                    print_json(&result)
                } else {
                    print_quote_highlights(&result);
                    Ok(())
                }
            }
            HighlightMode::Llm => {
                let candidates = summarizer
                    .extract_highlights(&segments, &[], &metadata, &ctx.cancel)
                    .await?;
                if self.json {
                    print_json(&candidates)
                } else {
                    print_candidates(&candidates);
                    Ok(())
                }
            }
        }
    }
}

fn print_quote_highlights(result: &QuoteHighlights) {
    if let Some(ref notice) = result.notice {
        print_candidates(std::slice::from_ref(notice));
        return;
    }

    if result.highlights.is_empty() {
        println!("No highlights found.");
    }

    for highlight in &result.highlights {
        println!(
            "[{:.2}s - {:.2}s] {}",
            highlight.start, highlight.end, highlight.text
        );
    }

    println!();
    println!(
        "{} words, {} sentences, {} highlighted",
        result.original.words, result.original.sentences, result.original.total_duration_formatted
    );
}

fn print_candidates(candidates: &[HighlightCandidate]) {
    for candidate in candidates {
        match candidate {
            HighlightCandidate::Clip(clip) => println!(
                "[{} - {}] {}",
                format_duration(clip.start as f64),
                format_duration(clip.end as f64),
                clip.title
            ),
            HighlightCandidate::Warning { warning, details } => {
                eprintln!("warning: {}: {}", warning, details)
            }
            HighlightCandidate::Error { error, details } => {
                eprintln!("error: {}: {}", error, details)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_file_accepts_bare_array() {
        let file: TranscriptFile = serde_json::from_str(
            r#"[{"text": "hello there", "start": 0.0, "duration": 2.0}]"#,
        )
        .unwrap();

        let (segments, metadata) = file.into_parts();
        assert_eq!(segments.len(), 1);
        assert!(metadata.is_none());
    }

    #[test]
    fn test_transcript_file_accepts_document() {
        let file: TranscriptFile = serde_json::from_str(
            r#"{
                "segments": [{"text": "hello", "start": 1.5}],
                "metadata": {"title": "Cooking Basics"}
            }"#,
        )
        .unwrap();

        let (segments, metadata) = file.into_parts();
        assert_eq!(segments[0].duration, 0.0);
        let metadata = metadata.unwrap();
        assert_eq!(metadata.title, "Cooking Basics");
        assert_eq!(metadata.uploader, "Unknown Creator");
    }
}
