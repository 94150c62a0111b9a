//! The pipeline facade.
//!
//! `Summarizer` owns the backends, prompts and settings and exposes the
//! operations callers use: text summaries, multimodal video summaries, and
//! both highlight paths.

use crate::chunk::chunk_words;
use crate::config::PipelineConfig;
use crate::highlights::{
    map_and_merge, HighlightCandidate, HighlightGenerator, MappedHighlight, Quote, QuoteExtractor,
};
use crate::progress::ProgressReporter;
use crate::score::SentenceScorer;
use crate::skeleton::extract_skeleton;
use crate::stats::{text_stats, transcript_stats, TranscriptStats};
use crate::synthesis::ReportSynthesizer;
use crate::text::{normalize, HeuristicTagger, Tagger, Tokenizer, UnicodeTokenizer};
use crate::types::{
    FormatMode, LengthPreference, SummaryResult, SummaryStats, TextStats, TranscriptSegment,
    VideoMetadata,
};
use recap_core::{AppResult, CancellationToken};
use recap_llm::{Frame, LlmClient};
use recap_prompt::PromptSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Returned as the summary when no sentence survived skeleton extraction.
pub const EMPTY_SKELETON_MESSAGE: &str =
    "Error: Could not extract facts from text. (Empty Skeleton)";

/// Result of the quote-based highlight path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteHighlights {
    pub highlights: Vec<MappedHighlight>,

    /// Set instead of highlights when the path could not run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<HighlightCandidate>,

    pub original: TranscriptStats,
}

/// Entry point to the summarization and highlight pipeline.
pub struct Summarizer {
    /// Backend for skeleton synthesis and quote extraction
    local: Arc<dyn LlmClient>,

    /// Backend for multimodal summaries and highlight selection
    cloud: Arc<dyn LlmClient>,

    prompts: Arc<PromptSet>,
    tokenizer: Arc<dyn Tokenizer>,
    tagger: Arc<dyn Tagger>,
    config: PipelineConfig,
    progress: ProgressReporter,
}

impl Summarizer {
    pub fn new(
        local: Arc<dyn LlmClient>,
        cloud: Arc<dyn LlmClient>,
        prompts: Arc<PromptSet>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            local,
            cloud,
            prompts,
            tokenizer: Arc::new(UnicodeTokenizer),
            tagger: Arc::new(HeuristicTagger),
            config,
            progress: ProgressReporter::noop(),
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn synthesizer(&self) -> ReportSynthesizer {
        ReportSynthesizer::new(
            self.local.clone(),
            self.cloud.clone(),
            self.prompts.clone(),
            self.config.synthesis.clone(),
        )
    }

    /// Summarize a document: chunk, score, keep the fact skeleton, then have
    /// the local model rewrite it.
    pub async fn summarize(
        &self,
        text: &str,
        length: LengthPreference,
        format: FormatMode,
        cancel: &CancellationToken,
    ) -> AppResult<SummaryResult> {
        if normalize(text).is_empty() {
            return Ok(SummaryResult::without_stats(""));
        }

        tracing::info!(
            chars = text.len(),
            length = length.as_str(),
            format = format.label(),
            "Starting summary pipeline"
        );

        let chunks = chunk_words(text, self.tokenizer.as_ref(), &self.config.chunk);
        self.progress
            .chunk(chunks.len() as u64, text.split_whitespace().count());

        let scorer = SentenceScorer::new(
            self.tokenizer.clone(),
            self.tagger.clone(),
            self.config.scoring.clone(),
        );

        let mut skeleton_parts = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            cancel.check()?;

            let scored = scorer.score(chunk);
            let skeleton = extract_skeleton(&scored, &self.config.skeleton);
            self.progress
                .score((i + 1) as u64, chunks.len() as u64, skeleton.len());

            if !skeleton.is_empty() {
                skeleton_parts.push(skeleton);
            }
        }

        let fact_skeleton = skeleton_parts.join(" ");
        tracing::debug!(
            chunks = chunks.len(),
            parts = skeleton_parts.len(),
            skeleton_chars = fact_skeleton.len(),
            "Fact skeleton assembled"
        );

        if fact_skeleton.trim().is_empty() {
            tracing::warn!("Fact skeleton is empty, nothing to synthesize");
            return Ok(SummaryResult::without_stats(EMPTY_SKELETON_MESSAGE));
        }

        cancel.check()?;
        self.progress.synthesize(&self.config.synthesis.model);
        let summary = self
            .synthesizer()
            .synthesize(&fact_skeleton, length, format, cancel)
            .await?;

        let stats = SummaryStats {
            original: self.text_stats(text),
            summary: self.text_stats(&summary),
        };

        tracing::info!(
            original_words = stats.original.words,
            summary_words = stats.summary.words,
            "Summary pipeline complete"
        );

        Ok(SummaryResult {
            summary_text: summary,
            stats: Some(stats),
        })
    }

    /// Summarize a video from its transcript and frames in one cloud call.
    pub async fn synthesize_with_visual_context(
        &self,
        text: &str,
        frames: &[Frame],
        metadata: &VideoMetadata,
        length: LengthPreference,
        format: FormatMode,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        self.progress.synthesize(&self.config.synthesis.visual_model);
        self.synthesizer()
            .synthesize_with_visual_context(text, frames, metadata, length, format, cancel)
            .await
    }

    /// Have the cloud model pick highlight clips, falling back across the
    /// configured model list.
    pub async fn extract_highlights(
        &self,
        segments: &[TranscriptSegment],
        frames: &[Frame],
        metadata: &VideoMetadata,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<HighlightCandidate>> {
        HighlightGenerator::new(
            self.cloud.clone(),
            self.prompts.clone(),
            self.config.highlights.clone(),
            self.config.merge.llm.clone(),
        )
        .with_progress(self.progress.clone())
        .generate(segments, frames, metadata, cancel)
        .await
    }

    /// Have the local model extract verbatim quotes from a transcript.
    pub async fn extract_verbatim_quotes(
        &self,
        transcript_text: &str,
        metadata: &VideoMetadata,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Quote>> {
        QuoteExtractor::new(
            self.local.clone(),
            self.prompts.clone(),
            self.config.quotes.clone(),
        )
        .with_progress(self.progress.clone())
        .extract(transcript_text, metadata, cancel)
        .await
    }

    /// Align quotes to transcript time and merge neighbours.
    pub fn map_and_merge_quotes(
        &self,
        quotes: &[Quote],
        segments: &[TranscriptSegment],
    ) -> Vec<MappedHighlight> {
        map_and_merge(
            quotes,
            segments,
            &self.config.mapper,
            &self.config.merge.quotes,
        )
    }

    pub fn text_stats(&self, text: &str) -> TextStats {
        text_stats(text, self.tokenizer.as_ref())
    }

    /// Quote-based highlights for a transcript: extract, align, merge.
    pub async fn quote_highlights(
        &self,
        segments: &[TranscriptSegment],
        metadata: &VideoMetadata,
        cancel: &CancellationToken,
    ) -> AppResult<QuoteHighlights> {
        if segments.is_empty() {
            tracing::warn!(title = %metadata.title, "No transcript, highlights unavailable");
            return Ok(QuoteHighlights {
                highlights: Vec::new(),
                notice: Some(HighlightCandidate::no_transcript()),
                original: transcript_stats("", &[]),
            });
        }

        let transcript_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let quotes = self
            .extract_verbatim_quotes(&transcript_text, metadata, cancel)
            .await?;
        let highlights = self.map_and_merge_quotes(&quotes, segments);

        tracing::info!(
            quotes = quotes.len(),
            highlights = highlights.len(),
            "Quote highlights ready"
        );

        Ok(QuoteHighlights {
            original: transcript_stats(&transcript_text, &highlights),
            highlights,
            notice: None,
        })
    }
}
