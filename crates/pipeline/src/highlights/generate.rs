//! Model-selected highlight clips with ordered model fallback.

use super::json::parse_json_array;
use super::merge::{merge_highlights, MergePolicy};
use super::types::{HighlightCandidate, HighlightClip, ALL_MODELS_FAILED, PROMPT_FAILED, QUOTA_EXCEEDED};
use crate::progress::ProgressReporter;
use crate::prompting::{request_for, vars};
use crate::types::{TranscriptSegment, VideoMetadata};
use recap_core::{AppError, AppResult, CancellationToken, ErrorKind};
use recap_llm::{Frame, LlmClient};
use recap_prompt::set::HIGHLIGHTS_LLM;
use recap_prompt::{BuiltPrompt, PromptSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

const DEFAULT_TITLE: &str = "Highlight";

/// Upper bound for a timestamp taken from backend output (about 136 years).
const MAX_TIMESTAMP_SECS: f64 = u32::MAX as f64;

/// Which failures move on to the next model in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub on_rate_limit: bool,
    pub on_malformed_json: bool,
    pub on_service_error: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            on_rate_limit: true,
            on_malformed_json: true,
            on_service_error: true,
        }
    }
}

impl RetryPolicy {
    /// Whether a failure of this kind should fall through to the next model.
    /// Cancellation never does.
    pub fn should_retry(&self, kind: ErrorKind) -> bool {
        match kind {
            ErrorKind::RateLimited => self.on_rate_limit,
            ErrorKind::MalformedJson => self.on_malformed_json,
            ErrorKind::Service => self.on_service_error,
            ErrorKind::Cancelled | ErrorKind::Other => false,
        }
    }
}

/// Model list and transcript limits for highlight selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Models tried in order until one produces a parseable answer
    pub models: Vec<String>,

    /// Formatted transcript is cut to this many characters
    pub transcript_char_limit: usize,

    /// Seconds added to every clip end
    pub end_padding_secs: i64,

    pub temperature: Option<f32>,

    pub retry: RetryPolicy,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            models: vec![
                "gemma-3-27b-it".to_string(),
                "gemini-2.5-flash".to_string(),
                "gemini-2.5-flash-lite".to_string(),
                "gemini-3-flash".to_string(),
            ],
            transcript_char_limit: 35_000,
            end_padding_secs: 1,
            temperature: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Asks a list of models, in order, to pick the best clips of a video.
pub struct HighlightGenerator {
    client: Arc<dyn LlmClient>,
    prompts: Arc<PromptSet>,
    config: HighlightConfig,
    merge: MergePolicy,
    progress: ProgressReporter,
}

impl HighlightGenerator {
    pub fn new(
        client: Arc<dyn LlmClient>,
        prompts: Arc<PromptSet>,
        config: HighlightConfig,
        merge: MergePolicy,
    ) -> Self {
        Self {
            client,
            prompts,
            config,
            merge,
            progress: ProgressReporter::noop(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Produce merged highlight clips, or a single sentinel explaining why
    /// there are none.
    ///
    /// Only cancellation is returned as an error.
    pub async fn generate(
        &self,
        segments: &[TranscriptSegment],
        frames: &[Frame],
        metadata: &VideoMetadata,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<HighlightCandidate>> {
        if segments.is_empty() {
            tracing::warn!(title = %metadata.title, "No transcript, highlights unavailable");
            return Ok(vec![HighlightCandidate::no_transcript()]);
        }

        let transcript = format_transcript(segments, self.config.transcript_char_limit);
        let prompt = match self.prompts.build(
            HIGHLIGHTS_LLM,
            vars([
                ("title", metadata.title.clone()),
                ("category", metadata.category.clone()),
                ("transcript", transcript),
            ]),
        ) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!("Failed to render highlight prompt: {}", e);
                return Ok(vec![HighlightCandidate::error(PROMPT_FAILED, e.to_string())]);
            }
        };

        let total = self.config.models.len();
        let mut last_error: Option<AppError> = None;

        for (i, model) in self.config.models.iter().enumerate() {
            cancel.check()?;
            self.progress.highlights((i + 1) as u64, total as u64, model);

            match self.try_model(&prompt, model, frames).await {
                Ok(clips) => {
                    let mut candidates: Vec<HighlightCandidate> = merge_highlights(clips, &self.merge)
                        .into_iter()
                        .map(HighlightCandidate::Clip)
                        .collect();

                    tracing::info!(model = %model, clips = candidates.len(), "Highlights selected");

                    if i > 0 {
                        candidates.insert(0, HighlightCandidate::model_switched(model));
                    }
                    return Ok(candidates);
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    let kind = e.kind();
                    if !self.config.retry.should_retry(kind) {
                        tracing::error!(model = %model, "Highlight model failed, not retrying: {}", e);
                        last_error = Some(e);
                        break;
                    }

                    if kind == ErrorKind::RateLimited {
                        tracing::info!(model = %model, "Model rate limited, trying next: {}", e);
                    } else {
                        tracing::warn!(model = %model, ?kind, "Model failed, trying next: {}", e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Ok(vec![exhausted(last_error)])
    }

    async fn try_model(
        &self,
        prompt: &BuiltPrompt,
        model: &str,
        frames: &[Frame],
    ) -> AppResult<Vec<HighlightClip>> {
        let mut request = request_for(prompt.clone(), model).with_images(frames.to_vec());
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.client.complete(&request).await?;
        let items = parse_json_array(&response.content)?;

        Ok(items
            .iter()
            .filter_map(|item| clip_from_value(item, self.config.end_padding_secs))
            .collect())
    }
}

/// Sentinel for a run where no model produced highlights.
fn exhausted(last_error: Option<AppError>) -> HighlightCandidate {
    match last_error {
        Some(AppError::RateLimited(details)) => {
            tracing::error!("All highlight models rejected the request for quota");
            let message = if details.contains("requests_per_day") {
                "Daily Quota Exceeded (All Models)"
            } else {
                "Quota Exceeded (All Models Busy)"
            };
            HighlightCandidate::error(QUOTA_EXCEEDED, message)
        }
        Some(e) => {
            tracing::error!("All highlight models failed: {}", e);
            HighlightCandidate::error(ALL_MODELS_FAILED, e.to_string())
        }
        None => HighlightCandidate::error(ALL_MODELS_FAILED, "No highlight models configured"),
    }
}

/// One `[<whole seconds>] <text>` line per segment, cut to `limit` chars.
fn format_transcript(segments: &[TranscriptSegment], limit: usize) -> String {
    let mut transcript = String::new();
    for segment in segments {
        // Writing to a String cannot fail
        let _ = writeln!(transcript, "[{}] {}", segment.start as i64, segment.text);
    }

    match transcript.char_indices().nth(limit) {
        Some((cut, _)) => transcript[..cut].to_string(),
        None => transcript,
    }
}

fn clip_from_value(item: &Value, end_padding_secs: i64) -> Option<HighlightClip> {
    let start = seconds(item.get("start")?)?;
    let end = seconds(item.get("end")?)?;
    let title = item
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TITLE);

    Some(HighlightClip::new(
        start,
        end.saturating_add(end_padding_secs),
        title,
    ))
}

/// Whole seconds from a JSON number or numeric string.
///
/// Negative and absurdly large timestamps are rejected.
fn seconds(value: &Value) -> Option<i64> {
    let secs = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let secs = secs.round();
    (secs.is_finite() && (0.0..=MAX_TIMESTAMP_SECS).contains(&secs)).then(|| secs as i64)
}
