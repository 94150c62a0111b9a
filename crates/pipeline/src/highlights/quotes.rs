//! Verbatim quote extraction over transcript windows.

use super::json::parse_json_array;
use super::types::Quote;
use crate::chunk::split_windows;
use crate::progress::ProgressReporter;
use crate::prompting::{request_for, vars};
use crate::types::VideoMetadata;
use recap_core::{AppResult, CancellationToken};
use recap_llm::LlmClient;
use recap_prompt::set::HIGHLIGHTS_QUOTES;
use recap_prompt::PromptSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Windowing and model settings for quote extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub window_chars: usize,
    pub overlap_chars: usize,
    pub model: String,
    pub temperature: Option<f32>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            window_chars: 12_000,
            overlap_chars: 500,
            model: "gemma3:12b".to_string(),
            temperature: None,
        }
    }
}

/// Asks the backend for verbatim quotes, one window at a time.
pub struct QuoteExtractor {
    client: Arc<dyn LlmClient>,
    prompts: Arc<PromptSet>,
    config: QuoteConfig,
    progress: ProgressReporter,
}

impl QuoteExtractor {
    pub fn new(client: Arc<dyn LlmClient>, prompts: Arc<PromptSet>, config: QuoteConfig) -> Self {
        Self {
            client,
            prompts,
            config,
            progress: ProgressReporter::noop(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Extract quotes from every window of `transcript_text`.
    ///
    /// A window whose call or parse fails is skipped. Only cancellation is
    /// returned as an error.
    pub async fn extract(
        &self,
        transcript_text: &str,
        metadata: &VideoMetadata,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Quote>> {
        let windows = split_windows(
            transcript_text,
            self.config.window_chars,
            self.config.overlap_chars,
        );
        let total = windows.len();

        tracing::info!(
            title = %metadata.title,
            windows = total,
            model = %self.config.model,
            "Extracting verbatim quotes"
        );

        let mut quotes = Vec::new();

        for (i, window) in windows.iter().enumerate() {
            cancel.check()?;

            match self.extract_window(window.text).await {
                Ok(found) => {
                    tracing::debug!(window = i + 1, quotes = found.len(), "Window processed");
                    quotes.extend(found);
                }
                Err(e) => {
                    tracing::warn!(
                        window = i + 1,
                        start = window.start,
                        "Skipping window after failed extraction: {}",
                        e
                    );
                }
            }

            self.progress.quotes((i + 1) as u64, total as u64, quotes.len());
        }

        tracing::info!(quotes = quotes.len(), "Quote extraction finished");
        Ok(quotes)
    }

    async fn extract_window(&self, segment: &str) -> AppResult<Vec<Quote>> {
        let prompt = self
            .prompts
            .build(HIGHLIGHTS_QUOTES, vars([("segment", segment.to_string())]))?;

        let mut request = request_for(prompt, &self.config.model);
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.client.complete(&request).await?;
        let items = parse_json_array(&response.content)?;

        Ok(items.into_iter().filter_map(quote_from_value).collect())
    }
}

fn quote_from_value(value: Value) -> Option<Quote> {
    match value.get("quote")? {
        Value::String(text) => Some(Quote::new(text.clone())),
        _ => None,
    }
}
