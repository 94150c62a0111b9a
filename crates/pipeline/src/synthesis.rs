//! Report synthesis: the abstractive half of the summary path.
//!
//! The local model rewrites a fact skeleton into a report. The cloud model
//! summarizes a transcript together with video frames, or frames and
//! metadata alone when no transcript exists. Backend failures never escape:
//! they come back as readable text.

use crate::prompting::{flag, request_for, vars};
use crate::types::{FormatMode, LengthPreference, VideoMetadata};
use recap_core::{AppError, AppResult, CancellationToken};
use recap_llm::{Frame, LlmClient, LlmRequest};
use recap_prompt::set::{SUMMARY_SYNTHESIZE, SUMMARY_VISUAL, SUMMARY_VISUAL_ONLY};
use recap_prompt::{BuiltPrompt, PromptSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shown instead of a summary when the backend rejects the request for quota.
pub const TOO_LONG_MESSAGE: &str = "The video is too long. Please try a shorter length video.";

const VISUAL_FOCUS_BASE: &str =
    "Identify any specific people, speakers, or known figures visible in the frames.";

/// Models and sampling for synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Local model that rewrites the fact skeleton
    pub model: String,
    pub temperature: f32,
    pub context_window: u32,

    /// Cloud model for transcript + frame summaries
    pub visual_model: String,
    pub visual_temperature: Option<f32>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            model: "gemma3:12b".to_string(),
            temperature: 0.7,
            context_window: 32_768,
            visual_model: "gemma-3-27b-it".to_string(),
            visual_temperature: None,
        }
    }
}

/// Directive for the local skeleton rewrite.
fn local_directive(length: LengthPreference) -> &'static str {
    match length {
        LengthPreference::Short => "Provide a high-level executive summary of the core message.",
        LengthPreference::Medium => "Provide a balanced narrative summary of major events and themes.",
        LengthPreference::Long => "Provide an exhaustive, detailed report preserving all nuances.",
        LengthPreference::Detailed => cloud_directive(LengthPreference::Detailed),
    }
}

/// Directive for the multimodal cloud summary.
fn cloud_directive(length: LengthPreference) -> &'static str {
    match length {
        LengthPreference::Short => "Provide a concise executive summary.",
        LengthPreference::Medium => "Provide a balanced, detailed narrative summary.",
        LengthPreference::Long => "Provide an extensive, comprehensive report covering all details.",
        LengthPreference::Detailed => {
            "Provide a COMPLETE, DEEP-DIVE ANALYSIS. Cover every topic, chapter, and visual detail \
             exhaustively. Do not leave out any significant information."
        }
    }
}

fn style_instruction(format: FormatMode) -> &'static str {
    match format {
        FormatMode::Paragraph => "Use a professional, third-person report style.",
        FormatMode::Bullet => "Use a structured list of bullet points.",
    }
}

/// What to look for in the frames, by video category.
fn visual_focus(category: &str) -> String {
    let category = category.to_lowercase();
    let extra = if category.contains("music") {
        " Focus on the visual aesthetic, mood, and instruments. Ignore lyrics if not in transcript."
    } else if category.contains("gaming") {
        " Focus on gameplay HUD, graphics quality, and key moments."
    } else if category.contains("tech") {
        " Focus on specific products, screens, and diagrams shown."
    } else {
        ""
    };
    format!("{}{}", VISUAL_FOCUS_BASE, extra)
}

/// Issues the single synthesis call of a summary run.
pub struct ReportSynthesizer {
    local: Arc<dyn LlmClient>,
    cloud: Arc<dyn LlmClient>,
    prompts: Arc<PromptSet>,
    config: SynthesisConfig,
}

impl ReportSynthesizer {
    pub fn new(
        local: Arc<dyn LlmClient>,
        cloud: Arc<dyn LlmClient>,
        prompts: Arc<PromptSet>,
        config: SynthesisConfig,
    ) -> Self {
        Self {
            local,
            cloud,
            prompts,
            config,
        }
    }

    /// Rewrite a fact skeleton into a report.
    ///
    /// On backend failure the skeleton itself is returned under an error
    /// banner, so the caller always has something to show.
    pub async fn synthesize(
        &self,
        skeleton: &str,
        length: LengthPreference,
        format: FormatMode,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        cancel.check()?;

        tracing::info!(
            model = %self.config.model,
            skeleton_chars = skeleton.len(),
            length = length.as_str(),
            format = format.label(),
            "Synthesizing report from fact skeleton"
        );

        let result = self.local_report(skeleton, length, format).await;

        match result {
            Ok(report) => Ok(report),
            Err(AppError::Cancelled) => Err(AppError::Cancelled),
            Err(e) if e.is_rate_limited() => {
                tracing::warn!("Local synthesis rate limited: {}", e);
                Ok(format!("{}\n\nBackup Skeleton:\n{}", TOO_LONG_MESSAGE, skeleton))
            }
            Err(e) => {
                tracing::error!("Local synthesis failed: {}", e);
                Ok(format!(
                    "[ERROR] Local Synthesis Failed: {}\n\nBackup Skeleton:\n{}",
                    e, skeleton
                ))
            }
        }
    }

    async fn local_report(
        &self,
        skeleton: &str,
        length: LengthPreference,
        format: FormatMode,
    ) -> AppResult<String> {
        let prompt = self.prompts.build(
            SUMMARY_SYNTHESIZE,
            vars([
                ("bullet", flag(format == FormatMode::Bullet)),
                ("directive", local_directive(length).to_string()),
                ("skeleton", skeleton.to_string()),
            ]),
        )?;

        let request = request_for(prompt, &self.config.model)
            .with_temperature(self.config.temperature)
            .with_context_window(self.config.context_window);

        let response = self.local.complete(&request).await?;
        Ok(response.content)
    }

    /// Summarize a video from its transcript, frames and metadata.
    ///
    /// An empty transcript switches to a frames-and-metadata-only prompt.
    pub async fn synthesize_with_visual_context(
        &self,
        text: &str,
        frames: &[Frame],
        metadata: &VideoMetadata,
        length: LengthPreference,
        format: FormatMode,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        cancel.check()?;

        let visual_only = text.trim().is_empty();
        tracing::info!(
            model = %self.config.visual_model,
            transcript_chars = text.len(),
            frames = frames.len(),
            visual_only,
            "Requesting multimodal summary"
        );

        let result = if visual_only {
            self.visual_only_request(frames, metadata, length, format)
        } else {
            self.visual_request(text, frames, metadata, length, format)
        };

        let result = match result {
            Ok(request) => self.cloud.complete(&request).await.map(|r| r.content),
            Err(e) => Err(e),
        };

        match result {
            Ok(summary) => Ok(summary),
            Err(AppError::Cancelled) => Err(AppError::Cancelled),
            Err(e) if e.is_rate_limited() => {
                tracing::warn!("Cloud summary rate limited: {}", e);
                Ok(TOO_LONG_MESSAGE.to_string())
            }
            Err(e) if visual_only => {
                tracing::error!("Visual-only summary failed: {}", e);
                Ok(format!("Visual Analysis Failed: {}", e))
            }
            Err(e) => {
                tracing::error!("Cloud summary failed: {}", e);
                Ok(format!("Error using Cloud API: {}", e))
            }
        }
    }

    fn visual_request(
        &self,
        text: &str,
        frames: &[Frame],
        metadata: &VideoMetadata,
        length: LengthPreference,
        format: FormatMode,
    ) -> AppResult<LlmRequest> {
        let prompt = self.prompts.build(
            SUMMARY_VISUAL,
            vars([
                ("title", metadata.title.clone()),
                ("uploader", metadata.uploader.clone()),
                ("category", metadata.category.clone()),
                ("tags", metadata.tags.join(", ")),
                ("description", metadata.description.clone()),
                ("directive", cloud_directive(length).to_string()),
                ("visual_focus", visual_focus(&metadata.category)),
                ("style", style_instruction(format).to_string()),
                ("transcript", text.to_string()),
            ]),
        )?;

        Ok(self.cloud_request(prompt, frames))
    }

    fn visual_only_request(
        &self,
        frames: &[Frame],
        metadata: &VideoMetadata,
        length: LengthPreference,
        format: FormatMode,
    ) -> AppResult<LlmRequest> {
        let prompt = self.prompts.build(
            SUMMARY_VISUAL_ONLY,
            vars([
                ("title", metadata.title.clone()),
                ("uploader", metadata.uploader.clone()),
                ("category", metadata.category.clone()),
                ("tags", metadata.tags.join(", ")),
                ("description", metadata.description.clone()),
                ("length", length.as_str().to_string()),
                ("format", format.label().to_string()),
                ("has_frames", flag(!frames.is_empty())),
            ]),
        )?;

        Ok(self.cloud_request(prompt, frames))
    }

    fn cloud_request(&self, prompt: BuiltPrompt, frames: &[Frame]) -> LlmRequest {
        let request = request_for(prompt, &self.config.visual_model).with_images(frames.to_vec());
        match self.config.visual_temperature {
            Some(temperature) => request.with_temperature(temperature),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recap_llm::{MockClient, MockReply};

    fn synthesizer(local: Arc<MockClient>, cloud: Arc<MockClient>) -> ReportSynthesizer {
        ReportSynthesizer::new(
            local,
            cloud,
            Arc::new(PromptSet::builtin().unwrap()),
            SynthesisConfig::default(),
        )
    }

    fn metadata(category: &str) -> VideoMetadata {
        VideoMetadata {
            title: "Rocket Launch".to_string(),
            category: category.to_string(),
            tags: vec!["space".to_string(), "rockets".to_string()],
            ..VideoMetadata::default()
        }
    }

    #[test]
    fn test_visual_focus_by_category() {
        assert_eq!(visual_focus("People & Blogs"), VISUAL_FOCUS_BASE);
        assert!(visual_focus("Music").ends_with("Ignore lyrics if not in transcript."));
        assert!(visual_focus("Gaming").contains("gameplay HUD"));
        assert!(visual_focus("Science & Technology").contains("products, screens"));
    }

    #[test]
    fn test_detailed_uses_deep_dive_directive_locally() {
        assert!(local_directive(LengthPreference::Detailed).starts_with("Provide a COMPLETE, DEEP-DIVE"));
        assert_eq!(
            local_directive(LengthPreference::Short),
            "Provide a high-level executive summary of the core message."
        );
    }

    #[tokio::test]
    async fn test_local_synthesis_request() {
        let local = Arc::new(MockClient::new().with_reply(MockReply::text("A fine report.")));
        let cloud = Arc::new(MockClient::new());

        let report = synthesizer(local.clone(), cloud.clone())
            .synthesize("Alice met Bob.", LengthPreference::Long, FormatMode::Bullet, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report, "A fine report.");
        assert_eq!(cloud.call_count(), 0);

        let request = &local.requests()[0];
        assert_eq!(request.model, "gemma3:12b");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.context_window, Some(32_768));
        assert!(request.prompt.starts_with("You are a professional analyst."));
        assert!(request
            .prompt
            .contains("Task: Provide an exhaustive, detailed report preserving all nuances."));
        assert!(request.prompt.ends_with("Facts: Alice met Bob."));
    }

    #[tokio::test]
    async fn test_local_failure_returns_backup_skeleton() {
        let local = Arc::new(MockClient::new().with_fallback(MockReply::ServiceError("connection refused".to_string())));

        let report = synthesizer(local, Arc::new(MockClient::new()))
            .synthesize("Key fact.", LengthPreference::Medium, FormatMode::Paragraph, &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.starts_with("[ERROR] Local Synthesis Failed: "));
        assert!(report.contains("connection refused"));
        assert!(report.ends_with("\n\nBackup Skeleton:\nKey fact."));
    }

    #[tokio::test]
    async fn test_local_rate_limit_message() {
        let local = Arc::new(MockClient::new().with_fallback(MockReply::RateLimited("429".to_string())));

        let report = synthesizer(local, Arc::new(MockClient::new()))
            .synthesize("Key fact.", LengthPreference::Medium, FormatMode::Paragraph, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            report,
            format!("{}\n\nBackup Skeleton:\nKey fact.", TOO_LONG_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_visual_context_request() {
        let cloud = Arc::new(MockClient::new().with_reply(MockReply::text("Video summary.")));
        let frames = vec![Frame::jpeg("AAAA"), Frame::jpeg("BBBB")];

        let summary = synthesizer(Arc::new(MockClient::new()), cloud.clone())
            .synthesize_with_visual_context(
                "we are go for launch",
                &frames,
                &metadata("Science & Technology"),
                LengthPreference::Short,
                FormatMode::Paragraph,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(summary, "Video summary.");
        let request = &cloud.requests()[0];
        assert_eq!(request.model, "gemma-3-27b-it");
        assert_eq!(request.images, frames);
        assert!(request.prompt.contains("Title: Rocket Launch"));
        assert!(request.prompt.contains("Tags: space, rockets"));
        assert!(request.prompt.contains("Task: Provide a concise executive summary."));
        assert!(request.prompt.contains("diagrams shown."));
        assert!(request.prompt.contains("DO NOT include any hashtags"));
        assert!(request.prompt.contains("we are go for launch"));
    }

    #[tokio::test]
    async fn test_empty_transcript_uses_visual_only_prompt() {
        let cloud = Arc::new(MockClient::new());

        synthesizer(Arc::new(MockClient::new()), cloud.clone())
            .synthesize_with_visual_context(
                "  ",
                &[],
                &metadata("Gaming"),
                LengthPreference::Detailed,
                FormatMode::Bullet,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let prompt = &cloud.requests()[0].prompt;
        assert!(prompt.contains("The transcript for this video is UNAVAILABLE."));
        assert!(prompt.contains("4. Length: detailed"));
        assert!(prompt.contains("5. Format: bullet points"));
        assert!(prompt.contains("[NO FRAMES AVAILABLE]"));
    }

    #[tokio::test]
    async fn test_visual_failures_are_text() {
        let failing = || Arc::new(MockClient::new().with_fallback(MockReply::ServiceError("bad key".to_string())));
        let cancel = CancellationToken::new();

        let with_transcript = synthesizer(Arc::new(MockClient::new()), failing())
            .synthesize_with_visual_context("text", &[], &metadata("News"), LengthPreference::Medium, FormatMode::Paragraph, &cancel)
            .await
            .unwrap();
        assert!(with_transcript.starts_with("Error using Cloud API: "));

        let visual_only = synthesizer(Arc::new(MockClient::new()), failing())
            .synthesize_with_visual_context("", &[], &metadata("News"), LengthPreference::Medium, FormatMode::Paragraph, &cancel)
            .await
            .unwrap();
        assert!(visual_only.starts_with("Visual Analysis Failed: "));

        let busy = Arc::new(MockClient::new().with_fallback(MockReply::RateLimited("429".to_string())));
        let rate_limited = synthesizer(Arc::new(MockClient::new()), busy)
            .synthesize_with_visual_context("text", &[], &metadata("News"), LengthPreference::Medium, FormatMode::Paragraph, &cancel)
            .await
            .unwrap();
        assert_eq!(rate_limited, TOO_LONG_MESSAGE);
    }

    #[tokio::test]
    async fn test_cancelled_synthesis_makes_no_call() {
        let local = Arc::new(MockClient::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = synthesizer(local.clone(), Arc::new(MockClient::new()))
            .synthesize("fact", LengthPreference::Medium, FormatMode::Paragraph, &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(local.call_count(), 0);
    }
}
