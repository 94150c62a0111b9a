//! Command handlers for the recap CLI.
//!
//! Each subcommand lives in its own module. Shared setup (backends, prompts,
//! pipeline config, input reading) is in this file.

pub mod highlights;
pub mod stats;
pub mod summarize;

pub use highlights::HighlightsCommand;
pub use stats::StatsCommand;
pub use summarize::SummarizeCommand;

use anyhow::Context;
use recap_core::{config::ProviderConfig, AppConfig, CancellationToken};
use recap_llm::{create_client, LlmClient};
use recap_pipeline::{load_pipeline_config, ProgressEvent, ProgressReporter, Summarizer};
use recap_prompt::PromptSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Everything a command needs from the process shell.
pub struct RunContext {
    pub config: AppConfig,

    /// `--model` / `RECAP_MODEL`, applied to the local model roles
    pub model_override: Option<String>,

    /// Triggered by Ctrl-C
    pub cancel: CancellationToken,
}

impl RunContext {
    /// Build a summarizer from the workspace configuration.
    ///
    /// The active provider serves local synthesis and quote extraction. A
    /// Gemini key, when present, enables a separate cloud backend for
    /// multimodal summaries and highlight selection.
    pub fn summarizer(&self, show_progress: bool) -> anyhow::Result<Summarizer> {
        let config = &self.config;
        config.validate()?;

        let mut pipeline = load_pipeline_config(&config.workspace)?;
        if let Some(ref model) = self.model_override {
            pipeline.synthesis.model = model.clone();
            pipeline.quotes.model = model.clone();
        }

        let local = self.client_for(&config.provider)?;
        let cloud = if config.provider == "gemini" {
            local.clone()
        } else if config.resolve_api_key("gemini").is_some() {
            self.client_for("gemini")?
        } else {
            tracing::debug!("No Gemini key, cloud roles use the active provider");
            local.clone()
        };

        let prompts = PromptSet::load(&config.workspace)
            .context("Failed to load prompt templates")?;

        let mut summarizer = Summarizer::new(local, cloud, Arc::new(prompts), pipeline);
        if show_progress {
            summarizer = summarizer.with_progress(ProgressReporter::new(Arc::new(
                |event: ProgressEvent| eprintln!("{}", event.format_simple()),
            )));
        }

        Ok(summarizer)
    }

    fn client_for(&self, provider: &str) -> anyhow::Result<Arc<dyn LlmClient>> {
        let provider_config = self.config.get_provider_config(provider);
        let endpoint = provider_config.and_then(|pc| pc.endpoint());
        let timeout = match provider_config {
            Some(ProviderConfig::Ollama {
                timeout: Some(secs),
                ..
            }) => Some(Duration::from_secs(*secs)),
            _ => None,
        };
        let api_key = self.config.resolve_api_key(provider);

        create_client(provider, endpoint, api_key.as_deref(), timeout)
            .with_context(|| format!("Failed to create {} client", provider))
    }
}

/// Read text from a file, or from stdin when the path is absent or "-".
///
/// PDF and DOCX files are converted to plain text first.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => crate::document::extract_text(path),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Parse a JSON file into `T`.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Alice met Bob.").unwrap();

        let text = read_input(Some(file.path())).unwrap();
        assert_eq!(text, "Alice met Bob.");
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Some(Path::new("/definitely/not/here.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_read_input_rejects_unknown_type() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();

        let err = read_input(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("Unsupported file type"));
    }

    #[test]
    fn test_read_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_json::<serde_json::Value>(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_mock_provider_builds_summarizer() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            workspace: dir.path().to_path_buf(),
            provider: "mock".to_string(),
            ..AppConfig::default()
        };

        let ctx = RunContext {
            config,
            model_override: Some("tiny".to_string()),
            cancel: CancellationToken::new(),
        };

        let summarizer = ctx.summarizer(false).unwrap();
        assert_eq!(summarizer.config().synthesis.model, "tiny");
        assert_eq!(summarizer.config().quotes.model, "tiny");
    }
}
