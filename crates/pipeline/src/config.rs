//! Pipeline configuration.
//!
//! Every tunable of the pipeline lives here. Values are read from
//! `.recap/pipeline.yaml` in the workspace; any field left out keeps its
//! default.

use crate::chunk::ChunkConfig;
use crate::highlights::{HighlightConfig, MapperConfig, MergeConfig, MergePolicy, QuoteConfig};
use crate::score::ScoringConfig;
use crate::skeleton::SkeletonConfig;
use crate::synthesis::SynthesisConfig;
use recap_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// All pipeline settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunk: ChunkConfig,
    pub scoring: ScoringConfig,
    pub skeleton: SkeletonConfig,
    pub synthesis: SynthesisConfig,
    pub quotes: QuoteConfig,
    pub highlights: HighlightConfig,
    pub mapper: MapperConfig,
    pub merge: MergeConfig,
}

impl PipelineConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk.max_tokens == 0 {
            return Err(invalid("chunk.max_tokens must be greater than 0"));
        }
        if self.chunk.overlap >= self.chunk.max_tokens {
            return Err(invalid("chunk.overlap must be smaller than chunk.max_tokens"));
        }
        if self.chunk.pseudo_sentence_words == 0 || self.scoring.pseudo_sentence_words == 0 {
            return Err(invalid("pseudo_sentence_words must be greater than 0"));
        }
        if self.quotes.window_chars == 0 {
            return Err(invalid("quotes.window_chars must be greater than 0"));
        }
        if self.quotes.overlap_chars >= self.quotes.window_chars {
            return Err(invalid("quotes.overlap_chars must be smaller than quotes.window_chars"));
        }
        if self.mapper.buffer_secs < 0.0 || self.mapper.buffer_secs.is_nan() {
            return Err(invalid("mapper.buffer_secs must not be negative"));
        }
        if self.highlights.models.is_empty() {
            return Err(invalid("highlights.models must name at least one model"));
        }
        validate_policy("merge.llm", &self.merge.llm)?;
        validate_policy("merge.quotes", &self.merge.quotes)?;
        Ok(())
    }
}

fn validate_policy(name: &str, policy: &MergePolicy) -> AppResult<()> {
    if policy.max_gap < 0.0 {
        return Err(invalid(&format!("{}.max_gap must not be negative", name)));
    }
    if matches!(policy.max_duration, Some(cap) if cap <= 0.0) {
        return Err(invalid(&format!("{}.max_duration must be positive", name)));
    }
    Ok(())
}

fn invalid(message: &str) -> AppError {
    AppError::Config(format!("Invalid pipeline config: {}", message))
}

/// Path to the pipeline config file of a workspace.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".recap").join("pipeline.yaml")
}

/// Load the pipeline configuration of a workspace.
///
/// A missing file yields the defaults. A file that cannot be read or parsed,
/// or that fails validation, is an error.
pub fn load_pipeline_config(workspace: &Path) -> AppResult<PipelineConfig> {
    let config_path = get_config_path(workspace);

    if !config_path.exists() {
        tracing::debug!("No pipeline config at {:?}, using defaults", config_path);
        return Ok(PipelineConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        AppError::Config(format!("Failed to read pipeline config at {:?}: {}", config_path, e))
    })?;

    let config: PipelineConfig = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Config(format!("Failed to parse pipeline config at {:?}: {}", config_path, e))
    })?;

    config.validate()?;

    tracing::debug!("Loaded pipeline config from {:?}", config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, yaml: &str) {
        let dir = temp.path().join(".recap");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("pipeline.yaml"), yaml).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_pipeline_config(temp.path()).unwrap();

        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.chunk.max_tokens, 600);
        assert_eq!(config.highlights.models[0], "gemma-3-27b-it");
        assert_eq!(config.merge.llm.max_duration, Some(180.0));
        assert_eq!(config.merge.quotes.max_duration, None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        write_config(
            &temp,
            r#"
chunk:
  max_tokens: 300
highlights:
  models: [gemini-2.5-flash]
  retry:
    on_service_error: false
merge:
  quotes:
    max_gap: 5
"#,
        );

        let config = load_pipeline_config(temp.path()).unwrap();
        assert_eq!(config.chunk.max_tokens, 300);
        assert_eq!(config.chunk.overlap, 50);
        assert_eq!(config.highlights.models, vec!["gemini-2.5-flash"]);
        assert!(!config.highlights.retry.on_service_error);
        assert!(config.highlights.retry.on_rate_limit);
        assert_eq!(config.highlights.transcript_char_limit, 35_000);
        assert_eq!(config.merge.quotes.max_gap, 5.0);
        assert_eq!(config.merge.quotes.max_duration, None);
        assert_eq!(config.merge.llm, MergePolicy::llm());
        assert_eq!(config.synthesis.model, "gemma3:12b");
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        write_config(&temp, "chunk: [not, a, map");

        let err = load_pipeline_config(temp.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let temp = TempDir::new().unwrap();
        write_config(&temp, "chunk:\n  max_tokens: 40\n  overlap: 50\n");
        assert!(matches!(
            load_pipeline_config(temp.path()),
            Err(AppError::Config(_))
        ));

        let mut config = PipelineConfig::default();
        config.highlights.models.clear();
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.merge.llm.max_duration = Some(0.0);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.mapper.buffer_secs = -1.0;
        assert!(config.validate().is_err());

        assert!(PipelineConfig::default().validate().is_ok());
    }
}
