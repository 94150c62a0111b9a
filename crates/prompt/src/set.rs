//! Built-in prompt catalogue with workspace overrides.

use crate::builder::build_prompt;
use crate::loader::{list_prompts, load_prompt, parse_prompt};
use crate::types::{BuiltPrompt, PromptDefinition};
use recap_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;

/// Fact-skeleton synthesis (summary path).
pub const SUMMARY_SYNTHESIZE: &str = "summary.synthesize";
/// Multimodal summary with transcript, metadata and frames.
pub const SUMMARY_VISUAL: &str = "summary.visual";
/// Summary from frames and metadata when no transcript exists.
pub const SUMMARY_VISUAL_ONLY: &str = "summary.visual_only";
/// Highlight segment selection over a timestamped transcript.
pub const HIGHLIGHTS_LLM: &str = "highlights.llm";
/// Verbatim quote extraction over one transcript window.
pub const HIGHLIGHTS_QUOTES: &str = "highlights.quotes";

const BUILTIN_SOURCES: [(&str, &str); 5] = [
    (
        SUMMARY_SYNTHESIZE,
        include_str!("../prompts/summary.synthesize.yml"),
    ),
    (SUMMARY_VISUAL, include_str!("../prompts/summary.visual.yml")),
    (
        SUMMARY_VISUAL_ONLY,
        include_str!("../prompts/summary.visual_only.yml"),
    ),
    (HIGHLIGHTS_LLM, include_str!("../prompts/highlights.llm.yml")),
    (
        HIGHLIGHTS_QUOTES,
        include_str!("../prompts/highlights.quotes.yml"),
    ),
];

/// The prompts the pipeline renders, keyed by ID.
#[derive(Debug, Clone)]
pub struct PromptSet {
    prompts: HashMap<String, PromptDefinition>,
}

impl PromptSet {
    /// The built-in prompts shipped with the crate.
    pub fn builtin() -> AppResult<Self> {
        let mut prompts = HashMap::new();

        for (id, source) in BUILTIN_SOURCES {
            let definition = parse_prompt(source, id)?;
            prompts.insert(definition.id.clone(), definition);
        }

        Ok(Self { prompts })
    }

    /// Built-in prompts, replaced by any `.recap/prompts/<id>.yml` found in
    /// the workspace.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        let mut set = Self::builtin()?;

        for prompt_id in list_prompts(workspace_path)? {
            let definition = load_prompt(workspace_path, &prompt_id)?;

            if definition.id != prompt_id {
                tracing::warn!(
                    file = %prompt_id,
                    id = %definition.id,
                    "Prompt file name does not match its id; using the id"
                );
            }

            if set.prompts.contains_key(&definition.id) {
                tracing::info!("Overriding built-in prompt: {}", definition.id);
            }
            set.insert(definition);
        }

        Ok(set)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, definition: PromptDefinition) {
        self.prompts.insert(definition.id.clone(), definition);
    }

    /// Look up a definition by ID.
    pub fn get(&self, prompt_id: &str) -> AppResult<&PromptDefinition> {
        self.prompts
            .get(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))
    }

    /// Render a prompt by ID.
    pub fn build(
        &self,
        prompt_id: &str,
        variables: HashMap<String, String>,
    ) -> AppResult<BuiltPrompt> {
        build_prompt(self.get(prompt_id)?, variables)
    }

    /// IDs of every prompt in the set, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.prompts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
