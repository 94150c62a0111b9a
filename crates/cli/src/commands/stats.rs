//! Stats command handler.

use super::{print_json, read_input, RunContext};
use clap::Args;
use recap_pipeline::stats::text_stats;
use recap_pipeline::text::UnicodeTokenizer;
use std::path::PathBuf;

/// Show word, sentence and character counts
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Input file ("-" or absent reads stdin)
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub fn execute(&self, _ctx: &RunContext) -> anyhow::Result<()> {
        tracing::info!("Executing stats command");

        let text = read_input(self.file.as_deref())?;
        let stats = text_stats(&text, &UnicodeTokenizer);

        if self.json {
            return print_json(&stats);
        }

        println!("Words:      {}", stats.words);
        println!("Sentences:  {}", stats.sentences);
        println!("Characters: {}", stats.chars);

        Ok(())
    }
}
