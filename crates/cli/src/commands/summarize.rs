//! Summarize command handler.

use super::{print_json, read_input, RunContext};
use clap::Args;
use recap_pipeline::{FormatMode, LengthPreference};
use std::path::PathBuf;

/// Summarize a document or transcript text
#[derive(Args, Debug)]
pub struct SummarizeCommand {
    /// Input file ("-" or absent reads stdin)
    pub file: Option<PathBuf>,

    /// Summary length (short, medium, long, detailed)
    #[arg(short, long, default_value = "medium")]
    pub length: String,

    /// Summary layout (paragraph, bullet)
    #[arg(short, long, default_value = "paragraph")]
    pub format: String,

    /// Output the summary and statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Print progress events to stderr
    #[arg(long)]
    pub progress: bool,
}

impl SummarizeCommand {
    pub async fn execute(&self, ctx: &RunContext) -> anyhow::Result<()> {
        tracing::info!("Executing summarize command");
        tracing::debug!("Summarize options: {:?}", self);

        let text = read_input(self.file.as_deref())?;
        let length = LengthPreference::parse(&self.length);
        let format = FormatMode::parse(&self.format);

        let summarizer = ctx.summarizer(self.progress)?;
        let result = summarizer
            .summarize(&text, length, format, &ctx.cancel)
            .await?;

        if self.json {
            return print_json(&result);
        }

        println!("{}", result.summary_text);

        if let Some(stats) = result.stats {
            eprintln!();
            eprintln!(
                "Original: {} words, {} sentences, {} chars",
                stats.original.words, stats.original.sentences, stats.original.chars
            );
            eprintln!(
                "Summary:  {} words, {} sentences, {} chars",
                stats.summary.words, stats.summary.sentences, stats.summary.chars
            );
        }

        Ok(())
    }
}
