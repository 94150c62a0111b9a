//! recap CLI
//!
//! Main entry point for the recap command-line tool.
//! Summarizes documents and transcripts and picks video highlights.

mod commands;
mod document;

use clap::{Parser, Subcommand};
use commands::{HighlightsCommand, RunContext, StatsCommand, SummarizeCommand};
use recap_core::{config::AppConfig, logging, CancellationToken};
use std::path::PathBuf;

/// recap - transcript summaries and video highlights
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(about = "Summaries and highlights for long transcripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RECAP_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RECAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (ollama, gemini, mock)
    #[arg(short, long, global = true, env = "RECAP_PROVIDER")]
    provider: Option<String>,

    /// Model for local synthesis and quote extraction
    #[arg(short, long, global = true, env = "RECAP_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a document or transcript text
    Summarize(SummarizeCommand),

    /// Pick highlight clips from a timed transcript
    Highlights(HighlightsCommand),

    /// Show word, sentence and character counts
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    let model_override = cli.model.clone();
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(
        config.log_level.as_deref(),
        config.no_color,
        config.log_format(),
    )?;

    tracing::info!("recap starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let command_name = match &cli.command {
        Commands::Summarize(_) => "summarize",
        Commands::Highlights(_) => "highlights",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let ctx = RunContext {
        config,
        model_override,
        cancel,
    };

    let result = match cli.command {
        Commands::Summarize(cmd) => cmd.execute(&ctx).await,
        Commands::Highlights(cmd) => cmd.execute(&ctx).await,
        Commands::Stats(cmd) => cmd.execute(&ctx),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {:#}", e),
    }

    result
}

/// Cancel the running pipeline on the first Ctrl-C.
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            cancel.cancel();
        }
    });
}
