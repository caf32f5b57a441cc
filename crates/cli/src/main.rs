//! rrr CLI
//!
//! Main entry point for the rrr command-line tool.
//! Answers questions over a search index with chat read-retrieve-read.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, PromptsCommand};
use rrr_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// rrr - grounded answers from your document index
#[derive(Parser, Debug)]
#[command(name = "rrr")]
#[command(about = "Chat read-retrieve-read over a search index", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RRR_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RRR_CONFIG")]
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

    /// Completion provider (azure-openai, openai, ollama)
    #[arg(short, long, global = true, env = "RRR_PROVIDER")]
    provider: Option<String>,

    /// Search index name
    #[arg(short, long, global = true, env = "RRR_SEARCH_INDEX")]
    index: Option<String>,

    /// Prompt pack id under .rrr/prompts/
    #[arg(long, global = true)]
    prompt_pack: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one question, optionally continuing a saved conversation
    Ask(AskCommand),

    /// Interactive conversation on stdin
    Chat(ChatCommand),

    /// List available prompt packs
    Prompts(PromptsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace, cli.config)
        .context("Failed to load configuration")?;

    let mut config = config.with_overrides(
        cli.provider,
        cli.index,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    if let Some(pack) = cli.prompt_pack {
        config.approach.prompt_pack = pack;
    }

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("rrr CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Prompts(_) => "prompts",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Prompts(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    Ok(result?)
}
