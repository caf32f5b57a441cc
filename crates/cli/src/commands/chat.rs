//! Chat command handler.
//!
//! Reads questions line by line from stdin and keeps the running history.

use super::ask::{load_history, print_response};
use super::{build_approach, OverrideArgs};
use clap::Args;
use rrr_approach::Turn;
use rrr_core::{config::AppConfig, AppResult};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive conversation; one question per line, "exit" to quit
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// JSON file with earlier turns to continue from
    #[arg(long)]
    pub history: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Print each response as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let approach = build_approach(config)?;
        let overrides = self.overrides.to_overrides();

        let mut history = match self.history {
            Some(ref path) => load_history(path)?,
            None => Vec::new(),
        };

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            eprint!("> ");
            std::io::stderr().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if is_exit(question) {
                break;
            }

            history.push(Turn::question(question));
            match approach.run(&history, &overrides).await {
                Ok(response) => {
                    print_response(&response, self.json)?;
                    if let Some(turn) = history.last_mut() {
                        turn.bot = Some(response.answer);
                    }
                }
                Err(e) => {
                    // Drop the unanswered turn so the next question starts clean
                    history.pop();
                    tracing::error!("Request failed: {}", e);
                    eprintln!("Error: {}", e);
                }
            }
        }

        tracing::debug!("Chat ended after {} turns", history.len());
        Ok(())
    }
}

fn is_exit(line: &str) -> bool {
    matches!(line, "exit" | "quit" | ":q")
}
