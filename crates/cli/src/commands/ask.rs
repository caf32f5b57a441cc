//! Ask command handler.
//!
//! Answers one question, optionally continuing a conversation saved as JSON.

use super::{build_approach, OverrideArgs};
use clap::Args;
use rrr_approach::{ChatResponse, Turn};
use rrr_core::{config::AppConfig, AppError, AppResult};
use std::path::{Path, PathBuf};

/// Answer a question from the search index
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// JSON file with earlier turns: [{"user": "...", "bot": "..."}, ...]
    #[arg(long)]
    pub history: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Output the full response (data_points, answer, thoughts) as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let mut history = match self.history {
            Some(ref path) => load_history(path)?,
            None => Vec::new(),
        };
        history.push(Turn::question(self.question.clone()));

        let approach = build_approach(config)?;
        let response = approach
            .run(&history, &self.overrides.to_overrides())
            .await?;

        print_response(&response, self.json)
    }
}

/// Read earlier turns from a JSON file.
pub fn load_history(path: &Path) -> AppResult<Vec<Turn>> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        AppError::Input(format!("Invalid history file {:?}: {}", path, e))
    })
}

/// Print a response as plain text or JSON on stdout.
pub fn print_response(response: &ChatResponse, json: bool) -> AppResult<()> {
    if json {
        let json = serde_json::to_string_pretty(response)?;
        println!("{}", json);
    } else {
        println!("{}", response.answer);

        for data_point in &response.data_points {
            tracing::debug!("Source: {}", data_point);
        }
        tracing::debug!("Thoughts: {}", response.thoughts);
    }

    Ok(())
}
