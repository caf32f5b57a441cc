//! Prompts command handler.

use clap::Args;
use rrr_core::{config::AppConfig, AppResult};
use rrr_prompt::list_prompt_packs;

/// List prompt packs in the workspace
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing prompts command");

        let packs = list_prompt_packs(&config.workspace)?;
        let active = config.approach.prompt_pack.as_str();

        if self.json {
            let output = serde_json::json!({
                "active": active,
                "packs": packs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for pack in &packs {
                let marker = if pack == active { "*" } else { " " };
                println!("{} {}", marker, pack);
            }
        }

        Ok(())
    }
}
