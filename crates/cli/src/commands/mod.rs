//! Command handlers for the rrr CLI.

pub mod ask;
pub mod chat;
pub mod prompts;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use prompts::PromptsCommand;

use clap::Args;
use rrr_approach::{ChatReadRetrieveRead, Overrides, PromptOverride};
use rrr_core::{config::AppConfig, AppResult};
use rrr_prompt::load_prompt_pack;

/// Per-request options shared by `ask` and `chat`.
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Number of documents to retrieve (default: 3)
    #[arg(long)]
    pub top: Option<usize>,

    /// Exclude documents of this category
    #[arg(long)]
    pub exclude_category: Option<String>,

    /// Use semantic ranking
    #[arg(long)]
    pub semantic_ranker: bool,

    /// Use extractive captions instead of raw content (with --semantic-ranker)
    #[arg(long)]
    pub semantic_captions: bool,

    /// Ask for follow-up questions in the answer
    #[arg(long)]
    pub suggest_followup_questions: bool,

    /// Answer template; prefix with ">>>" to inject text into the default one
    #[arg(long)]
    pub prompt_template: Option<String>,

    /// Answer sampling temperature (default: 0.7)
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl OverrideArgs {
    /// Overrides for the orchestrator.
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            semantic_captions: self.semantic_captions,
            top: self.top,
            exclude_category: self.exclude_category.clone(),
            semantic_ranker: self.semantic_ranker,
            suggest_followup_questions: self.suggest_followup_questions,
            prompt_template: PromptOverride::from_wire(self.prompt_template.as_deref()),
            temperature: self.temperature,
        }
    }
}

/// Validate configuration and build the orchestrator with the active prompt pack.
pub fn build_approach(config: &AppConfig) -> AppResult<ChatReadRetrieveRead> {
    config.validate()?;

    let pack = load_prompt_pack(&config.workspace, &config.approach.prompt_pack)?;
    tracing::debug!("Using prompt pack: {}", pack.id);

    ChatReadRetrieveRead::from_config(config, pack)
}
