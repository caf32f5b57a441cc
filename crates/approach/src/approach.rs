//! The read-retrieve-read flow.

use crate::generator::generate_answer;
use crate::overrides::Overrides;
use crate::response::ChatResponse;
use crate::retriever::Retriever;
use crate::rewriter::rewrite_query;
use rrr_core::{AppConfig, AppError, AppResult};
use rrr_llm::{create_client, ClientOptions, LlmClient};
use rrr_prompt::{PromptPack, Turn};
use rrr_search::{AzureSearchClient, SearchClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Deployment names, index field names and prompts used by the flow.
#[derive(Debug, Clone)]
pub struct ApproachSettings {
    /// Deployment used for query rewriting
    pub gpt_deployment: String,

    /// Deployment used for answer generation
    pub chatgpt_deployment: String,

    /// Field naming the source document of a search result
    pub sourcepage_field: String,

    /// Field holding the raw text of a search result
    pub content_field: String,

    /// Approximate token budget for rendered history
    pub history_token_budget: usize,

    /// Templates for both completion stages
    pub prompt_pack: PromptPack,
}

impl Default for ApproachSettings {
    fn default() -> Self {
        Self {
            gpt_deployment: "davinci".to_string(),
            chatgpt_deployment: "chat".to_string(),
            sourcepage_field: "sourcepage".to_string(),
            content_field: "content".to_string(),
            history_token_budget: 1000,
            prompt_pack: PromptPack::default(),
        }
    }
}

impl ApproachSettings {
    /// Settings from loaded configuration and a resolved prompt pack.
    pub fn from_config(config: &AppConfig, prompt_pack: PromptPack) -> Self {
        Self {
            gpt_deployment: config.approach.gpt_deployment.clone(),
            chatgpt_deployment: config.approach.chatgpt_deployment.clone(),
            sourcepage_field: config.search.sourcepage_field.clone(),
            content_field: config.search.content_field.clone(),
            history_token_budget: config.approach.history_token_budget,
            prompt_pack,
        }
    }
}

/// Chat read-retrieve-read: rewrite, retrieve, then answer.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct ChatReadRetrieveRead {
    llm: Arc<dyn LlmClient>,
    retriever: Retriever,
    settings: ApproachSettings,
}

impl ChatReadRetrieveRead {
    /// Create the flow over a completion client and a search client.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchClient>,
        settings: ApproachSettings,
    ) -> Self {
        let retriever = Retriever::new(
            search,
            settings.sourcepage_field.clone(),
            settings.content_field.clone(),
        );
        Self {
            llm,
            retriever,
            settings,
        }
    }

    /// Build both service clients from configuration.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the provider, endpoint, index or a
    /// required key cannot be resolved.
    pub fn from_config(config: &AppConfig, prompt_pack: PromptPack) -> AppResult<Self> {
        let provider_config = config.get_provider_config(&config.provider);
        let endpoint = config.resolve_llm_endpoint();
        let api_key = config.resolve_api_key();
        let organization = config.resolve_organization();

        let options = ClientOptions {
            endpoint: endpoint.as_deref(),
            api_key: api_key.as_deref(),
            api_version: provider_config.and_then(|pc| pc.api_version()),
            organization: organization.as_deref(),
            timeout: provider_config
                .and_then(|pc| pc.timeout())
                .map(Duration::from_secs),
        };
        let llm = create_client(&config.provider, &options).map_err(AppError::Config)?;

        let search_endpoint = config.search.endpoint.as_deref().ok_or_else(|| {
            AppError::Config("Search endpoint is not configured".to_string())
        })?;
        let index = config
            .search
            .index
            .as_deref()
            .ok_or_else(|| AppError::Config("Search index is not configured".to_string()))?;
        let search_key = config.resolve_search_key().ok_or_else(|| {
            AppError::Config(format!(
                "Search key not found in environment variable: {}",
                config.search.key_env
            ))
        })?;

        let mut search = AzureSearchClient::new(search_endpoint, index, search_key)
            .with_api_version(config.search.api_version.clone());
        if let Some(secs) = config.search.timeout {
            search = search.with_timeout(Duration::from_secs(secs))?;
        }

        tracing::debug!(
            provider = llm.provider_name(),
            index = index,
            "Initialized completion and search clients"
        );

        Ok(Self::new(
            llm,
            Arc::new(search),
            ApproachSettings::from_config(config, prompt_pack),
        ))
    }

    /// Settings in use.
    pub fn settings(&self) -> &ApproachSettings {
        &self.settings
    }

    /// Answer the last turn of `history`.
    ///
    /// The three stages run strictly in sequence; the first error aborts the
    /// run and is returned unchanged.
    ///
    /// # Errors
    /// * `AppError::Input` if the history is empty or the last question is blank
    /// * `AppError::Llm` / `AppError::Search` on upstream failures
    /// * `AppError::Prompt` if a template cannot be rendered
    #[instrument(skip(self, history, overrides), fields(turns = history.len()))]
    pub async fn run(&self, history: &[Turn], overrides: &Overrides) -> AppResult<ChatResponse> {
        let question = match history.last() {
            Some(turn) => turn.user.as_str(),
            None => return Err(AppError::Input("Chat history is empty".to_string())),
        };
        if question.trim().is_empty() {
            return Err(AppError::Input(
                "The last turn has no user question".to_string(),
            ));
        }

        // Stage 1: standalone search query
        let query = rewrite_query(
            self.llm.as_ref(),
            &self.settings.gpt_deployment,
            &self.settings.prompt_pack,
            history,
            question,
            self.settings.history_token_budget,
        )
        .await?;

        // Stage 2: sources
        let retrieval = self.retriever.retrieve(&query, overrides).await?;

        // Stage 3: grounded answer
        let generation = generate_answer(
            self.llm.as_ref(),
            &self.settings.chatgpt_deployment,
            &self.settings.prompt_pack,
            history,
            &retrieval.content(),
            overrides,
            self.settings.history_token_budget,
        )
        .await?;

        Ok(ChatResponse::new(
            retrieval.data_points,
            generation.answer,
            &query,
            &generation.prompt,
        ))
    }
}
