//! Configuration management for rrr.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.rrr/config.yaml` in the workspace, or `RRR_CONFIG`)
//! - Environment variables
//! - Command-line flags (see [`AppConfig::with_overrides`])

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the completion factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["azure-openai", "openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .rrr/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider ("azure-openai", "openai", "ollama")
    pub provider: String,

    /// Explicit API key for the completion provider
    pub api_key: Option<String>,

    /// Explicit endpoint for the completion provider
    pub llm_endpoint: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Completion provider configurations
    pub llm: Option<LlmConfig>,

    /// Search service settings
    pub search: SearchConfig,

    /// Orchestration settings
    pub approach: ApproachConfig,
}

/// LLM section of config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProviderConfig {
    AzureOpenai {
        endpoint: String,
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        #[serde(rename = "apiVersion")]
        api_version: Option<String>,
        timeout: Option<u64>,
    },
    Openai {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        endpoint: Option<String>,
        #[serde(rename = "organizationEnv")]
        organization_env: Option<String>,
        timeout: Option<u64>,
    },
    Ollama {
        endpoint: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Endpoint configured for this provider, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::AzureOpenai { endpoint, .. } => Some(endpoint),
            Self::Openai { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }

    /// Request timeout in seconds, if configured.
    pub fn timeout(&self) -> Option<u64> {
        match self {
            Self::AzureOpenai { timeout, .. }
            | Self::Openai { timeout, .. }
            | Self::Ollama { timeout, .. } => *timeout,
        }
    }

    /// Environment variable holding the API key, for providers that need one.
    pub fn api_key_env(&self) -> Option<&str> {
        match self {
            Self::AzureOpenai { api_key_env, .. } | Self::Openai { api_key_env, .. } => {
                Some(api_key_env)
            }
            Self::Ollama { .. } => None,
        }
    }

    /// Azure OpenAI REST API version, if configured.
    pub fn api_version(&self) -> Option<&str> {
        match self {
            Self::AzureOpenai { api_version, .. } => api_version.as_deref(),
            _ => None,
        }
    }

    /// Environment variable holding the OpenAI organization id, if configured.
    pub fn organization_env(&self) -> Option<&str> {
        match self {
            Self::Openai {
                organization_env, ..
            } => organization_env.as_deref(),
            _ => None,
        }
    }
}

/// Search service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Service endpoint, e.g. `https://<service>.search.windows.net`
    pub endpoint: Option<String>,

    /// Index name
    pub index: Option<String>,

    /// Environment variable holding the query key
    #[serde(rename = "keyEnv")]
    pub key_env: String,

    /// REST API version
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Field naming the source document of a result
    #[serde(rename = "sourcepageField")]
    pub sourcepage_field: String,

    /// Field holding the raw text of a result
    #[serde(rename = "contentField")]
    pub content_field: String,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            index: None,
            key_env: "RRR_SEARCH_KEY".to_string(),
            api_version: "2021-04-30-Preview".to_string(),
            sourcepage_field: "sourcepage".to_string(),
            content_field: "content".to_string(),
            timeout: None,
        }
    }
}

/// Orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachConfig {
    /// Deployment used to rewrite the conversation into a search query
    #[serde(rename = "gptDeployment")]
    pub gpt_deployment: String,

    /// Deployment used to generate the grounded answer
    #[serde(rename = "chatgptDeployment")]
    pub chatgpt_deployment: String,

    /// Approximate token budget for rendered chat history
    #[serde(rename = "historyTokenBudget")]
    pub history_token_budget: usize,

    /// Prompt pack id under `.rrr/prompts/`
    #[serde(rename = "promptPack")]
    pub prompt_pack: String,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            gpt_deployment: "davinci".to_string(),
            chatgpt_deployment: "chat".to_string(),
            history_token_budget: 1000,
            prompt_pack: "default".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    search: Option<SearchConfig>,
    approach: Option<ApproachConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "azure-openai".to_string(),
            api_key: None,
            llm_endpoint: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            search: SearchConfig::default(),
            approach: ApproachConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// The workspace and config file come from the given paths (command-line
    /// flags) first, then `RRR_WORKSPACE` / `RRR_CONFIG`. An explicitly named
    /// config file must exist.
    ///
    /// Environment variables:
    /// - `RRR_WORKSPACE`: Override workspace path
    /// - `RRR_CONFIG`: Path to config file
    /// - `RRR_PROVIDER`: Completion provider
    /// - `RRR_OPENAI_ENDPOINT` / `RRR_OPENAI_KEY`: Completion endpoint and key
    /// - `RRR_SEARCH_ENDPOINT` / `RRR_SEARCH_INDEX`: Search service and index
    /// - `RRR_GPT_DEPLOYMENT` / `RRR_CHATGPT_DEPLOYMENT`: Deployment names
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace
            .or_else(|| std::env::var("RRR_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("RRR_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.rrr_dir().join("config.yaml"),
        };

        if config.config_file.is_some() && !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("RRR_PROVIDER") {
            config.provider = provider;
        }
        if let Ok(endpoint) = std::env::var("RRR_OPENAI_ENDPOINT") {
            config.llm_endpoint = Some(endpoint);
        }
        if let Ok(key) = std::env::var("RRR_OPENAI_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(endpoint) = std::env::var("RRR_SEARCH_ENDPOINT") {
            config.search.endpoint = Some(endpoint);
        }
        if let Ok(index) = std::env::var("RRR_SEARCH_INDEX") {
            config.search.index = Some(index);
        }
        if let Ok(deployment) = std::env::var("RRR_GPT_DEPLOYMENT") {
            config.approach.gpt_deployment = deployment;
        }
        if let Ok(deployment) = std::env::var("RRR_CHATGPT_DEPLOYMENT") {
            config.approach.chatgpt_deployment = deployment;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(approach) = config_file.approach {
            result.approach = approach;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over environment variables and the config file.
    /// Workspace and config file paths are given to [`AppConfig::load_with`]
    /// instead, since they decide which file is read.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        search_index: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(index) = search_index {
            self.search.index = Some(index);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .rrr directory.
    pub fn rrr_dir(&self) -> PathBuf {
        self.workspace.join(".rrr")
    }

    /// Get the configuration for a completion provider.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve the completion endpoint: explicit override, then provider config.
    pub fn resolve_llm_endpoint(&self) -> Option<String> {
        self.llm_endpoint.clone().or_else(|| {
            self.get_provider_config(&self.provider)
                .and_then(|pc| pc.endpoint())
                .map(str::to_string)
        })
    }

    /// Resolve the completion API key: explicit key, then the provider's key variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        self.get_provider_config(&self.provider)
            .and_then(|pc| pc.api_key_env())
            .and_then(|env_var| std::env::var(env_var).ok())
    }

    /// Resolve the OpenAI organization id from the provider's organization variable.
    pub fn resolve_organization(&self) -> Option<String> {
        self.get_provider_config(&self.provider)
            .and_then(|pc| pc.organization_env())
            .and_then(|env_var| std::env::var(env_var).ok())
    }

    /// Resolve the search query key from the configured environment variable.
    pub fn resolve_search_key(&self) -> Option<String> {
        std::env::var(&self.search.key_env).ok()
    }

    /// Validate configuration for the active provider and the search service.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if let Some(provider_config) = self.get_provider_config(provider) {
            if let Some(env_var) = provider_config.api_key_env() {
                if self.api_key.is_none() && std::env::var(env_var).is_err() {
                    return Err(AppError::Config(format!(
                        "API key not found in environment variable: {}",
                        env_var
                    )));
                }
            }
        }

        if self.search.endpoint.is_none() {
            return Err(AppError::Config(
                "Search endpoint is not configured (search.endpoint or RRR_SEARCH_ENDPOINT)"
                    .to_string(),
            ));
        }

        if self.search.index.is_none() {
            return Err(AppError::Config(
                "Search index is not configured (search.index or RRR_SEARCH_INDEX)".to_string(),
            ));
        }

        if self.approach.history_token_budget == 0 {
            return Err(AppError::Config(
                "approach.historyTokenBudget must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
