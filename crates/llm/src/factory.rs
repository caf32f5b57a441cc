//! Completion provider factory.
//!
//! Builds an `LlmClient` from a provider name and the connection settings
//! resolved from configuration.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Connection settings for a completion client.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions<'a> {
    /// Endpoint URL; required for Azure OpenAI
    pub endpoint: Option<&'a str>,

    /// API key for providers that require it
    pub api_key: Option<&'a str>,

    /// Azure OpenAI REST API version
    pub api_version: Option<&'a str>,

    /// OpenAI organization id, sent as `OpenAI-Organization`
    pub organization: Option<&'a str>,

    /// Per-request timeout
    pub timeout: Option<Duration>,
}

/// Create a completion client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("azure-openai", "openai", "ollama")
/// * `options` - Endpoint, key and transport settings
///
/// # Errors
/// Returns an error message if the provider is unknown, a required endpoint
/// or secret is missing, or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    options: &ClientOptions<'_>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    match provider_type {
        ProviderType::Ollama => {
            let base_url = options.endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            let client = match options.timeout {
                Some(timeout) => {
                    OllamaClient::with_timeout(base_url, timeout).map_err(|e| e.to_string())?
                }
                None => OllamaClient::with_base_url(base_url),
            };
            Ok(Arc::new(client))
        }
        ProviderType::AzureOpenAi | ProviderType::OpenAi => {
            Ok(Arc::new(build_openai(provider_type, options)?))
        }
    }
}

fn build_openai(
    provider_type: ProviderType,
    options: &ClientOptions<'_>,
) -> Result<OpenAiClient, String> {
    let api_key = match options.api_key {
        Some(key) => key,
        None if provider_type.requires_api_key() => {
            return Err(format!("{} provider requires API key", provider_type.as_str()))
        }
        None => "",
    };

    let client = if provider_type == ProviderType::AzureOpenAi {
        let endpoint = options
            .endpoint
            .ok_or("azure-openai provider requires an endpoint")?;
        OpenAiClient::azure(endpoint, api_key, options.api_version)
    } else {
        let client = OpenAiClient::openai(options.endpoint, api_key);
        match options.organization {
            Some(organization) => client.with_organization(organization),
            None => client,
        }
    };

    match options.timeout {
        Some(timeout) => client.with_timeout(timeout).map_err(|e| e.to_string()),
        None => Ok(client),
    }
}
