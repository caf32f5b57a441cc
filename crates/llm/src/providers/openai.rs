//! OpenAI-style completions provider.
//!
//! Covers both Azure OpenAI, where the model is addressed as a deployment in
//! the URL and authenticated with an `api-key` header, and the public OpenAI
//! API, where the model travels in the body with bearer auth.

use crate::client::{LlmChoice, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::types::ProviderType;
use rrr_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Azure OpenAI REST API version.
pub const DEFAULT_AZURE_API_VERSION: &str = "2022-12-01";

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Which dialect of the completions API to speak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAiFlavor {
    /// `{endpoint}/openai/deployments/{model}/completions?api-version=..`
    Azure { api_version: String },
    /// `{endpoint}/v1/completions`
    OpenAi,
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    n: u32,
    #[serde(skip_serializing_if = "no_stop")]
    stop: &'a [String],
}

fn no_stop(stop: &&[String]) -> bool {
    stop.is_empty()
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<LlmUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Completions client for Azure OpenAI and OpenAI.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    flavor: OpenAiFlavor,
    organization: Option<String>,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Client for an Azure OpenAI resource, e.g. `https://<name>.openai.azure.com`.
    pub fn azure(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: Option<&str>,
    ) -> Self {
        Self {
            base_url: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            flavor: OpenAiFlavor::Azure {
                api_version: api_version.unwrap_or(DEFAULT_AZURE_API_VERSION).to_string(),
            },
            organization: None,
            client: reqwest::Client::new(),
        }
    }

    /// Client for the public OpenAI API or a compatible server.
    pub fn openai(endpoint: Option<&str>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: endpoint
                .unwrap_or(DEFAULT_OPENAI_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.into(),
            flavor: OpenAiFlavor::OpenAi,
            organization: None,
            client: reqwest::Client::new(),
        }
    }

    /// Send requests on behalf of an OpenAI organization.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Organization sent as `OpenAI-Organization`, if any.
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Replace the HTTP client with one that times out after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> AppResult<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Resolve the completions URL for a model or deployment.
    pub(crate) fn completions_url(&self, model: &str) -> String {
        match &self.flavor {
            OpenAiFlavor::Azure { api_version } => format!(
                "{}/openai/deployments/{}/completions?api-version={}",
                self.base_url, model, api_version
            ),
            OpenAiFlavor::OpenAi => {
                if self.base_url.ends_with("/v1") {
                    format!("{}/completions", self.base_url)
                } else {
                    format!("{}/v1/completions", self.base_url)
                }
            }
        }
    }

    fn to_body<'a>(&self, request: &'a LlmRequest) -> CompletionBody<'a> {
        CompletionBody {
            // Azure addresses the deployment in the URL
            model: match self.flavor {
                OpenAiFlavor::Azure { .. } => None,
                OpenAiFlavor::OpenAi => Some(request.model.as_str()),
            },
            prompt: &request.prompt,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            n: request.n,
            stop: &request.stop,
        }
    }

    fn convert_response(&self, request: &LlmRequest, response: CompletionResponse) -> LlmResponse {
        LlmResponse {
            choices: response
                .choices
                .into_iter()
                .map(|choice| LlmChoice {
                    text: choice.text,
                    finish_reason: choice.finish_reason,
                })
                .collect(),
            model: response.model.unwrap_or_else(|| request.model.clone()),
            usage: response.usage.unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        match self.flavor {
            OpenAiFlavor::Azure { .. } => ProviderType::AzureOpenAi.as_str(),
            OpenAiFlavor::OpenAi => ProviderType::OpenAi.as_str(),
        }
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(
            provider = self.provider_name(),
            model = %request.model,
            "Sending completion request"
        );
        tracing::debug!("Request: {:?}", request);

        let url = self.completions_url(&request.model);
        let builder = self.client.post(&url).json(&self.to_body(request));
        let builder = match self.flavor {
            OpenAiFlavor::Azure { .. } => builder.header("api-key", &self.api_key),
            OpenAiFlavor::OpenAi => builder.bearer_auth(&self.api_key),
        };
        let builder = match self.organization {
            Some(ref organization) => builder.header("OpenAI-Organization", organization),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            AppError::Llm(format!(
                "Failed to send request to {}: {}",
                self.provider_name(),
                e
            ))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "{} API error ({}): {}",
                self.provider_name(),
                status,
                error_text
            )));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            AppError::Llm(format!("Failed to parse completion response: {}", e))
        })?;

        tracing::info!(choices = parsed.choices.len(), "Received completion");

        Ok(self.convert_response(request, parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_azure_completions_url() {
        let client = OpenAiClient::azure("https://res.openai.azure.com/", "key", None);
        assert_eq!(
            client.completions_url("chat"),
            "https://res.openai.azure.com/openai/deployments/chat/completions?api-version=2022-12-01"
        );
        assert_eq!(client.provider_name(), "azure-openai");
    }

    #[test]
    fn test_openai_completions_url() {
        let client = OpenAiClient::openai(None, "key");
        assert_eq!(
            client.completions_url("gpt-3.5-turbo-instruct"),
            "https://api.openai.com/v1/completions"
        );

        let compatible = OpenAiClient::openai(Some("http://localhost:1234/v1"), "key");
        assert_eq!(
            compatible.completions_url("local"),
            "http://localhost:1234/v1/completions"
        );
    }

    #[test]
    fn test_azure_body_omits_model() {
        let client = OpenAiClient::azure("https://res.openai.azure.com", "key", Some("2023-05-15"));
        let request = LlmRequest::new("Q", "davinci")
            .with_temperature(0.0)
            .with_max_tokens(32)
            .with_stop(vec!["\n".to_string()]);

        let body = serde_json::to_value(client.to_body(&request)).unwrap();
        assert!(body.get("model").is_none());
        assert_eq!(body["max_tokens"], 32);
        assert_eq!(body["n"], 1);
        assert_eq!(body["stop"], serde_json::json!(["\n"]));
    }

    #[test]
    fn test_openai_body_carries_model() {
        let client = OpenAiClient::openai(None, "key");
        let request = LlmRequest::new("Q", "gpt-3.5-turbo-instruct");

        let body = serde_json::to_value(client.to_body(&request)).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo-instruct");
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn test_response_conversion_keeps_order() {
        let client = OpenAiClient::openai(None, "key");
        let request = LlmRequest::new("Q", "davinci");
        let raw = r#"{
            "id": "cmpl-1",
            "object": "text_completion",
            "choices": [
                {"text": "first", "index": 0, "finish_reason": "stop"},
                {"text": "second", "index": 1, "finish_reason": "length"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();

        let response = client.convert_response(&request, parsed);
        assert_eq!(response.first_text().unwrap(), "first");
        assert_eq!(response.choices[1].text, "second");
        assert_eq!(response.model, "davinci");
        assert_eq!(response.usage.total_tokens, 12);
    }
}
