//! Azure Cognitive Search REST client.
//!
//! API: `POST {endpoint}/indexes/{index}/docs/search?api-version=...`

use crate::client::SearchClient;
use crate::types::{QueryType, SearchDocument, SearchQuery};
use rrr_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// API version that supports semantic ranking and captions.
pub const DEFAULT_API_VERSION: &str = "2021-04-30-Preview";

/// Request body of the search endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequestBody {
    search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    top: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_type: Option<QueryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captions: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    value: Vec<Value>,
}

/// Azure Cognitive Search client for one index.
pub struct AzureSearchClient {
    endpoint: String,
    index: String,
    api_key: String,
    api_version: String,
    client: reqwest::Client,
}

impl AzureSearchClient {
    /// Create a client for `index` on the service at `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        index: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            index: index.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Use a different REST API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Replace the HTTP client with one that times out after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> AppResult<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Search(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, self.api_version
        )
    }

    fn to_body(&self, query: &SearchQuery) -> SearchRequestBody {
        let semantic = query.query_type == QueryType::Semantic;
        SearchRequestBody {
            search: query.text.clone(),
            filter: query.filter.clone(),
            top: query.top,
            query_type: semantic.then_some(QueryType::Semantic),
            query_language: query.query_language.clone(),
            speller: query.speller.clone(),
            semantic_configuration: query.semantic_configuration.clone(),
            captions: query
                .captions
                .filter(|_| semantic)
                .map(|mode| mode.as_param()),
        }
    }

    fn parse_documents(body: SearchResponseBody) -> AppResult<Vec<SearchDocument>> {
        body.value
            .into_iter()
            .map(SearchDocument::from_json)
            .collect()
    }
}

#[async_trait::async_trait]
impl SearchClient for AzureSearchClient {
    fn index_name(&self) -> &str {
        &self.index
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<SearchDocument>> {
        tracing::info!(index = %self.index, top = query.top, "Querying search index");
        tracing::debug!("Search query: {:?}", query);

        let response = self
            .client
            .post(self.search_url())
            .header("api-key", &self.api_key)
            .json(&self.to_body(query))
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to send search request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!(
                "Search API error ({}): {}",
                status, error_text
            )));
        }

        let body: SearchResponseBody = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        let documents = Self::parse_documents(body)?;
        tracing::info!("Search returned {} documents", documents.len());

        Ok(documents)
    }
}
