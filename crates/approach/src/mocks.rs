//! In-process test doubles for the completion and search services.

use rrr_core::{AppError, AppResult};
use rrr_llm::{LlmChoice, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use rrr_search::{Caption, SearchClient, SearchDocument, SearchQuery};
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Completion client answering from a queue of canned texts.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Llm("no scripted reply left".to_string()))?;

        Ok(LlmResponse {
            choices: vec![LlmChoice {
                text,
                finish_reason: Some("stop".to_string()),
            }],
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

/// Completion client that always fails.
pub struct FailingLlm;

#[async_trait::async_trait]
impl LlmClient for FailingLlm {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(AppError::Llm("429 Too Many Requests".to_string()))
    }
}

/// Search client over a fixed, already ranked document list.
pub struct StaticSearch {
    documents: Vec<SearchDocument>,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl StaticSearch {
    pub fn new(documents: Vec<SearchDocument>) -> Self {
        Self {
            documents,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SearchClient for StaticSearch {
    fn index_name(&self) -> &str {
        "static"
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<SearchDocument>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.documents.iter().take(query.top).cloned().collect())
    }
}

/// Document with `sourcepage`, `content` and captions.
pub fn document(sourcepage: &str, content: &str, captions: &[&str]) -> SearchDocument {
    let mut fields = Map::new();
    fields.insert("sourcepage".to_string(), Value::String(sourcepage.to_string()));
    fields.insert("content".to_string(), json!(content));

    SearchDocument {
        fields,
        captions: captions
            .iter()
            .map(|text| Caption {
                text: text.to_string(),
                highlights: None,
            })
            .collect(),
        score: None,
        reranker_score: None,
    }
}
