//! Search query and result types.

use rrr_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ranking mode of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Keyword ranking
    #[default]
    Simple,
    /// Secondary semantic re-ranking by the service
    Semantic,
}

/// How the service should produce captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionMode {
    /// Extractive captions, optionally with highlight markup
    Extractive { highlight: bool },
}

impl CaptionMode {
    /// Wire form, e.g. `extractive|highlight-false`.
    pub fn as_param(&self) -> String {
        match self {
            CaptionMode::Extractive { highlight } => {
                format!("extractive|highlight-{}", highlight)
            }
        }
    }
}

/// A query against a search index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Search text; an empty string matches everything
    pub text: String,

    /// OData filter expression
    pub filter: Option<String>,

    /// Ranking mode
    pub query_type: QueryType,

    /// Query language for semantic ranking (e.g. "en-us")
    pub query_language: Option<String>,

    /// Speller for semantic ranking (e.g. "lexicon")
    pub speller: Option<String>,

    /// Named semantic configuration of the index
    pub semantic_configuration: Option<String>,

    /// Maximum number of documents to return
    pub top: usize,

    /// Caption mode, semantic ranking only
    pub captions: Option<CaptionMode>,
}

impl SearchQuery {
    /// Create a plain keyword query.
    pub fn new(text: impl Into<String>, top: usize) -> Self {
        Self {
            text: text.into(),
            filter: None,
            query_type: QueryType::Simple,
            query_language: None,
            speller: None,
            semantic_configuration: None,
            top,
            captions: None,
        }
    }

    /// Set the filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set an optional filter expression.
    pub fn with_optional_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Enable semantic ranking.
    pub fn semantic(
        mut self,
        language: impl Into<String>,
        speller: impl Into<String>,
        configuration: impl Into<String>,
    ) -> Self {
        self.query_type = QueryType::Semantic;
        self.query_language = Some(language.into());
        self.speller = Some(speller.into());
        self.semantic_configuration = Some(configuration.into());
        self
    }

    /// Request captions.
    pub fn with_captions(mut self, mode: CaptionMode) -> Self {
        self.captions = Some(mode);
        self
    }
}

/// An extractive caption of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
}

/// One retrieved document.
///
/// Index fields are kept as raw JSON since field names are deployment
/// configuration, not schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchDocument {
    /// Index fields of the document
    pub fields: Map<String, Value>,

    /// Captions, present only for semantic queries that asked for them
    pub captions: Vec<Caption>,

    /// Relevance score
    pub score: Option<f64>,

    /// Semantic re-ranker score
    pub reranker_score: Option<f64>,
}

impl SearchDocument {
    /// Build a document from one entry of a search response's `value` array.
    ///
    /// `@search.*` annotations are split off from the index fields.
    pub fn from_json(value: Value) -> AppResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(AppError::Search(
                "Search result entry is not a JSON object".to_string(),
            ));
        };

        let captions = match fields.remove("@search.captions") {
            Some(Value::Null) | None => Vec::new(),
            Some(raw) => serde_json::from_value(raw).map_err(|e| {
                AppError::Search(format!("Failed to parse search captions: {}", e))
            })?,
        };
        let score = fields.remove("@search.score").and_then(|v| v.as_f64());
        let reranker_score = fields
            .remove("@search.rerankerScore")
            .and_then(|v| v.as_f64());
        fields.retain(|key, _| !key.starts_with("@search."));

        Ok(Self {
            fields,
            captions,
            score,
            reranker_score,
        })
    }

    /// String value of an index field.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}
