//! Retrieval: search query in, `"<source>: <text>"` data points out.

use crate::overrides::Overrides;
use rrr_core::{AppError, AppResult};
use rrr_search::{filter, CaptionMode, SearchClient, SearchDocument, SearchQuery};
use std::sync::Arc;

/// Query language used with semantic ranking.
pub const SEMANTIC_QUERY_LANGUAGE: &str = "en-us";

/// Speller used with semantic ranking.
pub const SEMANTIC_SPELLER: &str = "lexicon";

/// Semantic configuration name of the index.
pub const SEMANTIC_CONFIGURATION: &str = "default";

/// Separator between the captions of one document.
pub const CAPTION_SEPARATOR: &str = " . ";

/// Documents retrieved for one query.
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// One `"<source>: <text>"` line per document, in service order
    pub data_points: Vec<String>,

    /// The documents as returned by the service
    pub documents: Vec<SearchDocument>,
}

impl Retrieval {
    /// Data points joined with newlines, as placed in the prompt.
    pub fn content(&self) -> String {
        self.data_points.join("\n")
    }
}

/// Retrieves documents and turns them into prompt-ready lines.
pub struct Retriever {
    search: Arc<dyn SearchClient>,
    sourcepage_field: String,
    content_field: String,
}

impl Retriever {
    /// Create a retriever reading the given source and content fields.
    pub fn new(
        search: Arc<dyn SearchClient>,
        sourcepage_field: impl Into<String>,
        content_field: impl Into<String>,
    ) -> Self {
        Self {
            search,
            sourcepage_field: sourcepage_field.into(),
            content_field: content_field.into(),
        }
    }

    /// Run `query` against the index under the caller's overrides.
    pub async fn retrieve(&self, query: &str, overrides: &Overrides) -> AppResult<Retrieval> {
        let search_query = build_search_query(query, overrides);
        let documents = self.search.search(&search_query).await?;

        let data_points = documents
            .iter()
            .map(|doc| self.data_point(doc, overrides.semantic_captions))
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(
            index = self.search.index_name(),
            documents = data_points.len(),
            "Retrieved sources"
        );

        Ok(Retrieval {
            data_points,
            documents,
        })
    }

    /// Format one document as `"<source>: <text>"`.
    fn data_point(&self, doc: &SearchDocument, use_captions: bool) -> AppResult<String> {
        let source = doc.field_str(&self.sourcepage_field).ok_or_else(|| {
            AppError::Search(format!(
                "Search result is missing field '{}'",
                self.sourcepage_field
            ))
        })?;

        let text = if use_captions {
            caption_text(doc)
        } else {
            doc.field_str(&self.content_field)
                .ok_or_else(|| {
                    AppError::Search(format!(
                        "Search result is missing field '{}'",
                        self.content_field
                    ))
                })?
                .to_string()
        };

        Ok(format!("{}: {}", source, nonewlines(&text)))
    }
}

/// Translate overrides into a search request.
pub fn build_search_query(query: &str, overrides: &Overrides) -> SearchQuery {
    let mut search_query = SearchQuery::new(query, overrides.top())
        .with_optional_filter(overrides.exclude_category().map(filter::exclude_category));

    if overrides.semantic_ranker {
        search_query = search_query.semantic(
            SEMANTIC_QUERY_LANGUAGE,
            SEMANTIC_SPELLER,
            SEMANTIC_CONFIGURATION,
        );
        if overrides.semantic_captions {
            search_query =
                search_query.with_captions(CaptionMode::Extractive { highlight: false });
        }
    }

    search_query
}

/// All captions of a document joined with [`CAPTION_SEPARATOR`].
pub fn caption_text(doc: &SearchDocument) -> String {
    doc.captions
        .iter()
        .map(|caption| caption.text.as_str())
        .collect::<Vec<_>>()
        .join(CAPTION_SEPARATOR)
}

/// Replace line breaks with spaces so each document stays on one line.
pub fn nonewlines(text: &str) -> String {
    text.replace('\n', " ").replace('\r', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{document, StaticSearch};
    use rrr_search::QueryType;

    fn retriever(search: Arc<StaticSearch>) -> Retriever {
        Retriever::new(search, "sourcepage", "content")
    }

    #[test]
    fn test_nonewlines() {
        assert_eq!(nonewlines("a\nb\r\nc"), "a b  c");
        assert_eq!(nonewlines("plain"), "plain");
    }

    #[test]
    fn test_plain_search_query() {
        let query = build_search_query("co2", &Overrides::default());
        assert_eq!(query.text, "co2");
        assert_eq!(query.top, 3);
        assert_eq!(query.filter, None);
        assert_eq!(query.query_type, QueryType::Simple);
        assert_eq!(query.captions, None);
        assert_eq!(query.semantic_configuration, None);
    }

    #[test]
    fn test_plain_search_ignores_caption_flag() {
        let overrides = Overrides {
            semantic_captions: true,
            ..Overrides::default()
        };
        let query = build_search_query("co2", &overrides);
        assert_eq!(query.query_type, QueryType::Simple);
        assert_eq!(query.captions, None);
    }

    #[test]
    fn test_semantic_search_query() {
        let overrides = Overrides {
            semantic_ranker: true,
            semantic_captions: true,
            top: Some(5),
            exclude_category: Some("O'Brien".to_string()),
            ..Overrides::default()
        };
        let query = build_search_query("co2", &overrides);

        assert_eq!(query.query_type, QueryType::Semantic);
        assert_eq!(query.query_language.as_deref(), Some("en-us"));
        assert_eq!(query.speller.as_deref(), Some("lexicon"));
        assert_eq!(query.semantic_configuration.as_deref(), Some("default"));
        assert_eq!(query.captions, Some(CaptionMode::Extractive { highlight: false }));
        assert_eq!(query.top, 5);
        assert_eq!(query.filter.as_deref(), Some("category ne 'O''Brien'"));
    }

    #[test]
    fn test_semantic_without_captions() {
        let overrides = Overrides {
            semantic_ranker: true,
            ..Overrides::default()
        };
        let query = build_search_query("co2", &overrides);
        assert_eq!(query.query_type, QueryType::Semantic);
        assert_eq!(query.captions, None);
    }

    #[tokio::test]
    async fn test_content_extraction() {
        let search = Arc::new(StaticSearch::new(vec![
            document("report-1.pdf", "Line one\nLine two", &["ignored"]),
            document("report-2.pdf", "Single line", &[]),
        ]));

        let retrieval = retriever(search)
            .retrieve("co2", &Overrides::default())
            .await
            .unwrap();

        assert_eq!(
            retrieval.data_points,
            vec![
                "report-1.pdf: Line one Line two".to_string(),
                "report-2.pdf: Single line".to_string(),
            ]
        );
        assert_eq!(
            retrieval.content(),
            "report-1.pdf: Line one Line two\nreport-2.pdf: Single line"
        );
        assert_eq!(retrieval.documents.len(), 2);
    }

    #[tokio::test]
    async fn test_caption_extraction() {
        let search = Arc::new(StaticSearch::new(vec![document(
            "report-1.pdf",
            "raw content",
            &["Emissions fell\nby 30%", "Target 2023"],
        )]));
        let overrides = Overrides {
            semantic_ranker: true,
            semantic_captions: true,
            ..Overrides::default()
        };

        let retrieval = retriever(search).retrieve("co2", &overrides).await.unwrap();
        assert_eq!(
            retrieval.data_points,
            vec!["report-1.pdf: Emissions fell by 30% . Target 2023".to_string()]
        );
    }

    #[tokio::test]
    async fn test_zero_results() {
        let search = Arc::new(StaticSearch::new(Vec::new()));
        let retrieval = retriever(search)
            .retrieve("", &Overrides::default())
            .await
            .unwrap();

        assert!(retrieval.data_points.is_empty());
        assert_eq!(retrieval.content(), "");
    }

    #[tokio::test]
    async fn test_order_and_top_preserved() {
        let search = Arc::new(StaticSearch::new(vec![
            document("c.pdf", "third-ranked name, first result", &[]),
            document("a.pdf", "second result", &[]),
            document("b.pdf", "third result", &[]),
        ]));
        let overrides = Overrides {
            top: Some(2),
            ..Overrides::default()
        };

        let retrieval = retriever(search.clone())
            .retrieve("q", &overrides)
            .await
            .unwrap();
        assert_eq!(retrieval.data_points.len(), 2);
        assert!(retrieval.data_points[0].starts_with("c.pdf: "));
        assert!(retrieval.data_points[1].starts_with("a.pdf: "));
        assert_eq!(search.recorded()[0].top, 2);
    }

    #[tokio::test]
    async fn test_missing_source_field() {
        let search = Arc::new(StaticSearch::new(vec![document("a.pdf", "x", &[])]));
        let retriever = Retriever::new(search, "page", "content");

        let result = retriever.retrieve("q", &Overrides::default()).await;
        assert!(matches!(result, Err(AppError::Search(_))));
    }
}
