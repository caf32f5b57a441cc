//! Search client abstraction.

use crate::types::{SearchDocument, SearchQuery};
use rrr_core::AppResult;

/// Trait for search services.
///
/// Implementations return documents in the order the service ranked them;
/// callers do not re-rank.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Name of the index being queried.
    fn index_name(&self) -> &str;

    /// Run a query and return the matching documents.
    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<SearchDocument>>;
}
