//! Search service integration for rrr.
//!
//! Provides the `SearchClient` seam the orchestrator retrieves through, the
//! query and document types it exchanges, filter-expression helpers, and a
//! REST client for Azure Cognitive Search.
//!
//! # Example
//! ```no_run
//! use rrr_search::{filter, AzureSearchClient, SearchClient, SearchQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AzureSearchClient::new("https://svc.search.windows.net", "gptkbindex", "key");
//! let query = SearchQuery::new("2023 CO2 target", 3)
//!     .with_filter(filter::exclude_category("internal"));
//! for doc in client.search(&query).await? {
//!     println!("{:?}", doc.field_str("sourcepage"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod azure;
pub mod client;
pub mod filter;
pub mod types;

pub use azure::AzureSearchClient;
pub use client::SearchClient;
pub use types::{Caption, CaptionMode, QueryType, SearchDocument, SearchQuery};
