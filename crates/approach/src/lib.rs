//! Chat read-retrieve-read orchestration.
//!
//! Given a conversation and the caller's overrides, the flow:
//! 1. rewrites the conversation into a standalone search query
//! 2. retrieves matching documents from the search index
//! 3. builds a grounded prompt from sources and history and asks for an answer
//!
//! # Example
//! ```no_run
//! use rrr_approach::{ApproachSettings, ChatReadRetrieveRead, Overrides, Turn};
//! use rrr_llm::OllamaClient;
//! use rrr_search::AzureSearchClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let approach = ChatReadRetrieveRead::new(
//!     Arc::new(OllamaClient::new()),
//!     Arc::new(AzureSearchClient::new("https://svc.search.windows.net", "gptkbindex", "key")),
//!     ApproachSettings::default(),
//! );
//! let history = vec![Turn::question("What is our 2023 CO2 target?")];
//! let response = approach.run(&history, &Overrides::default()).await?;
//! println!("{}", response.answer);
//! # Ok(())
//! # }
//! ```

pub mod approach;
pub mod generator;
pub mod overrides;
pub mod response;
pub mod retriever;
pub mod rewriter;

#[cfg(test)]
mod mocks;

pub use approach::{ApproachSettings, ChatReadRetrieveRead};
pub use overrides::Overrides;
pub use response::ChatResponse;
pub use retriever::{Retrieval, Retriever};
pub use rrr_prompt::{PromptOverride, Turn};
