//! Completion service integration for rrr.
//!
//! This crate provides a provider-agnostic abstraction over text completion
//! endpoints. Every provider accepts the same request shape (deployment,
//! prompt, temperature, max tokens, candidate count, stop sequences) and
//! returns a list of candidate completions.
//!
//! # Providers
//! - **Azure OpenAI**: deployment-scoped completions (default)
//! - **OpenAI**: `/v1/completions`
//! - **Ollama**: local runtime
//!
//! # Example
//! ```no_run
//! use rrr_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3").with_stop(vec!["\n".into()]);
//! let response = client.complete(&request).await?;
//! println!("{}", response.first_text()?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmChoice, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{create_client, ClientOptions};
pub use providers::{OllamaClient, OpenAiClient, OpenAiFlavor};
pub use types::ProviderType;
