//! Error types for rrr.
//!
//! One enum covers every failure category of the read-retrieve-read flow:
//! configuration, I/O, the completion service, the search service, prompt
//! rendering and caller input.

use thiserror::Error;

/// Unified error type for rrr.
///
/// Upstream failures from the search and completion services are carried
/// with their HTTP status and body text; nothing is retried.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Completion service errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Search service errors
    #[error("Search error: {0}")]
    Search(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Invalid caller input (empty history, empty question)
    #[error("Invalid input: {0}")]
    Input(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether the error originated in one of the upstream services.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Llm(_) | AppError::Search(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        assert!(AppError::Llm("503".to_string()).is_upstream());
        assert!(AppError::Search("403".to_string()).is_upstream());
        assert!(!AppError::Input("empty history".to_string()).is_upstream());
        assert!(!AppError::Config("missing key".to_string()).is_upstream());
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::Search("index not found".to_string());
        assert_eq!(err.to_string(), "Search error: index not found");

        let err = AppError::Input("history is empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: history is empty");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
