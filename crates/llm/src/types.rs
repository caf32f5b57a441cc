//! Provider identifiers.

/// Completion provider kinds known to the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    AzureOpenAi,
    OpenAi,
    Ollama,
}

impl ProviderType {
    /// Parse a provider name as listed in `rrr_core::config::KNOWN_PROVIDERS`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "azure-openai" => Some(Self::AzureOpenAi),
            "openai" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AzureOpenAi => "azure-openai",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// Whether the provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}
