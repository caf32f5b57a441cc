//! Prompt types.

use crate::defaults;
use serde::{Deserialize, Serialize};

/// Wire prefix marking a prompt override as text to inject into the
/// default template rather than a full replacement.
pub const INJECT_MARKER: &str = ">>>";

/// The set of templates driving one read-retrieve-read flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPack {
    /// Unique pack identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Grounded answer template
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,

    /// Follow-up question instructions
    #[serde(rename = "followUpQuestionsPrompt")]
    pub follow_up_questions_prompt: String,

    /// Query rewrite template
    #[serde(rename = "queryPrompt")]
    pub query_prompt: String,
}

impl Default for PromptPack {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            title: "Sustainability analyst".to_string(),
            api_version: "1.0".to_string(),
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
            follow_up_questions_prompt: defaults::FOLLOW_UP_QUESTIONS_PROMPT.to_string(),
            query_prompt: defaults::QUERY_PROMPT.to_string(),
        }
    }
}

/// How a caller-supplied prompt template combines with the pack's answer template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum PromptOverride {
    /// Use the pack's answer template unchanged
    #[default]
    Default,
    /// Text placed in the answer template's injection slot
    Injected(String),
    /// A complete replacement for the answer template
    FullOverride(String),
}

impl PromptOverride {
    /// Interpret the wire form, where a `>>>` prefix means "inject".
    ///
    /// An empty string is treated like an absent override.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Default,
            Some(text) => match text.strip_prefix(INJECT_MARKER) {
                Some(injected) => Self::Injected(injected.to_string()),
                None => Self::FullOverride(text.to_string()),
            },
        }
    }

    /// The wire form of this override.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::Default => None,
            Self::Injected(text) => Some(format!("{}{}", INJECT_MARKER, text)),
            Self::FullOverride(text) => Some(text.clone()),
        }
    }
}

impl From<Option<String>> for PromptOverride {
    fn from(raw: Option<String>) -> Self {
        Self::from_wire(raw.as_deref())
    }
}

impl From<PromptOverride> for Option<String> {
    fn from(value: PromptOverride) -> Self {
        value.to_wire()
    }
}
