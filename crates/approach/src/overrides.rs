//! Per-request options supplied by the caller.

use rrr_prompt::PromptOverride;
use serde::{Deserialize, Serialize};

/// Number of documents retrieved when the caller does not say.
pub const DEFAULT_TOP: usize = 3;

/// Answer sampling temperature when the caller does not say.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Caller overrides for one request.
///
/// Keys are snake_case on the wire and every key is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// Use extractive captions instead of raw content
    pub semantic_captions: bool,

    /// Number of documents to retrieve
    pub top: Option<usize>,

    /// Category to exclude from retrieval
    pub exclude_category: Option<String>,

    /// Use the service's semantic ranking
    pub semantic_ranker: bool,

    /// Ask the model for follow-up questions
    pub suggest_followup_questions: bool,

    /// Replacement for, or text injected into, the answer template
    pub prompt_template: PromptOverride,

    /// Answer sampling temperature
    pub temperature: Option<f32>,
}

impl Overrides {
    /// Number of documents to retrieve; zero or unset means [`DEFAULT_TOP`].
    pub fn top(&self) -> usize {
        match self.top {
            Some(top) if top > 0 => top,
            _ => DEFAULT_TOP,
        }
    }

    /// Answer sampling temperature; unset means [`DEFAULT_TEMPERATURE`].
    ///
    /// An explicit `0.0` is kept: it is a valid greedy setting, unlike a
    /// `top` of zero, which would retrieve nothing.
    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Category to exclude; an empty string counts as unset.
    pub fn exclude_category(&self) -> Option<&str> {
        self.exclude_category
            .as_deref()
            .filter(|category| !category.is_empty())
    }
}
