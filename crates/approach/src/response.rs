//! Response returned to the caller.

use serde::{Deserialize, Serialize};

/// Answer of one read-retrieve-read run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// `"<source>: <text>"` lines the answer was grounded on, in retrieval order
    pub data_points: Vec<String>,

    /// Raw completion text
    pub answer: String,

    /// HTML-formatted trace of the search query and the final prompt
    pub thoughts: String,
}

impl ChatResponse {
    /// Assemble a response, formatting the trace from the query and prompt.
    pub fn new(data_points: Vec<String>, answer: String, query: &str, prompt: &str) -> Self {
        Self {
            data_points,
            answer,
            thoughts: format_thoughts(query, prompt),
        }
    }
}

/// `Searched for:<br>{query}<br><br>Prompt:<br>{prompt}` with newlines as `<br>`.
pub fn format_thoughts(query: &str, prompt: &str) -> String {
    format!(
        "Searched for:<br>{}<br><br>Prompt:<br>{}",
        query,
        prompt.replace('\n', "<br>")
    )
}
