//! Chat history rendering.

use serde::{Deserialize, Serialize};

/// Opens a turn block in the prompt format.
pub const IM_START: &str = "<|im_start|>";

/// Closes a turn block in the prompt format.
pub const IM_END: &str = "<|im_end|>";

/// Characters assumed per token when budgeting history.
pub const CHARS_PER_TOKEN: usize = 4;

/// One user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// What the user said
    pub user: String,

    /// The assistant's reply; absent for the active turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<String>,
}

impl Turn {
    /// A turn still waiting for its answer.
    pub fn question(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: None,
        }
    }

    /// A completed exchange.
    pub fn answered(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: Some(bot.into()),
        }
    }

    fn render(&self) -> String {
        let bot = match self.bot.as_deref() {
            Some(bot) if !bot.is_empty() => format!("{}{}", bot, IM_END),
            _ => String::new(),
        };
        format!(
            "{start}user\n{user}\n{end}\n{start}assistant\n{bot}\n",
            start = IM_START,
            end = IM_END,
            user = self.user,
            bot = bot,
        )
    }
}

/// Render history oldest-to-newest as alternating user/assistant blocks.
///
/// Turns are accumulated from the most recent backwards; accumulation stops
/// after the first turn that takes the text past `approx_max_tokens *
/// CHARS_PER_TOKEN` characters, so the oldest turns are the ones dropped.
/// When `include_last_turn` is false the active (last) turn is skipped.
pub fn render_history(history: &[Turn], include_last_turn: bool, approx_max_tokens: usize) -> String {
    let turns = if include_last_turn {
        history
    } else {
        &history[..history.len().saturating_sub(1)]
    };
    let budget = approx_max_tokens.saturating_mul(CHARS_PER_TOKEN);

    let mut blocks = Vec::new();
    let mut length = 0;
    for turn in turns.iter().rev() {
        let block = turn.render();
        length += block.chars().count();
        blocks.push(block);
        if length > budget {
            break;
        }
    }

    blocks.into_iter().rev().collect()
}
