//! Prompt system for rrr.
//!
//! This crate provides:
//! - The prompt pack (answer, follow-up and query-rewrite templates)
//! - Chat history rendering in the `<|im_start|>` turn format
//! - Handlebars template rendering, including caller prompt overrides
//! - YAML prompt pack loading from the workspace

pub mod builder;
pub mod defaults;
pub mod history;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_answer_prompt, build_query_prompt, fill_placeholders, render_template};
pub use history::{render_history, Turn, IM_END, IM_START};
pub use loader::{list_prompt_packs, load_prompt_pack};
pub use types::{PromptOverride, PromptPack, INJECT_MARKER};
