//! Prompt builder for rendering the query-rewrite and answer templates.

use crate::types::{PromptOverride, PromptPack};
use handlebars::Handlebars;
use rrr_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build the query-rewrite prompt.
///
/// # Arguments
/// * `pack` - Prompt pack supplying the query template
/// * `chat_history` - Rendered history, excluding the active turn
/// * `question` - The active turn's user text
pub fn build_query_prompt(pack: &PromptPack, chat_history: &str, question: &str) -> AppResult<String> {
    let mut variables = HashMap::new();
    variables.insert("chat_history", chat_history.to_string());
    variables.insert("question", question.to_string());

    render_template(&pack.query_prompt, &variables)
}

/// Build the grounded answer prompt.
///
/// Precedence:
/// 1. `Default`: the pack's answer template with an empty injection slot
/// 2. `Injected(text)`: the pack's answer template with `text` and a newline
///    in the injection slot
/// 3. `FullOverride(text)`: `text` is the whole template; only `sources`,
///    `chat_history` and `follow_up_questions_prompt` are filled in, written
///    as `{{name}}` or `{name}`. All other text is kept as is.
///
/// The follow-up slot receives the pack's follow-up instructions when
/// `suggest_followup_questions` is set and is empty otherwise.
pub fn build_answer_prompt(
    pack: &PromptPack,
    prompt_override: &PromptOverride,
    sources: &str,
    chat_history: &str,
    suggest_followup_questions: bool,
) -> AppResult<String> {
    let follow_up = if suggest_followup_questions {
        pack.follow_up_questions_prompt.clone()
    } else {
        String::new()
    };

    let mut variables = HashMap::new();
    variables.insert("sources", sources.to_string());
    variables.insert("chat_history", chat_history.to_string());
    variables.insert("follow_up_questions_prompt", follow_up.clone());

    match prompt_override {
        PromptOverride::Default => {
            variables.insert("injected_prompt", String::new());
            render_template(&pack.system_prompt, &variables)
        }
        PromptOverride::Injected(text) => {
            tracing::debug!("Injecting caller text into answer template");
            variables.insert("injected_prompt", format!("{}\n", text));
            render_template(&pack.system_prompt, &variables)
        }
        PromptOverride::FullOverride(template) => {
            tracing::debug!("Caller template replaces answer template");
            Ok(fill_placeholders(
                template,
                &[
                    ("sources", sources),
                    ("chat_history", chat_history),
                    ("follow_up_questions_prompt", follow_up.as_str()),
                ],
            ))
        }
    }
}

/// Replace `{{name}}` and `{name}` for the given names in one pass.
///
/// Inserted values are not scanned again. Unknown names and stray braces are
/// copied through unchanged.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        for &(name, value) in values {
            for (open, close) in [("{{", "}}"), ("{", "}")] {
                let matched = tail
                    .strip_prefix(open)
                    .and_then(|t| t.strip_prefix(name))
                    .and_then(|t| t.strip_prefix(close));
                if let Some(after) = matched {
                    out.push_str(value);
                    rest = after;
                    continue 'scan;
                }
            }
        }

        out.push('{');
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}

/// Render a Handlebars template with variables.
///
/// Values are inserted verbatim: no HTML escaping, and mustaches inside
/// values are not expanded. Missing variables render as empty strings.
pub fn render_template(template: &str, variables: &HashMap<&str, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    const PREAMBLE: &str = "You are an assistant and sustainability analyst";

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("prompt", "Hello, world!".to_string());

        let result = render_template("Question: {{prompt}}", &vars).unwrap();
        assert_eq!(result, "Question: Hello, world!");
    }

    #[test]
    fn test_render_does_not_escape_or_expand_values() {
        let mut vars = HashMap::new();
        vars.insert("sources", "a.pdf: <b>x</b> & {{y}}".to_string());

        let result = render_template("{{sources}}", &vars).unwrap();
        assert_eq!(result, "a.pdf: <b>x</b> & {{y}}");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let result = render_template("Question: {{missing}}", &HashMap::new()).unwrap();
        assert_eq!(result, "Question: ");
    }

    #[test]
    fn test_render_invalid_template() {
        let result = render_template("Broken {{#if}}", &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_query_prompt() {
        let prompt = build_query_prompt(
            &PromptPack::default(),
            "<|im_start|>user\nhi\n<|im_end|>\n",
            "What is our 2023 CO2 target?",
        )
        .unwrap();

        assert!(prompt.contains("Chat History:\n<|im_start|>user\nhi\n<|im_end|>\n"));
        assert!(prompt.contains("Question:\nWhat is our 2023 CO2 target?"));
        assert!(prompt.trim_end().ends_with("Search query:"));
    }

    #[test]
    fn test_default_answer_prompt_has_preamble() {
        let prompt = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::Default,
            "report.pdf: Target is 30%.",
            "<|im_start|>user\nq\n<|im_end|>\n",
            false,
        )
        .unwrap();

        assert!(prompt.starts_with("<|im_start|>system\n"));
        assert!(prompt.contains(PREAMBLE));
        assert!(prompt.contains("Sources:\nreport.pdf: Target is 30%.\n<|im_end|>\n"));
        assert!(prompt.ends_with("<|im_start|>user\nq\n<|im_end|>\n\n"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_injected_answer_prompt_keeps_preamble() {
        let prompt = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::Injected("Answer in German.".to_string()),
            "a.pdf: x",
            "",
            false,
        )
        .unwrap();

        assert!(prompt.contains(PREAMBLE));
        assert!(prompt.contains("Answer in German.\n\nSources:"));
        assert!(prompt.contains("a.pdf: x"));
    }

    #[test]
    fn test_full_override_replaces_preamble() {
        let template = "Only these: {{sources}} | {{chat_history}} | {{follow_up_questions_prompt}} | {{injected_prompt}}";
        let prompt = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::FullOverride(template.to_string()),
            "a.pdf: x",
            "HISTORY",
            false,
        )
        .unwrap();

        assert!(!prompt.contains(PREAMBLE));
        assert!(!prompt.contains("<|im_start|>system"));
        assert_eq!(prompt, "Only these: a.pdf: x | HISTORY |  | {{injected_prompt}}");
    }

    #[test]
    fn test_full_override_keeps_unknown_placeholders() {
        let prompt = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::FullOverride("Q={{question}} H={{chat_history}}".to_string()),
            "a.pdf: x",
            "HIST",
            false,
        )
        .unwrap();
        assert_eq!(prompt, "Q={{question}} H=HIST");
    }

    #[test]
    fn test_full_override_single_brace_placeholders() {
        let prompt = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::FullOverride("Sources:\n{sources}\n{chat_history}".to_string()),
            "a.pdf: x",
            "HIST",
            false,
        )
        .unwrap();
        assert_eq!(prompt, "Sources:\na.pdf: x\nHIST");
    }

    #[test]
    fn test_full_override_stray_braces() {
        let prompt = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::FullOverride(
                "Use {{#each}} and {json: 1} {{ }} {sources".to_string(),
            ),
            "a.pdf: x",
            "",
            false,
        )
        .unwrap();
        assert_eq!(prompt, "Use {{#each}} and {json: 1} {{ }} {sources");
    }

    #[test]
    fn test_fill_placeholders_does_not_expand_values() {
        let filled = fill_placeholders(
            "{{{sources}}} {chat_history}",
            &[("sources", "{chat_history}"), ("chat_history", "H")],
        );
        assert_eq!(filled, "{{chat_history}} H");
    }

    #[test]
    fn test_follow_up_slot() {
        let with = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::FullOverride("[{{follow_up_questions_prompt}}]".to_string()),
            "",
            "",
            true,
        )
        .unwrap();
        assert_eq!(with, format!("[{}]", defaults::FOLLOW_UP_QUESTIONS_PROMPT));

        let without = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::FullOverride("[{{follow_up_questions_prompt}}]".to_string()),
            "",
            "",
            false,
        )
        .unwrap();
        assert_eq!(without, "[]");
    }

    #[test]
    fn test_default_prompt_includes_follow_up_when_requested() {
        let prompt = build_answer_prompt(
            &PromptPack::default(),
            &PromptOverride::Default,
            "",
            "",
            true,
        )
        .unwrap();
        assert!(prompt.contains("Generate three very brief follow-up questions"));
    }
}
