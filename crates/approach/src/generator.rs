//! Answer generation: sources and history in, grounded answer out.

use crate::overrides::Overrides;
use rrr_core::AppResult;
use rrr_llm::{LlmClient, LlmRequest};
use rrr_prompt::{build_answer_prompt, render_history, PromptPack, Turn, IM_END, IM_START};

/// Token ceiling for the answer.
pub const ANSWER_MAX_TOKENS: u32 = 1024;

/// Final prompt and the completion produced from it.
#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: String,
    pub answer: String,
}

/// Build the answer prompt and ask the chat deployment to complete it.
///
/// History is rendered including the active turn, whose empty assistant
/// block is what the model completes. Generation stops at either chat
/// markup token.
pub async fn generate_answer(
    llm: &dyn LlmClient,
    deployment: &str,
    pack: &PromptPack,
    history: &[Turn],
    sources: &str,
    overrides: &Overrides,
    history_token_budget: usize,
) -> AppResult<Generation> {
    let chat_history = render_history(history, true, history_token_budget);
    let prompt = build_answer_prompt(
        pack,
        &overrides.prompt_template,
        sources,
        &chat_history,
        overrides.suggest_followup_questions,
    )?;

    let request = LlmRequest::new(prompt.clone(), deployment)
        .with_temperature(overrides.temperature())
        .with_max_tokens(ANSWER_MAX_TOKENS)
        .with_candidates(1)
        .with_stop(vec![IM_END.to_string(), IM_START.to_string()]);

    let response = llm.complete(&request).await?;
    let answer = response.first_text()?.to_string();

    tracing::info!(
        model = %response.model,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "Generated answer"
    );

    Ok(Generation { prompt, answer })
}
