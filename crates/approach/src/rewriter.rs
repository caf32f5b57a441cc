//! Query rewriting: conversation in, standalone search query out.

use rrr_core::AppResult;
use rrr_llm::{LlmClient, LlmRequest};
use rrr_prompt::{build_query_prompt, render_history, PromptPack, Turn};

/// Token ceiling for the rewritten query.
pub const QUERY_MAX_TOKENS: u32 = 32;

/// Ask the completion service for a one-line search query.
///
/// The prompt carries the history without the active turn plus the active
/// turn's question. The completion runs at temperature 0 and stops at the
/// first newline; its text is returned verbatim, so an empty completion
/// yields an empty query.
pub async fn rewrite_query(
    llm: &dyn LlmClient,
    deployment: &str,
    pack: &PromptPack,
    history: &[Turn],
    question: &str,
    history_token_budget: usize,
) -> AppResult<String> {
    let chat_history = render_history(history, false, history_token_budget);
    let prompt = build_query_prompt(pack, &chat_history, question)?;

    let request = LlmRequest::new(prompt, deployment)
        .with_temperature(0.0)
        .with_max_tokens(QUERY_MAX_TOKENS)
        .with_candidates(1)
        .with_stop(vec!["\n".to_string()]);

    let response = llm.complete(&request).await?;
    let query = response.first_text()?.to_string();

    tracing::info!(query = %query, "Rewrote conversation into search query");

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedLlm;

    #[tokio::test]
    async fn test_rewrite_request_shape() {
        let llm = ScriptedLlm::new(&["festival emissions 2023"]);
        let history = vec![
            Turn::answered("What is the Green Rider?", "A clause in artist contracts."),
            Turn::question("What does it cover?"),
        ];

        let query = rewrite_query(
            &llm,
            "davinci",
            &PromptPack::default(),
            &history,
            "What does it cover?",
            1000,
        )
        .await
        .unwrap();
        assert_eq!(query, "festival emissions 2023");

        let requests = llm.recorded();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "davinci");
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(32));
        assert_eq!(request.n, 1);
        assert_eq!(request.stop, vec!["\n".to_string()]);
        // History excludes the active turn, question appears once
        assert!(request.prompt.contains("What is the Green Rider?"));
        assert!(request.prompt.contains("A clause in artist contracts."));
        assert_eq!(request.prompt.matches("What does it cover?").count(), 1);
    }

    #[tokio::test]
    async fn test_empty_completion_is_empty_query() {
        let llm = ScriptedLlm::new(&[""]);
        let history = vec![Turn::question("Hello?")];

        let query = rewrite_query(&llm, "davinci", &PromptPack::default(), &history, "Hello?", 1000)
            .await
            .unwrap();
        assert_eq!(query, "");
    }
}
