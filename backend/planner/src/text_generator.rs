//! Answer and summary generation over an `LlmProvider`.

use std::sync::Arc;

use tracing::{error, info, instrument};

use recall_core::{LlmProvider, LlmRequest, RecallError};

pub const MAX_TOKENS: u32 = 1024;

const ANSWER_SYSTEM_PROMPT: &str =
    "You are a knowledgeable assistant that uses the provided data if relevant.";
const SUMMARY_SYSTEM_PROMPT: &str =
    "Use the retrieved data to generate a summary of the instructions given.";

/// Builds the two prompts the bot uses and returns the model's first text
/// block. Failures are returned, never retried.
pub struct TextGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl TextGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Answer `query`, letting the model draw on `context` (possibly empty).
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn generate_answer(&self, query: &str, context: &str) -> Result<String, RecallError> {
        let user_prompt = format!("Context: {context}\n\nQuery: {query}");
        self.generate(ANSWER_SYSTEM_PROMPT, user_prompt).await
    }

    /// Summarize a thread's text into something worth storing.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn generate_summary(&self, thread_text: &str) -> Result<String, RecallError> {
        self.generate(SUMMARY_SYSTEM_PROMPT, thread_text.to_string()).await
    }

    async fn generate(&self, system_prompt: &str, user_prompt: String) -> Result<String, RecallError> {
        let request = LlmRequest {
            model: self.model.clone(),
            system_prompt: system_prompt.to_string(),
            user_prompt,
            max_tokens: MAX_TOKENS,
        };

        match self.provider.complete(&request).await {
            Ok(response) => {
                info!(
                    provider = %response.provider,
                    tokens = response.tokens_used,
                    latency_ms = response.latency_ms,
                    "Generation complete"
                );
                Ok(response.content)
            }
            Err(e) => {
                error!(provider = %self.provider.name(), error = ?e, "Generation failed");
                Err(RecallError::Generation {
                    provider: self.provider.name().to_string(),
                    message: format!("{e:#}"),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    #[tokio::test]
    async fn answer_prompt_layout() {
        let provider = Arc::new(MockProvider::new("mock").with_response("respuesta"));
        let generator = TextGenerator::new(provider.clone(), "model-x");

        let answer = generator.generate_answer("¿cómo entro?", "usa la VPN").await.unwrap();
        assert_eq!(answer, "respuesta");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "model-x");
        assert_eq!(requests[0].system_prompt, ANSWER_SYSTEM_PROMPT);
        assert_eq!(requests[0].user_prompt, "Context: usa la VPN\n\nQuery: ¿cómo entro?");
        assert_eq!(requests[0].max_tokens, 1024);
    }

    #[tokio::test]
    async fn empty_context_still_generates() {
        let provider = Arc::new(MockProvider::new("mock"));
        let generator = TextGenerator::new(provider.clone(), "m");
        generator.generate_answer("hola", "").await.unwrap();
        assert_eq!(provider.requests()[0].user_prompt, "Context: \n\nQuery: hola");
    }

    #[tokio::test]
    async fn summary_sends_thread_text_verbatim() {
        let provider = Arc::new(MockProvider::new("mock").with_response("resumen"));
        let generator = TextGenerator::new(provider.clone(), "m");
        let summary = generator.generate_summary("paso uno paso dos").await.unwrap();
        assert_eq!(summary, "resumen");
        let request = &provider.requests()[0];
        assert_eq!(request.system_prompt, SUMMARY_SYSTEM_PROMPT);
        assert_eq!(request.user_prompt, "paso uno paso dos");
    }

    #[tokio::test]
    async fn provider_errors_become_generation_errors() {
        let provider = Arc::new(MockProvider::new("bedrock").failing("read timed out"));
        let generator = TextGenerator::new(provider, "m");
        let err = generator.generate_answer("q", "c").await.unwrap_err();
        match err {
            RecallError::Generation { provider, message } => {
                assert_eq!(provider, "bedrock");
                assert_eq!(message, "read timed out");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
