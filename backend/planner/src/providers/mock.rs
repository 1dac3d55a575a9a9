use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use recall_core::{LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns canned responses and remembers every
/// request it was given.
pub struct MockProvider {
    name: String,
    fixed_response: Option<String>,
    failure: Option<String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Fail every call with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(req.clone());
        }
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        Ok(LlmResponse {
            content: self.fixed_response.clone().unwrap_or_else(|| "Mock response".to_string()),
            provider: self.name.clone(),
            model: req.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
