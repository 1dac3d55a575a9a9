use anyhow::Result;
use async_trait::async_trait;

use crate::message::{OutgoingMessage, ThreadRepliesPage};

/// The chat platform as seen by the dispatcher.
///
/// Adapters deliver inbound events over the EventBus; the dispatcher answers
/// through this trait.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post a message (optionally with blocks) into a thread.
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;

    /// Fetch one page of a thread's replies, root message included.
    async fn fetch_thread_replies(
        &self,
        channel: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> Result<ThreadRepliesPage>;
}

/// Trait for hosted text-generation endpoints.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "bedrock").
    fn name(&self) -> &str;

    /// Send a single-turn completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}
