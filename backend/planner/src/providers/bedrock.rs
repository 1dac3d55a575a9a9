use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use recall_core::{LlmProvider, LlmRequest, LlmResponse};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Generation can take minutes on long contexts.
const READ_TIMEOUT: Duration = Duration::from_secs(1000);

/// Anthropic models on AWS Bedrock, via the runtime `InvokeModel` endpoint.
pub struct BedrockProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl BedrockProvider {
    /// `endpoint` is the Bedrock runtime base URL; `api_key` a Bedrock API key
    /// sent as a bearer token.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(READ_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: Vec<InvokeMessage<'a>>,
}

#[derive(Serialize)]
struct InvokeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[async_trait]
impl LlmProvider for BedrockProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();

        let body = InvokeRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: request.max_tokens,
            system: &request.system_prompt,
            messages: vec![InvokeMessage {
                role: "user",
                content: &request.user_prompt,
            }],
        };

        debug!(model = %request.model, "Sending request to Bedrock");

        let url = format!(
            "{}/model/{}/invoke",
            self.endpoint,
            urlencoding::encode(&request.model)
        );
        let mut http = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }
        let response = http.send().await.context("Bedrock HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Bedrock returned {}: {}", status, error_body);
        }

        let invoke: InvokeResponse = response
            .json()
            .await
            .context("Failed to parse Bedrock response")?;

        let content = invoke
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .context("Bedrock response has no text content")?;

        let tokens_used = invoke
            .usage
            .map(|u| u.input_tokens + u.output_tokens)
            .unwrap_or(0);

        Ok(LlmResponse {
            content,
            provider: "bedrock".to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn request() -> LlmRequest {
        LlmRequest {
            model: "anthropic.claude-3-5-sonnet-20240620-v1:0".into(),
            system_prompt: "Be brief.".into(),
            user_prompt: "Context: \n\nQuery: hola".into(),
            max_tokens: 1024,
        }
    }

    #[tokio::test]
    async fn sends_anthropic_messages_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/model/anthropic.claude-3-5-sonnet-20240620-v1%3A0/invoke",
            )
            .match_header("authorization", "Bearer bedrock-key")
            .match_body(Matcher::Json(serde_json::json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": 1024,
                "system": "Be brief.",
                "messages": [{"role": "user", "content": "Context: \n\nQuery: hola"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"msg_1","type":"message","role":"assistant",
                    "content":[{"type":"text","text":"¡Hola!"}],
                    "usage":{"input_tokens":12,"output_tokens":3}}"#,
            )
            .create_async()
            .await;

        let provider = BedrockProvider::new(server.url(), Some("bedrock-key".into()));
        let response = provider.complete(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "¡Hola!");
        assert_eq!(response.tokens_used, 15);
        assert_eq!(response.provider, "bedrock");
    }

    #[tokio::test]
    async fn error_status_includes_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(400)
            .with_body(r#"{"message":"Malformed input request"}"#)
            .create_async()
            .await;

        let provider = BedrockProvider::new(server.url(), None);
        let err = provider.complete(&request()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("Malformed input request"));
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let provider = BedrockProvider::new(server.url(), None);
        assert!(provider.complete(&request()).await.is_err());
    }
}
