/// Embedding providers for Recall.
///
/// The production provider calls a Cohere embedding model hosted on AWS
/// Bedrock. All providers implement the `EmbeddingProvider` trait.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The caller passed something that cannot be embedded.
    #[error("invalid embedding input: {0}")]
    InvalidInput(String),

    /// The endpoint answered, but not with one vector per text.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts: one vector per text, same order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::MalformedResponse("no vector returned".into()))
    }
}

/// Reject inputs no provider can embed.
pub fn check_batch(texts: &[&str]) -> Result<(), EmbeddingError> {
    if texts.is_empty() {
        return Err(EmbeddingError::InvalidInput("texts must be a non-empty list of strings".into()));
    }
    if let Some(i) = texts.iter().position(|t| t.trim().is_empty()) {
        return Err(EmbeddingError::InvalidInput(format!("text at index {i} is empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cohere on AWS Bedrock
// ---------------------------------------------------------------------------

/// Cohere embed v3 accepts at most this many texts per call.
const COHERE_MAX_BATCH: usize = 96;

pub struct BedrockCohereEmbeddings {
    endpoint: String,
    model_id: String,
    api_key: Option<String>,
    client: Client,
}

impl BedrockCohereEmbeddings {
    /// `endpoint` is the Bedrock runtime base URL, e.g.
    /// `https://bedrock-runtime.us-east-1.amazonaws.com`.
    pub fn new(endpoint: impl Into<String>, model_id: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model_id: model_id.into(),
            api_key,
            client,
        }
    }

    async fn invoke(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!(
            "{}/model/{}/invoke",
            self.endpoint,
            urlencoding::encode(&self.model_id)
        );
        let body = CohereEmbedRequest { texts, input_type: "search_query" };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res: CohereEmbedResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if res.embeddings.len() != texts.len() {
            return Err(EmbeddingError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                res.embeddings.len()
            )));
        }
        Ok(res.embeddings)
    }
}

#[derive(Serialize)]
struct CohereEmbedRequest<'a> {
    texts: &'a [&'a str],
    input_type: &'a str,
}

#[derive(Deserialize)]
struct CohereEmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for BedrockCohereEmbeddings {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        check_batch(texts)?;
        debug!(model = %self.model_id, count = texts.len(), "Embedding texts");

        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(COHERE_MAX_BATCH) {
            out.extend(self.invoke(batch).await?);
        }
        Ok(out)
    }
}
