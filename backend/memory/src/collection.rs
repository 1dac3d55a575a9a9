//! A named document collection: texts in, embeddings computed on the way.

use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use tracing::debug;

use crate::embeddings::EmbeddingProvider;
use crate::store::MemoryStore;
use crate::types::{GetResult, MemoryQuery, QueryResult, VectorEntry};

/// Pairs a `MemoryStore` with the embedding function used for both writes
/// and queries, so stored and query vectors always come from the same model.
pub struct Collection {
    name: String,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn MemoryStore>,
}

impl Collection {
    pub fn new(
        name: impl Into<String>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn MemoryStore>,
    ) -> Self {
        Self { name: name.into(), embedder, store }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Embed `texts` and write them under `ids` with `metadatas`.
    ///
    /// The whole batch is embedded before anything is written, so a failure
    /// leaves the collection untouched.
    pub async fn add(
        &self,
        ids: Vec<String>,
        texts: Vec<String>,
        metadatas: Vec<serde_json::Value>,
    ) -> Result<()> {
        ensure!(
            ids.len() == texts.len() && texts.len() == metadatas.len(),
            "ids ({}), texts ({}) and metadatas ({}) must have the same length",
            ids.len(),
            texts.len(),
            metadatas.len()
        );
        if ids.is_empty() {
            return Ok(());
        }

        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self
            .embedder
            .embed_batch(&refs)
            .await
            .context("Failed to embed documents")?;

        let now = chrono::Utc::now().timestamp();
        let entries = ids
            .into_iter()
            .zip(texts)
            .zip(metadatas)
            .zip(vectors)
            .map(|(((id, content), metadata), vector)| VectorEntry {
                id,
                content,
                vector,
                metadata,
                created_at: now,
            })
            .collect::<Vec<_>>();

        debug!(collection = %self.name, count = entries.len(), "Adding documents");
        self.store.insert(entries).await
    }

    /// Nearest neighbours for each query text, up to `n_results` each.
    pub async fn query(&self, query_texts: &[&str], n_results: usize) -> Result<QueryResult> {
        let vectors = self
            .embedder
            .embed_batch(query_texts)
            .await
            .context("Failed to embed query")?;

        let mut result = QueryResult::default();
        for vector in vectors {
            let hits = self.store.search(MemoryQuery { vector, limit: n_results }).await?;
            let (ids, distances): (Vec<String>, Vec<f32>) = hits.into_iter().map(|h| (h.entry.id, h.distance)).unzip();
            result.ids.push(ids);
            result.distances.push(distances);
        }
        Ok(result)
    }

    /// Point lookup of stored texts.
    pub async fn get(&self, ids: &[String]) -> Result<GetResult> {
        let entries = self.store.get(ids).await?;
        let (ids, documents): (Vec<String>, Vec<String>) = entries.into_iter().map(|e| (e.id, e.content)).unzip();
        Ok(GetResult { ids, documents })
    }

    pub async fn count(&self) -> Result<usize> {
        self.store.count().await
    }
}
