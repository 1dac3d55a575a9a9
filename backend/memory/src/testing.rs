//! Deterministic embedding providers and stores for tests.

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::embeddings::{EmbeddingError, EmbeddingProvider, check_batch};
use crate::store::{InMemoryVectorStore, MemoryStore};
use crate::types::{MemoryQuery, SearchResult, VectorEntry};

const DIMENSION: usize = 64;

/// Bag-of-words embeddings: each lowercase word is hashed into one of 64
/// buckets and the vector is L2-normalized. Texts sharing words land close
/// together, which is all retrieval tests need.
pub struct HashEmbeddings;

impl HashEmbeddings {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; DIMENSION];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
            v[bucket as usize % DIMENSION] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddings {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        check_batch(texts)?;
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// Always fails, to exercise error policies.
pub struct FailingEmbeddings;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::MalformedResponse("embedding service unavailable".into()))
    }
}

/// An in-memory store whose lookups by id fail, while writes and
/// similarity search keep working.
#[derive(Default)]
pub struct BrokenLookupStore {
    inner: InMemoryVectorStore,
}

#[async_trait]
impl MemoryStore for BrokenLookupStore {
    async fn insert(&self, entries: Vec<VectorEntry>) -> Result<()> {
        self.inner.insert(entries).await
    }

    async fn search(&self, query: MemoryQuery) -> Result<Vec<SearchResult>> {
        self.inner.search(query).await
    }

    async fn get(&self, _ids: &[String]) -> Result<Vec<VectorEntry>> {
        bail!("database is locked")
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}
