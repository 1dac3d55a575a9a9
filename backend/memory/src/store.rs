use std::cmp::Ordering;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::distance::DistanceMetric;
use crate::types::{MemoryQuery, SearchResult, VectorEntry};

/// Abstract interface for vector storage.
///
/// Entries are immutable once written: there is no update or delete.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Insert a batch of new entries. Either all of them are written or none.
    async fn insert(&self, entries: Vec<VectorEntry>) -> Result<()>;

    /// Nearest neighbours of `query.vector`, closest first. Ties keep
    /// insertion order.
    async fn search(&self, query: MemoryQuery) -> Result<Vec<SearchResult>>;

    /// Look entries up by id, in request order. Unknown ids are skipped.
    async fn get(&self, ids: &[String]) -> Result<Vec<VectorEntry>>;

    /// Number of stored entries.
    async fn count(&self) -> Result<usize>;
}

/// Rank `entries` against `query` and keep the `limit` closest.
pub(crate) fn rank(
    metric: DistanceMetric,
    query: &MemoryQuery,
    entries: impl IntoIterator<Item = VectorEntry>,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = entries
        .into_iter()
        .map(|entry| {
            let distance = metric.distance(&query.vector, &entry.vector);
            SearchResult { entry, distance }
        })
        .collect();

    // Stable sort: equal distances stay in insertion order.
    results.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    results.truncate(query.limit);
    results
}

/// Simple in-memory vector store for tests and ephemeral runs.
/// Uses a brute-force scan.
pub struct InMemoryVectorStore {
    metric: DistanceMetric,
    entries: RwLock<Vec<VectorEntry>>,
}

impl InMemoryVectorStore {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new(DistanceMetric::default())
    }
}

#[async_trait]
impl MemoryStore for InMemoryVectorStore {
    async fn insert(&self, new_entries: Vec<VectorEntry>) -> Result<()> {
        let mut entries = self.entries.write().await;
        for (i, entry) in new_entries.iter().enumerate() {
            let clashes = entries.iter().any(|e| e.id == entry.id)
                || new_entries[..i].iter().any(|e| e.id == entry.id);
            if clashes {
                bail!("Document id '{}' already exists", entry.id);
            }
        }
        entries.extend(new_entries);
        Ok(())
    }

    async fn search(&self, query: MemoryQuery) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().await;
        Ok(rank(self.metric, &query, entries.iter().cloned()))
    }

    async fn get(&self, ids: &[String]) -> Result<Vec<VectorEntry>> {
        let entries = self.entries.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| entries.iter().find(|e| &e.id == id).cloned())
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, content: &str, vector: Vec<f32>) -> VectorEntry {
        VectorEntry {
            id: id.to_string(),
            content: content.to_string(),
            vector,
            metadata: serde_json::json!({}),
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_search() {
        let store = InMemoryVectorStore::default();
        store
            .insert(vec![
                entry("cat", "The cat sits on the mat", vec![1.0, 0.0, 0.0]),
                entry("dog", "The dog barks at the mailman", vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        // Query close to the cat entry
        let results = store
            .search(MemoryQuery { vector: vec![0.9, 0.1, 0.0], limit: 2 })
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entry.id, "cat");
        assert!(results[0].distance < results[1].distance);
    }

    #[tokio::test]
    async fn equal_distances_keep_insertion_order() {
        let store = InMemoryVectorStore::default();
        store
            .insert(vec![
                entry("first", "a", vec![1.0, 0.0]),
                entry("second", "b", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();
        let results = store
            .search(MemoryQuery { vector: vec![1.0, 0.0], limit: 10 })
            .await
            .unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.entry.id.as_str()).collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[tokio::test]
    async fn duplicate_ids_reject_the_whole_batch() {
        let store = InMemoryVectorStore::default();
        store.insert(vec![entry("a", "x", vec![1.0])]).await.unwrap();
        let err = store
            .insert(vec![entry("b", "y", vec![1.0]), entry("a", "z", vec![1.0])])
            .await;
        assert!(err.is_err());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_returns_request_order_and_skips_unknown() {
        let store = InMemoryVectorStore::default();
        store
            .insert(vec![entry("a", "alpha", vec![1.0]), entry("b", "beta", vec![0.5])])
            .await
            .unwrap();
        let found = store
            .get(&["b".to_string(), "missing".to_string(), "a".to_string()])
            .await
            .unwrap();
        let contents: Vec<_> = found.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["beta", "alpha"]);
    }
}
