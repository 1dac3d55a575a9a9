use serde::{Deserialize, Serialize};

/// A stored document with its embedding vector and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorEntry {
    /// UUID string, unique within a collection
    pub id: String,
    /// The document text
    pub content: String,
    /// The embedding vector (1024 dim for Cohere embed v3)
    pub vector: Vec<f32>,
    /// Metadata key-value pairs
    pub metadata: serde_json::Value,
    /// Unix timestamp (seconds) when this entry was created
    pub created_at: i64,
}

/// A nearest-neighbour query against a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryQuery {
    /// The embedding vector of the query
    pub vector: Vec<f32>,
    /// Max number of results to return
    pub limit: usize,
}

/// One neighbour of a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub entry: VectorEntry,
    /// Dissimilarity to the query; lower is closer.
    pub distance: f32,
}

/// Batched answer of `Collection::query`: one inner list per query text,
/// each ordered by ascending distance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub ids: Vec<Vec<String>>,
    pub distances: Vec<Vec<f32>>,
}

/// Answer of `Collection::get`, in request order; unknown ids are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GetResult {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
}
