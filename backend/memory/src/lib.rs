pub mod chunker;
pub mod collection;
pub mod distance;
pub mod embeddings;
pub mod keywords;
pub mod manager;
pub mod policy;
pub mod sqlite_store;
pub mod stopwords;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use chunker::{TokenChunk, render_chunks, tokenize};
pub use collection::Collection;
pub use distance::DistanceMetric;
pub use embeddings::{BedrockCohereEmbeddings, EmbeddingError, EmbeddingProvider};
pub use keywords::extract_keywords;
pub use manager::{DocumentStore, QUERY_RESULTS, closest_within};
pub use policy::{ErrorPolicy, Operation};
pub use sqlite_store::SqliteVecStore;
pub use stopwords::StopWordLanguage;
pub use store::{InMemoryVectorStore, MemoryStore};
pub use types::{GetResult, QueryResult, SearchResult, VectorEntry};
