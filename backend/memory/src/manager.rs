//! Document Store: the bot's only way into the collection.
//!
//! Writes summaries with keyword metadata, finds the single closest stored
//! document for a query, and fetches stored text by id.

use anyhow::Context;
use recall_core::RecallError;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::collection::Collection;
use crate::keywords::{DEFAULT_KEYWORD_COUNT, extract_keywords};
use crate::policy::{ErrorPolicy, Operation};
use crate::stopwords::StopWordLanguage;

/// Neighbours requested per similarity query before the distance filter.
pub const QUERY_RESULTS: usize = 10;

pub struct DocumentStore {
    collection: Collection,
    stop_words: StopWordLanguage,
    read_policy: ErrorPolicy,
    write_policy: ErrorPolicy,
}

impl DocumentStore {
    pub fn new(collection: Collection, stop_words: StopWordLanguage) -> Self {
        Self {
            collection,
            stop_words,
            read_policy: ErrorPolicy::for_operation(Operation::Read),
            write_policy: ErrorPolicy::for_operation(Operation::Write),
        }
    }

    /// Override how read and write failures surface.
    pub fn with_policies(mut self, read: ErrorPolicy, write: ErrorPolicy) -> Self {
        self.read_policy = read;
        self.write_policy = write;
        self
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Store each text under a fresh UUID with its top keywords as metadata.
    /// Returns the generated ids, in input order.
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub async fn store_documents(&self, texts: &[String]) -> Result<Vec<String>, RecallError> {
        let result = self.try_store(texts).await;
        self.write_policy.apply(Operation::Write, result)
    }

    async fn try_store(&self, texts: &[String]) -> anyhow::Result<Vec<String>> {
        let ids: Vec<String> = texts.iter().map(|_| Uuid::new_v4().to_string()).collect();
        let metadatas = texts
            .iter()
            .map(|text| {
                let keywords = extract_keywords(text, DEFAULT_KEYWORD_COUNT, self.stop_words);
                serde_json::json!({ "keywords": keywords.join(",") })
            })
            .collect();

        self.collection
            .add(ids.clone(), texts.to_vec(), metadatas)
            .await
            .context("Failed to add documents")?;

        info!(collection = %self.collection.name(), ids = ?ids, "Stored documents");
        Ok(ids)
    }

    /// The id of the closest stored document within `max_distance` of `query`,
    /// or `None` when nothing qualifies.
    #[instrument(skip(self, query))]
    pub async fn retrieve_documents(
        &self,
        query: &str,
        max_distance: f32,
    ) -> Result<Option<String>, RecallError> {
        let result = self.try_retrieve(query, max_distance).await;
        self.read_policy.apply(Operation::Read, result)
    }

    async fn try_retrieve(&self, query: &str, max_distance: f32) -> anyhow::Result<Option<String>> {
        let result = self
            .collection
            .query(&[query], QUERY_RESULTS)
            .await
            .context("Failed to query documents")?;

        let (Some(ids), Some(distances)) = (result.ids.first(), result.distances.first()) else {
            return Ok(None);
        };
        let closest = closest_within(ids, distances, max_distance);
        debug!(candidates = ids.len(), closest = ?closest, "Similarity query done");
        Ok(closest)
    }

    /// Stored text for `id`, if present.
    ///
    /// Unlike the similarity query, a failed lookup is returned: the id was
    /// just retrieved, so a miss here means the store is broken.
    pub async fn get_document_content(&self, id: &str) -> Result<Option<String>, RecallError> {
        self.collection
            .get(&[id.to_string()])
            .await
            .map(|got| got.documents.into_iter().next())
            .map_err(|e| {
                error!(id, error = ?e, "Document lookup failed");
                RecallError::Retrieval(format!("Failed to fetch document {id}: {e:#}"))
            })
    }
}

/// First id whose distance is at most `max_distance`. Inputs are in ranked
/// order, so this is the closest qualifying document.
pub fn closest_within(ids: &[String], distances: &[f32], max_distance: f32) -> Option<String> {
    ids.iter()
        .zip(distances)
        .find(|(_, d)| **d <= max_distance)
        .map(|(id, _)| id.clone())
}
