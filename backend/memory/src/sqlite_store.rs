/// SQLite-backed durable vector store.
///
/// Uses `rusqlite` to persist `VectorEntry` rows in a `documents` table shared
/// by every collection of the database file. Distances are computed in Rust
/// over the collection's rows, a brute-force scan that is fine for the few
/// thousand thread summaries a team accumulates.
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{Connection, params};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::distance::DistanceMetric;
use crate::store::{MemoryStore, rank};
use crate::types::{MemoryQuery, SearchResult, VectorEntry};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
         collection  TEXT NOT NULL,
         id          TEXT NOT NULL,
         content     TEXT NOT NULL,
         vector_json TEXT NOT NULL,
         metadata    TEXT NOT NULL,
         created_at  INTEGER NOT NULL,
         PRIMARY KEY (collection, id)
     );
     CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);";

pub struct SqliteVecStore {
    conn: Mutex<Connection>,
    collection: String,
    metric: DistanceMetric,
}

impl SqliteVecStore {
    /// Create or open a database at the given path and bind to one collection.
    pub fn open(
        path: impl AsRef<Path>,
        collection: impl Into<String>,
        metric: DistanceMetric,
    ) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite document database")?;

        conn.execute_batch(&format!("PRAGMA journal_mode=WAL;\n{SCHEMA}"))
            .context("Failed to initialize documents schema")?;

        let collection = collection.into();
        info!(collection = %collection, "SqliteVecStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn), collection, metric })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory(collection: impl Into<String>, metric: DistanceMetric) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn), collection: collection.into(), metric })
    }
}

#[async_trait]
impl MemoryStore for SqliteVecStore {
    async fn insert(&self, entries: Vec<VectorEntry>) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (collection, id, content, vector_json, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for entry in &entries {
                let vector_json = serde_json::to_string(&entry.vector)?;
                let metadata_json = serde_json::to_string(&entry.metadata)?;
                stmt.execute(params![
                    self.collection,
                    entry.id,
                    entry.content,
                    vector_json,
                    metadata_json,
                    entry.created_at,
                ])
                .with_context(|| format!("Failed to insert document {}", entry.id))?;
            }
        }
        tx.commit()?;
        debug!(collection = %self.collection, count = entries.len(), "Inserted documents");
        Ok(())
    }

    async fn search(&self, query: MemoryQuery) -> Result<Vec<SearchResult>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, content, vector_json, metadata, created_at
             FROM documents WHERE collection = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![self.collection], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rank(self.metric, &query, rows))
    }

    async fn get(&self, ids: &[String]) -> Result<Vec<VectorEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, content, vector_json, metadata, created_at
             FROM documents WHERE collection = ?1 AND id = ?2",
        )?;

        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            let mut rows = stmt.query_map(params![self.collection, id], row_to_entry)?;
            if let Some(row) = rows.next() {
                found.push(row?);
            }
        }
        Ok(found)
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![self.collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

// ---------------------------------------------------------------------------
// Row deserialization helper
// ---------------------------------------------------------------------------

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<VectorEntry> {
    let id: String = row.get(0)?;
    let content: String = row.get(1)?;
    let vector_json: String = row.get(2)?;
    let metadata_json: String = row.get(3)?;
    let created_at: i64 = row.get(4)?;

    let vector: Vec<f32> = serde_json::from_str(&vector_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e)))?;
    let metadata: serde_json::Value = serde_json::from_str(&metadata_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(VectorEntry { id, content, vector, metadata, created_at })
}
