//! Database schema for the vector index.
//!
//! Two tables: `collections` holds one row per named collection with its
//! embedding dimensionality, and `chunks` holds the content segments with
//! their embeddings as F32 blobs. The vector index over the embedding
//! column enables `vector_top_k` retrieval; its creation is allowed to
//! fail so the database still works where the vector extension is missing.

use crate::index::error::DbError;
use libsql::{Connection, params};
use tracing::warn;

/// Initialize the database schema.
///
/// The embedding column is sized to `dimensions`; the value only matters
/// the first time the tables are created.
pub async fn initialize_schema(conn: &Connection, dimensions: usize) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS collections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            dimensions INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create collections table: {}", e)))?;

    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                collection_id INTEGER NOT NULL,
                source TEXT NOT NULL,
                page INTEGER,
                position INTEGER NOT NULL,
                text TEXT NOT NULL,
                embedding F32_BLOB({}) NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (collection_id) REFERENCES collections(id) ON DELETE CASCADE
            )",
            dimensions
        ),
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create chunks table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_chunks_collection_id ON chunks(collection_id)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on chunks: {}", e)))?;

    // This fails where the vector extension is not available; the database
    // still works for everything except vector search.
    let vector_index_result = conn
        .execute(
            "CREATE INDEX IF NOT EXISTS chunks_idx ON chunks (libsql_vector_idx(embedding))",
            params![],
        )
        .await;

    if let Err(e) = vector_index_result {
        warn!(
            "Failed to create vector index: {}. Vector search will not be available.",
            e
        );
    }

    Ok(())
}
