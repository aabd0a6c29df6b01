//! Database operations for the index module

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use libsql::{Connection, Row, Rows, params};
use tracing::{debug, instrument};

use crate::index::error::DbError;
use crate::index::schema;
use crate::index::Collection;
use crate::model::embedding::EmbeddingConversion;
use crate::processor::ProcessedChunk;

/// Database manager for the index
#[derive(Clone)]
pub struct Database {
    conn: Connection,
    dimensions: usize,
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0) as i64
}

impl Database {
    /// Create a new database manager over an existing connection
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection, dimensions: usize) -> Result<Self, DbError> {
        schema::initialize_schema(&conn, dimensions).await?;

        Ok(Self { conn, dimensions })
    }

    /// Open (or create) the index database in a directory.
    ///
    /// The directory is created when missing; the database file inside it
    /// is named `index.db`.
    pub async fn open(dir: &Path, dimensions: usize) -> Result<Self, DbError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| DbError::Connection(format!("Failed to create index dir: {}", e)))?;

        let path = dir.join("index.db").to_string_lossy().to_string();
        let db = libsql::Builder::new_local(&path)
            .build()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn, dimensions).await
    }

    /// Embedding dimensionality this database was opened with
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Execute a custom query with parameters
    pub async fn execute_query<P>(&self, sql: &str, params: P) -> Result<Rows, DbError>
    where
        P: libsql::params::IntoParams,
    {
        self.conn
            .query(sql, params)
            .await
            .map_err(|e| DbError::Query(format!("Failed to execute query: {}", e)))
    }

    /// Get a collection by name, creating it when missing.
    ///
    /// An existing collection must match the database dimensionality.
    #[instrument(skip(self))]
    pub async fn get_or_create_collection(&self, name: &str) -> Result<Collection, DbError> {
        if let Some(collection) = self.get_collection(name).await? {
            if collection.dimensions as usize != self.dimensions {
                return Err(DbError::Dimensions {
                    expected: collection.dimensions as usize,
                    actual: self.dimensions,
                });
            }
            return Ok(collection);
        }

        self.conn
            .execute(
                "INSERT INTO collections (name, dimensions, created_at) VALUES (?, ?, ?)",
                params![name, self.dimensions as i64, unix_now()],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to create collection: {}", e)))?;

        self.get_collection(name).await?.ok_or_else(|| {
            DbError::Data(format!("Collection {} missing after insert", name))
        })
    }

    /// Get a collection by name
    pub async fn get_collection(&self, name: &str) -> Result<Option<Collection>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, dimensions, created_at FROM collections WHERE name = ?",
                params![name],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to get collection: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_collection(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::Data(format!("Failed to get collection: {}", e))),
        }
    }

    /// List all collections
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> Result<Vec<Collection>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, dimensions, created_at FROM collections ORDER BY name",
                params![],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to list collections: {}", e)))?;

        let mut collections = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            collections.push(row_to_collection(&row)?);
        }

        Ok(collections)
    }

    /// Add processed chunks to a collection.
    ///
    /// Chunks are appended in a single transaction; nothing is deduplicated,
    /// so indexing the same content twice stores it twice. Every embedding
    /// must match the database dimensionality.
    #[instrument(skip(self, chunks), fields(chunk_count = chunks.len()))]
    pub async fn add_chunks(
        &self,
        collection: &Collection,
        chunks: &[ProcessedChunk],
    ) -> Result<usize, DbError> {
        for chunk in chunks {
            if chunk.embedding.vec.len() != self.dimensions {
                return Err(DbError::Dimensions {
                    expected: self.dimensions,
                    actual: chunk.embedding.vec.len(),
                });
            }
        }

        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| DbError::Transaction(format!("Failed to start transaction: {}", e)))?;

        let now = unix_now();
        for chunk in chunks {
            tx.execute(
                "INSERT INTO chunks (collection_id, source, page, position, text, embedding, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    collection.id,
                    chunk.metadata.source.to_string_lossy().to_string(),
                    chunk.metadata.page.map(|p| p as i64),
                    chunk.metadata.position as i64,
                    chunk.text.clone(),
                    libsql::Value::Blob(chunk.embedding.to_binary()),
                    now,
                ],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to add chunk: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(format!("Failed to commit transaction: {}", e)))?;

        debug!("Added {} chunks to {}", chunks.len(), collection.name);
        Ok(chunks.len())
    }

    /// Count the chunks stored in a collection
    pub async fn count_chunks(&self, collection: &Collection) -> Result<usize, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*) FROM chunks WHERE collection_id = ?",
                params![collection.id],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to count chunks: {}", e)))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(0),
            Err(e) => return Err(DbError::Data(format!("Failed to get count: {}", e))),
        };

        let count: i64 = row
            .get(0)
            .map_err(|e| DbError::Data(format!("Failed to get count: {}", e)))?;
        Ok(count as usize)
    }
}

fn row_to_collection(row: &Row) -> Result<Collection, DbError> {
    Ok(Collection {
        id: row
            .get(0)
            .map_err(|e| DbError::Data(format!("Failed to get id: {}", e)))?,
        name: row
            .get(1)
            .map_err(|e| DbError::Data(format!("Failed to get name: {}", e)))?,
        dimensions: row
            .get(2)
            .map_err(|e| DbError::Data(format!("Failed to get dimensions: {}", e)))?,
        created_at: row
            .get(3)
            .map_err(|e| DbError::Data(format!("Failed to get created_at: {}", e)))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use rig::embeddings::Embedding;
    use tempfile::tempdir;

    use crate::processor::ChunkMetadata;

    async fn setup_test_db() -> (Database, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db = Database::open(temp_dir.path(), 4).await.unwrap();
        (db, temp_dir)
    }

    fn test_chunk(text: &str, position: usize) -> ProcessedChunk {
        ProcessedChunk {
            text: text.to_string(),
            embedding: Embedding {
                document: text.to_string(),
                vec: vec![0.1, 0.2, 0.3, 0.4],
            },
            metadata: ChunkMetadata {
                source: PathBuf::from("handbook.pdf"),
                page: Some(1),
                position,
                start: position * 800,
            },
        }
    }

    #[tokio::test]
    async fn test_database_initialization() {
        let (db, _temp_dir) = setup_test_db().await;

        let mut result = db
            .execute_query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('collections', 'chunks')",
                params![],
            )
            .await
            .unwrap();

        let mut tables = Vec::new();
        while let Ok(Some(row)) = result.next().await {
            let table_name: String = row.get(0).unwrap();
            tables.push(table_name);
        }

        assert_eq!(tables.len(), 2);
        assert!(tables.contains(&"collections".to_string()));
        assert!(tables.contains(&"chunks".to_string()));
    }

    #[tokio::test]
    async fn test_get_or_create_collection_is_idempotent() {
        let (db, _temp_dir) = setup_test_db().await;

        let first = db.get_or_create_collection("prospectus").await.unwrap();
        let second = db.get_or_create_collection("prospectus").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.name, "prospectus");
        assert_eq!(first.dimensions, 4);

        let collections = db.list_collections().await.unwrap();
        assert_eq!(collections.len(), 1);
    }

    #[tokio::test]
    async fn test_add_chunks_and_count() {
        let (db, _temp_dir) = setup_test_db().await;
        let collection = db.get_or_create_collection("prospectus").await.unwrap();

        let chunks = vec![test_chunk("first", 0), test_chunk("second", 1)];
        let added = db.add_chunks(&collection, &chunks).await.unwrap();

        assert_eq!(added, 2);
        assert_eq!(db.count_chunks(&collection).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reindexing_appends_rather_than_replaces() {
        let (db, _temp_dir) = setup_test_db().await;
        let collection = db.get_or_create_collection("prospectus").await.unwrap();

        let chunks = vec![test_chunk("repeat", 0)];
        db.add_chunks(&collection, &chunks).await.unwrap();
        db.add_chunks(&collection, &chunks).await.unwrap();

        assert_eq!(db.count_chunks(&collection).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_chunks_rejects_wrong_dimensions() {
        let (db, _temp_dir) = setup_test_db().await;
        let collection = db.get_or_create_collection("prospectus").await.unwrap();

        let mut chunk = test_chunk("short vector", 0);
        chunk.embedding.vec = vec![0.1, 0.2];

        let err = db.add_chunks(&collection, &[chunk]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Dimensions {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_collection_dimension_mismatch_detected() {
        let temp_dir = tempdir().unwrap();

        let db = Database::open(temp_dir.path(), 4).await.unwrap();
        db.get_or_create_collection("prospectus").await.unwrap();
        drop(db);

        let db = Database::open(temp_dir.path(), 8).await.unwrap();
        let err = db.get_or_create_collection("prospectus").await.unwrap_err();
        assert!(matches!(err, DbError::Dimensions { .. }));
    }
}
