//! Vector retrieval for the search module.
//!
//! The query is embedded, candidate chunks come back from the
//! `vector_top_k` index, and the candidates are re-ranked by exact cosine
//! similarity against the query vector. Ranks are unique even when scores
//! tie: ties keep their candidate order.

use rig::{completion::CompletionModel, embeddings::EmbeddingModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::index::Database;
use crate::model::Client;
use crate::model::embedding::EmbeddingConversion;
use crate::search::error::SearchError;

/// Options for search queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of results to return
    pub limit: usize,

    /// Restrict the search to one collection by name
    pub collection: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 4,
            collection: None,
        }
    }
}

/// Search result with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// ID of the chunk
    pub chunk_id: i64,

    /// Text content of the chunk
    pub text: String,

    /// Path of the file the chunk came from
    pub source: String,

    /// Page number within the source, for paginated formats
    pub page: Option<i64>,

    /// Cosine similarity against the query
    pub score: f64,

    /// 1-based rank within the result set
    pub rank: usize,
}

/// A candidate row fetched from the vector index, before ranking
struct Candidate {
    chunk_id: i64,
    text: String,
    source: String,
    page: Option<i64>,
    embedding: Vec<f32>,
}

/// Search the index with the given query and options
#[instrument(skip(db, client, options))]
pub async fn search_index<C, E>(
    db: &Database,
    client: &Client<C, E>,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>, SearchError>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    if options.limit == 0 {
        return Err(SearchError::InvalidParameters(
            "limit must be greater than zero".to_string(),
        ));
    }
    if query.trim().is_empty() {
        return Err(SearchError::InvalidParameters(
            "query must not be empty".to_string(),
        ));
    }

    let query_embedding = client
        .embedding()
        .embed_texts(vec![query.to_string()])
        .await
        .map_err(|e| SearchError::Embedding(format!("Failed to embed query: {}", e)))?
        .first()
        .ok_or_else(|| SearchError::Embedding("no embedding returned for query".to_string()))?
        .clone();

    let query_vec = query_embedding.to_vec();
    let candidates = fetch_candidates(db, &query_embedding.to_binary(), options).await?;
    debug!("Fetched {} candidates", candidates.len());

    Ok(rank_results(candidates, &query_vec))
}

/// Fetch the nearest chunks from the vector index
async fn fetch_candidates(
    db: &Database,
    embedding_blob: &[u8],
    options: &SearchOptions,
) -> Result<Vec<Candidate>, SearchError> {
    let mut sql = String::from(
        "SELECT c.id, c.text, c.source, c.page, c.embedding
         FROM vector_top_k('chunks_idx', ?, ?) as v
         JOIN chunks c ON c.rowid = v.id
         JOIN collections col ON c.collection_id = col.id",
    );

    let mut params: Vec<libsql::Value> = Vec::new();
    params.push(libsql::Value::Blob(embedding_blob.to_vec()));
    params.push(libsql::Value::from(options.limit as i64));

    if let Some(collection) = &options.collection {
        sql.push_str(" WHERE col.name = ?");
        params.push(collection.clone().into());
    }

    let mut rows = db.execute_query(&sql, params).await?;

    let mut candidates = Vec::new();
    while let Ok(Some(row)) = rows.next().await {
        let embedding_blob: Vec<u8> = row.get(4).map_err(|e| {
            SearchError::ResultProcessing(format!("Failed to get embedding: {}", e))
        })?;

        candidates.push(Candidate {
            chunk_id: row.get(0).map_err(|e| {
                SearchError::ResultProcessing(format!("Failed to get chunk_id: {}", e))
            })?,
            text: row
                .get(1)
                .map_err(|e| SearchError::ResultProcessing(format!("Failed to get text: {}", e)))?,
            source: row.get(2).map_err(|e| {
                SearchError::ResultProcessing(format!("Failed to get source: {}", e))
            })?,
            page: row
                .get(3)
                .map_err(|e| SearchError::ResultProcessing(format!("Failed to get page: {}", e)))?,
            embedding: blob_to_f32(&embedding_blob),
        });
    }

    Ok(candidates)
}

fn blob_to_f32(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(chunk);
            f32::from_le_bytes(bytes)
        })
        .collect()
}

/// Rank candidates by cosine similarity against the query vector.
///
/// The sort is stable, so candidates with equal scores keep their fetch
/// order and every result gets a distinct rank.
fn rank_results(candidates: Vec<Candidate>, query_vec: &[f32]) -> Vec<SearchResult> {
    let mut scored: Vec<(f64, Candidate)> = candidates
        .into_iter()
        .map(|candidate| {
            let score = cosine_similarity(query_vec, &candidate.embedding);
            (score, candidate)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (score, candidate))| SearchResult {
            chunk_id: candidate.chunk_id,
            text: candidate.text,
            source: candidate.source,
            page: candidate.page,
            score,
            rank: i + 1,
        })
        .collect()
}

/// Cosine similarity between two vectors; zero when either has zero norm
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, embedding: Vec<f32>) -> Candidate {
        Candidate {
            chunk_id: id,
            text: format!("chunk {}", id),
            source: "handbook.pdf".to_string(),
            page: Some(1),
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_zero_norm() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_rank_results_orders_by_similarity() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            candidate(1, vec![0.0, 1.0]),
            candidate(2, vec![1.0, 0.0]),
            candidate(3, vec![1.0, 1.0]),
        ];

        let results = rank_results(candidates, &query);

        assert_eq!(results[0].chunk_id, 2);
        assert_eq!(results[1].chunk_id, 3);
        assert_eq!(results[2].chunk_id, 1);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_rank_results_assigns_unique_ranks_on_ties() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            candidate(1, vec![2.0, 0.0]),
            candidate(2, vec![3.0, 0.0]),
            candidate(3, vec![4.0, 0.0]),
        ];

        let results = rank_results(candidates, &query);

        let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        // Stable sort keeps tied candidates in fetch order
        let ids: Vec<i64> = results.iter().map(|r| r.chunk_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_blob_round_trip() {
        let values = [0.5f32, -1.5, 2.25];
        let blob: Vec<u8> = values.iter().flat_map(|f| f.to_le_bytes()).collect();
        assert_eq!(blob_to_f32(&blob), values.to_vec());
    }
}
