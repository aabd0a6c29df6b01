//! Document processor module
//!
//! This module turns loaded documents into embedded chunks ready for
//! indexing: text is split into overlapping windows and each window is
//! embedded with bounded concurrency.

mod chunking;
mod config;
mod error;

pub use chunking::{Chunk, chunk_text};
pub use config::ChunkOptions;
pub use error::ProcessError;

use std::path::PathBuf;
use std::sync::Arc;

use futures::future;
use rig::{
    completion::CompletionModel,
    embeddings::{Embedding, EmbeddingModel},
};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument};

use crate::loader::Document;
use crate::model::Client;

/// A chunk with its embedding, ready for indexing
#[derive(Debug, Clone)]
pub struct ProcessedChunk {
    /// The text of the chunk
    pub text: String,

    /// The embedding of the chunk
    pub embedding: Embedding,

    /// Metadata for the chunk
    pub metadata: ChunkMetadata,
}

/// Metadata for a processed chunk
#[derive(Debug, Clone)]
pub struct ChunkMetadata {
    /// Path of the file the chunk came from
    pub source: PathBuf,

    /// Page number within the source, for paginated formats
    pub page: Option<u32>,

    /// The position of the chunk within its document
    pub position: usize,

    /// Character offset of the chunk within its document
    pub start: usize,
}

/// Generate an embedding for a single chunk of text
#[instrument(skip(client, text))]
pub async fn generate_chunk_embedding<C, E>(
    client: &Client<C, E>,
    text: &str,
) -> Result<Embedding, ProcessError>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    let embedding = client
        .embedding()
        .embed_texts(vec![text.to_string()])
        .await?
        .first()
        .ok_or(ProcessError::EmbeddingProcessing(
            "failed to extract embedding".to_string(),
        ))?
        .clone();
    Ok(embedding)
}

/// Process documents into embedded chunks
///
/// Each document is chunked with the given options and every chunk is
/// embedded. Embedding calls run in parallel with bounded concurrency;
/// the returned chunks keep document order.
#[instrument(skip(client, documents), fields(document_count = documents.len()))]
pub async fn process_documents<C, E>(
    client: &Client<C, E>,
    documents: Vec<Document>,
    options: &ChunkOptions,
) -> Result<Vec<ProcessedChunk>, ProcessError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    options.validate()?;

    // Chunk everything up front so the spawned tasks only do API work
    let mut pending = Vec::new();
    for document in documents {
        let chunks = chunk_text(&document.text, options)?;
        debug!(
            "Chunked {} into {} chunks",
            document.source.display(),
            chunks.len()
        );
        for chunk in chunks {
            pending.push((document.source.clone(), document.page, chunk));
        }
    }

    info!("Embedding {} chunks", pending.len());

    // Limit concurrent API calls
    let semaphore = Arc::new(Semaphore::new(5));

    let tasks = pending
        .into_iter()
        .map(|(source, page, chunk)| {
            let permit = semaphore.clone().acquire_owned();
            let client = client.clone();

            tokio::spawn(async move {
                let _permit = permit
                    .await
                    .map_err(|e| ProcessError::Semaphore(e.to_string()))?;

                let embedding = generate_chunk_embedding(&client, &chunk.text).await?;

                Ok::<ProcessedChunk, ProcessError>(ProcessedChunk {
                    text: chunk.text,
                    embedding,
                    metadata: ChunkMetadata {
                        source,
                        page,
                        position: chunk.position,
                        start: chunk.start,
                    },
                })
            })
        })
        .collect::<Vec<_>>();

    let results = future::join_all(tasks).await;

    let mut processed_chunks = Vec::new();
    for result in results {
        match result {
            Ok(Ok(chunk)) => processed_chunks.push(chunk),
            Ok(Err(e)) => return Err(e),
            Err(e) => return Err(ProcessError::Task(format!("Task failed: {}", e))),
        }
    }

    Ok(processed_chunks)
}
