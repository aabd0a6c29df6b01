//! Error types for the processor module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for document processing operations
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Invalid chunking options
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(#[from] rig::embeddings::EmbeddingError),

    /// Embedding result processing error
    #[error("Embedding processing error: {0}")]
    EmbeddingProcessing(String),

    /// Concurrency limiter error
    #[error("Semaphore error: {0}")]
    Semaphore(String),

    /// Background task error
    #[error("Task failed: {0}")]
    Task(String),
}

impl From<ProcessError> for CrateError {
    fn from(err: ProcessError) -> Self {
        CrateError::Process(err.to_string())
    }
}
