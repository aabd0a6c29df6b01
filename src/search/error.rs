//! Error types for the search module

use thiserror::Error;

use crate::error::Error as CrateError;
use crate::index::DbError;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Error occurred during database operations
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Error occurred during embedding generation
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Error occurred during answer generation
    #[error("LLM error: {0}")]
    Llm(String),

    /// Error occurred during result processing
    #[error("Result processing error: {0}")]
    ResultProcessing(String),

    /// Invalid search parameters
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),
}

impl From<libsql::Error> for SearchError {
    fn from(err: libsql::Error) -> Self {
        SearchError::Database(DbError::Query(err.to_string()))
    }
}

impl From<SearchError> for CrateError {
    fn from(err: SearchError) -> Self {
        CrateError::Search(err.to_string())
    }
}
