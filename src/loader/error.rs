//! Error types for the loader module

use std::path::PathBuf;

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for document loading operations
#[derive(Debug, Error)]
pub enum LoadError {
    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF parsing error
    #[error("PDF error in {path}: {message}")]
    Pdf {
        /// Path of the file that failed to parse
        path: PathBuf,
        /// Parser error message
        message: String,
    },

    /// DOCX parsing error
    #[error("DOCX error in {path}: {message}")]
    Docx {
        /// Path of the file that failed to parse
        path: PathBuf,
        /// Parser error message
        message: String,
    },

    /// File extension the loader has no reader for
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(PathBuf),

    /// Background parse task error
    #[error("Load task failed: {0}")]
    Task(String),
}

impl From<LoadError> for CrateError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Io(e) => CrateError::Io(e),
            _ => CrateError::Load(err.to_string()),
        }
    }
}
