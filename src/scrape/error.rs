//! Error types for the scrape module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for page scraping operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The page did not respond within the configured deadline
    #[error("Timed out fetching {url} after {attempts} attempts")]
    Timeout {
        /// The URL that timed out
        url: String,
        /// Number of attempts made before giving up
        attempts: u32,
    },

    /// Page rendering error
    #[error("Render error: {0}")]
    Render(String),

    /// Text extraction error
    #[error("Extraction error: {0}")]
    Extract(String),

    /// Document file writing error
    #[error("Document error: {0}")]
    Document(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for ScrapeError {
    fn from(err: zip::result::ZipError) -> Self {
        ScrapeError::Document(err.to_string())
    }
}

impl From<ScrapeError> for CrateError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::Http(e) => CrateError::Http(e),
            ScrapeError::Io(e) => CrateError::Io(e),
            _ => CrateError::Scrape(err.to_string()),
        }
    }
}
