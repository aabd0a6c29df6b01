//! Error types for the prospectus crate

use thiserror::Error;

/// Result type for prospectus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for prospectus operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Link crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Page scraping error
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// Document loading error
    #[error("Load error: {0}")]
    Load(String),

    /// Content processing error
    #[error("Process error: {0}")]
    Process(String),

    /// Vector index error
    #[error("Database error: {0}")]
    Database(String),

    /// Search error
    #[error("Search error: {0}")]
    Search(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// How a pipeline stage reacts to a per-item failure.
///
/// Ingestion stages default to [`ErrorPolicy::Continue`]: a failing URL or
/// file is recorded and the remaining items are still processed. The query
/// path uses [`ErrorPolicy::Abort`] semantics: any service failure ends the
/// run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Record the failure and keep going with the remaining items.
    #[default]
    Continue,

    /// Propagate the first failure to the caller.
    Abort,
}

impl ErrorPolicy {
    /// Whether a failure under this policy stops the stage.
    pub fn aborts(&self) -> bool {
        matches!(self, ErrorPolicy::Abort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_policy_default_continues() {
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::Continue);
        assert!(!ErrorPolicy::Continue.aborts());
        assert!(ErrorPolicy::Abort.aborts());
    }
}
