//! Configuration for the page-to-document converter.
//!
//! The converter validates each URL with a plain HTTP fetch before handing
//! it to the renderer. Readiness is bounded by an explicit timeout and a
//! retry/backoff loop rather than a fixed sleep, so a stuck page surfaces
//! as a distinguishable timeout error instead of blocking the run.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ErrorPolicy;

/// Configuration for a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Directory the document files are written into (created on demand)
    pub output_dir: PathBuf,

    /// User agent to use for requests
    pub user_agent: String,

    /// Per-request timeout for the reachability check
    pub timeout: Duration,

    /// Number of reachability attempts before giving up on a URL
    pub retry_attempts: u32,

    /// Initial backoff between attempts, doubled each retry
    pub retry_backoff: Duration,

    /// Whether the renderer respects robots.txt
    pub respect_robots_txt: bool,

    /// Lines containing any of these keywords are dropped from the
    /// extracted text (matched case-insensitively)
    pub blocklist: Vec<String>,

    /// What to do when a single URL fails
    pub error_policy: ErrorPolicy,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("documents"),
            user_agent: format!("prospectus-scraper/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(10),
            retry_attempts: 3,
            retry_backoff: Duration::from_millis(500),
            respect_robots_txt: true,
            blocklist: vec!["advertisement".to_string()],
            error_policy: ErrorPolicy::Continue,
        }
    }
}

/// Builder for [`ScrapeConfig`]
#[derive(Debug, Default)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ScrapeConfig::default(),
        }
    }

    /// Set the output directory for document files
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of reachability attempts
    pub fn retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.config.retry_attempts = retry_attempts;
        self
    }

    /// Set the initial retry backoff
    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.config.retry_backoff = retry_backoff;
        self
    }

    /// Set whether the renderer respects robots.txt
    pub fn respect_robots_txt(mut self, respect_robots_txt: bool) -> Self {
        self.config.respect_robots_txt = respect_robots_txt;
        self
    }

    /// Set the line blocklist keywords
    pub fn blocklist(mut self, blocklist: Vec<String>) -> Self {
        self.config.blocklist = blocklist;
        self
    }

    /// Set the per-URL failure policy
    pub fn error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.config.error_policy = error_policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ScrapeConfig {
        self.config
    }
}

impl ScrapeConfig {
    /// Create a new builder
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScrapeConfig::default();

        assert_eq!(config.output_dir, PathBuf::from("documents"));
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.blocklist, vec!["advertisement".to_string()]);
        assert_eq!(config.error_policy, ErrorPolicy::Continue);
    }

    #[test]
    fn test_builder() {
        let config = ScrapeConfig::builder()
            .output_dir("/tmp/docs")
            .timeout(Duration::from_secs(3))
            .retry_attempts(1)
            .blocklist(vec!["sponsored".to_string()])
            .error_policy(ErrorPolicy::Abort)
            .build();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.blocklist, vec!["sponsored".to_string()]);
        assert_eq!(config.error_policy, ErrorPolicy::Abort);
    }
}
