//! Configuration for the link crawler.
//!
//! A [`CrawlerConfig`] names the seed page to fetch and the domain substring
//! used to filter the extracted links. TLS certificates are always verified;
//! there is deliberately no switch to turn verification off.

use std::time::Duration;

use crate::error::ErrorPolicy;

/// Configuration for a single link-crawl run
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// URL of the page to extract links from
    pub seed_url: String,

    /// Substring a link must contain to be kept (case-sensitive)
    pub domain_filter: String,

    /// User agent to use for requests
    pub user_agent: String,

    /// Request timeout
    pub timeout: Duration,

    /// What to do when the seed fetch fails
    pub error_policy: ErrorPolicy,
}

impl CrawlerConfig {
    /// Create a new builder seeded with the required fields
    pub fn builder(
        seed_url: impl Into<String>,
        domain_filter: impl Into<String>,
    ) -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new(seed_url, domain_filter)
    }
}

/// Builder for [`CrawlerConfig`]
#[derive(Debug)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with defaults for the optional fields
    pub fn new(seed_url: impl Into<String>, domain_filter: impl Into<String>) -> Self {
        Self {
            config: CrawlerConfig {
                seed_url: seed_url.into(),
                domain_filter: domain_filter.into(),
                user_agent: format!("prospectus-crawler/{}", env!("CARGO_PKG_VERSION")),
                timeout: Duration::from_secs(30),
                error_policy: ErrorPolicy::Continue,
            },
        }
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the failure policy for the seed fetch
    pub fn error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.config.error_policy = error_policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}
