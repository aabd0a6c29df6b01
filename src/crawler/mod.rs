//! Link crawler module
//!
//! This module fetches a seed page, extracts every hyperlink on it,
//! resolves the links to absolute URLs, and filters them to a target
//! domain. The resulting link list can be persisted as a JSON file for
//! the scraping stage.

mod config;
mod error;
mod links;
mod storage;

pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use error::CrawlError;
pub use links::{fetch_links, filter_domain_links, resolve_links};
pub use storage::write_link_file;
