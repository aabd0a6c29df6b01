//! Persistence for crawled link lists

use std::path::Path;

use tokio::fs;
use tracing::{info, instrument};

use crate::crawler::error::CrawlError;

/// Write a link list to a file as a pretty-printed JSON array.
///
/// The file is written UTF-8 encoded with 2-space indentation. Existing
/// content is overwritten, not merged.
#[instrument(skip(links))]
pub async fn write_link_file(links: &[String], path: &Path) -> Result<(), CrawlError> {
    let json = serde_json::to_string_pretty(links)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, json).await?;

    info!("Saved {} URLs to {}", links.len(), path.display());
    Ok(())
}
