//! Page scraping: turn a list of URLs into document files.
//!
//! Each URL is checked for reachability, rendered, reduced to its visible
//! text, and written to the output directory as a DOCX file named after the
//! site and the scrape time. Failures are recorded per URL; whether a
//! failure stops the run depends on the configured error policy.

mod config;
mod docx;
mod error;
mod extract;
mod render;

pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use docx::{docx_bytes, document_filename, write_document};
pub use error::ScrapeError;
pub use extract::{extract_text, filter_lines};
pub use render::{RenderedPage, check_reachable, render_page};

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, instrument, warn};
use url::Url;

/// Result of scraping a single URL
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// The URL that was scraped
    pub url: String,

    /// Where the document was written, when scraping succeeded
    pub path: Option<PathBuf>,

    /// The failure message, when scraping failed
    pub error: Option<String>,
}

/// Summary of a scrape run
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Per-URL outcomes in input order
    pub outcomes: Vec<ScrapeOutcome>,
}

impl ScrapeReport {
    /// Number of URLs that produced a document
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.path.is_some()).count()
    }

    /// Number of URLs that failed
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Scrape a list of URLs into document files.
///
/// URLs are processed in order. With [`ErrorPolicy::Continue`] a failing URL
/// is recorded in the report and the run moves on; with
/// [`ErrorPolicy::Abort`] the first failure ends the run.
///
/// [`ErrorPolicy::Continue`]: crate::ErrorPolicy::Continue
/// [`ErrorPolicy::Abort`]: crate::ErrorPolicy::Abort
#[instrument(skip(urls, config), fields(url_count = urls.len()))]
pub async fn scrape_urls(urls: &[String], config: &ScrapeConfig) -> Result<ScrapeReport, ScrapeError> {
    tokio::fs::create_dir_all(&config.output_dir).await?;

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .build()?;

    let mut report = ScrapeReport::default();
    for url in urls {
        match scrape_one(&client, url, config).await {
            Ok(path) => {
                info!("Scraped {} -> {}", url, path.display());
                report.outcomes.push(ScrapeOutcome {
                    url: url.clone(),
                    path: Some(path),
                    error: None,
                });
            }
            Err(e) if config.error_policy.aborts() => return Err(e),
            Err(e) => {
                warn!("Failed to scrape {}: {}", url, e);
                report.outcomes.push(ScrapeOutcome {
                    url: url.clone(),
                    path: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(report)
}

async fn scrape_one(
    client: &reqwest::Client,
    url: &str,
    config: &ScrapeConfig,
) -> Result<PathBuf, ScrapeError> {
    check_reachable(client, url, config).await?;

    let page = render_page(url, config).await?;
    let text = extract_text(&page.html)?;
    let text = filter_lines(&text, &config.blocklist);

    let parsed = Url::parse(url)?;
    let filename = document_filename(&parsed, Local::now());
    let path = unique_path(&config.output_dir, &filename);
    write_document(&text, &path).await?;
    Ok(path)
}

/// Pick a path in the output directory that does not collide with an
/// existing file, suffixing the stem with a counter when needed.
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let extension = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("docx");

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{}_{}.{}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_path_returns_original_when_free() {
        let dir = tempfile::tempdir().unwrap();
        let path = unique_path(dir.path(), "site_20240101_120000.docx");
        assert_eq!(path, dir.path().join("site_20240101_120000.docx"));
    }

    #[test]
    fn test_unique_path_suffixes_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site_20240101_120000.docx"), b"taken").unwrap();

        let path = unique_path(dir.path(), "site_20240101_120000.docx");
        assert_eq!(path, dir.path().join("site_20240101_120000_1.docx"));
    }

    #[test]
    fn test_report_counts() {
        let report = ScrapeReport {
            outcomes: vec![
                ScrapeOutcome {
                    url: "https://a.example".to_string(),
                    path: Some(PathBuf::from("a.docx")),
                    error: None,
                },
                ScrapeOutcome {
                    url: "https://b.example".to_string(),
                    path: None,
                    error: Some("timeout".to_string()),
                },
            ],
        };

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
    }
}
