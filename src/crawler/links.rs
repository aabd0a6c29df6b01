//! Link extraction and filtering for the crawler module

use std::collections::BTreeSet;

use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::crawler::CrawlerConfig;
use crate::crawler::error::CrawlError;
use crate::error::ErrorPolicy;

/// Fetch the seed page and return its filtered link list.
///
/// Links are resolved against the page URL, deduplicated, sorted
/// lexicographically, and filtered to those containing the configured
/// domain substring.
///
/// Under [`ErrorPolicy::Continue`] a fetch failure is logged and an empty
/// list is returned; under [`ErrorPolicy::Abort`] the error propagates.
#[instrument(skip(config), fields(url = %config.seed_url))]
pub async fn fetch_links(config: &CrawlerConfig) -> Result<Vec<String>, CrawlError> {
    match fetch_links_inner(config).await {
        Ok(links) => {
            info!("Found {} links on {}", links.len(), config.seed_url);
            Ok(links)
        }
        Err(e) if config.error_policy.aborts() => Err(e),
        Err(e) => {
            warn!("Error fetching {}: {}", config.seed_url, e);
            Ok(Vec::new())
        }
    }
}

async fn fetch_links_inner(config: &CrawlerConfig) -> Result<Vec<String>, CrawlError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .build()?;

    let response = client
        .get(&config.seed_url)
        .send()
        .await?
        .error_for_status()?;

    let base = Url::parse(&config.seed_url)?;
    let body = response.text().await?;

    let hrefs = extract_hrefs(&body)?;
    debug!("Extracted {} raw hrefs", hrefs.len());

    let resolved = resolve_links(&base, &hrefs);
    Ok(filter_domain_links(resolved, &config.domain_filter))
}

/// Extract the raw `href` values of all anchor elements in a document
fn extract_hrefs(html: &str) -> Result<Vec<String>, CrawlError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]")
        .map_err(|e| CrawlError::HtmlParse(format!("Failed to parse anchor selector: {}", e)))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(String::from)
        .collect())
}

/// Resolve raw hrefs against a base URL into a sorted, deduplicated list
/// of absolute URLs. Hrefs that do not form a valid URL are dropped.
pub fn resolve_links(base: &Url, hrefs: &[String]) -> Vec<String> {
    let links: BTreeSet<String> = hrefs
        .iter()
        .filter_map(|href| base.join(href).ok())
        .map(|url| url.to_string())
        .collect();

    links.into_iter().collect()
}

/// Keep only links that contain the domain substring.
///
/// This is a plain case-sensitive substring test, not a host comparison.
pub fn filter_domain_links(links: Vec<String>, domain: &str) -> Vec<String> {
    links.into_iter().filter(|link| link.contains(domain)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <a href="/dept/cse">CSE</a>
            <a href="https://example.edu/admissions">Admissions</a>
            <a href="/dept/cse">CSE again</a>
            <a href="https://other.org/news">External</a>
            <a href="mailto:info@example.edu">Mail</a>
            <a>No href</a>
        </body></html>
    "#;

    #[test]
    fn test_extract_and_resolve_deduplicates() {
        let base = Url::parse("https://example.edu/faculty/fsit").unwrap();
        let hrefs = extract_hrefs(PAGE).unwrap();
        let links = resolve_links(&base, &hrefs);

        // the duplicate /dept/cse collapses to one entry
        assert_eq!(
            links
                .iter()
                .filter(|l| l.as_str() == "https://example.edu/dept/cse")
                .count(),
            1
        );

        // resolved output is sorted lexicographically
        let mut sorted = links.clone();
        sorted.sort();
        assert_eq!(links, sorted);
    }

    #[test]
    fn test_relative_hrefs_resolve_against_page_url() {
        let base = Url::parse("https://example.edu/faculty/fsit").unwrap();
        let hrefs = vec!["../about".to_string(), "staff".to_string()];
        let links = resolve_links(&base, &hrefs);

        assert!(links.contains(&"https://example.edu/about".to_string()));
        assert!(links.contains(&"https://example.edu/faculty/staff".to_string()));
    }

    #[test]
    fn test_domain_filter_is_substring_match() {
        let links = vec![
            "https://example.edu/dept/cse".to_string(),
            "https://other.org/news".to_string(),
            "https://cdn.example.edu/logo.png".to_string(),
        ];

        let filtered = filter_domain_links(links, "example.edu");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|l| l.contains("example.edu")));
    }

    #[test]
    fn test_domain_filter_is_case_sensitive() {
        let links = vec!["https://Example.EDU/dept/cse".to_string()];
        assert!(filter_domain_links(links, "example.edu").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_links_filters_to_domain() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/faculty/fsit")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;

        let seed = format!("{}/faculty/fsit", server.url());
        let config = CrawlerConfig::builder(seed, "example.edu").build();
        let links = fetch_links(&config).await.unwrap();

        assert_eq!(
            links,
            vec!["https://example.edu/admissions", "https://example.edu/dept/cse"]
        );
    }

    #[tokio::test]
    async fn test_fetch_links_continue_policy_returns_empty_on_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let seed = format!("{}/broken", server.url());
        let config = CrawlerConfig::builder(seed, "example.edu").build();

        let links = fetch_links(&config).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_links_abort_policy_propagates_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let seed = format!("{}/broken", server.url());
        let config = CrawlerConfig::builder(seed, "example.edu")
            .error_policy(ErrorPolicy::Abort)
            .build();

        assert!(fetch_links(&config).await.is_err());
    }
}
