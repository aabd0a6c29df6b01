//! Page acquisition for the scrape module.
//!
//! Each URL goes through a bounded reachability check before rendering, and
//! rendering itself is a single-page crawl driven by spider. With the
//! `chrome` cargo feature enabled spider executes client-side scripts in a
//! headless browser before handing back the final HTML; without it the
//! server-rendered HTML is used.

use spider::tokio;
use spider::website::Website;
use tracing::{debug, info, instrument};

use crate::scrape::ScrapeConfig;
use crate::scrape::error::ScrapeError;

/// A page captured by the renderer
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL of the page
    pub url: String,

    /// Final HTML of the page
    pub html: String,
}

/// Validate that a URL responds with a success status.
///
/// Attempts are bounded by the configured retry count; the backoff doubles
/// between attempts. A request that exceeds the configured timeout on every
/// attempt surfaces as [`ScrapeError::Timeout`].
#[instrument(skip(client, config))]
pub async fn check_reachable(
    client: &reqwest::Client,
    url: &str,
    config: &ScrapeConfig,
) -> Result<(), ScrapeError> {
    let mut backoff = config.retry_backoff;
    let mut last_error = None;
    let mut timed_out = false;

    for attempt in 0..config.retry_attempts.max(1) {
        if attempt > 0 {
            debug!("Retrying {} (attempt {})", url, attempt + 1);
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }

        match client.get(url).send().await {
            Ok(response) => match response.error_for_status() {
                Ok(_) => return Ok(()),
                Err(e) => last_error = Some(ScrapeError::Http(e)),
            },
            Err(e) if e.is_timeout() => timed_out = true,
            Err(e) => last_error = Some(ScrapeError::Http(e)),
        }
    }

    if timed_out {
        return Err(ScrapeError::Timeout {
            url: url.to_string(),
            attempts: config.retry_attempts.max(1),
        });
    }
    Err(last_error.unwrap_or_else(|| ScrapeError::Render(format!("unreachable: {}", url))))
}

/// Render a single page and return its final HTML.
#[instrument(skip(config))]
pub async fn render_page(url: &str, config: &ScrapeConfig) -> Result<RenderedPage, ScrapeError> {
    info!("Rendering {}", url);

    let mut website = Website::new(url);
    website
        .configuration
        .with_respect_robots_txt(config.respect_robots_txt)
        .with_user_agent(Some(&config.user_agent))
        .with_depth(0)
        .with_limit(1);

    let mut rx = website
        .subscribe(1)
        .ok_or_else(|| ScrapeError::Render("failed to subscribe to page events".to_string()))?;

    let handle = tokio::spawn(async move {
        let mut captured: Option<RenderedPage> = None;
        while let Ok(page) = rx.recv().await {
            debug!("Received page: {}", page.get_url());
            captured = Some(RenderedPage {
                url: page.get_url().to_string(),
                html: page.get_html(),
            });
        }
        captured
    });

    website.crawl().await;
    website.unsubscribe();

    let page = handle
        .await
        .map_err(|e| ScrapeError::Render(format!("render task failed: {}", e)))?;

    page.ok_or_else(|| ScrapeError::Render(format!("no content captured for {}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    fn quick_config() -> ScrapeConfig {
        ScrapeConfig::builder()
            .timeout(Duration::from_secs(2))
            .retry_attempts(2)
            .retry_backoff(Duration::from_millis(10))
            .build()
    }

    #[tokio::test]
    async fn test_check_reachable_succeeds_on_ok_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/page")
            .with_status(200)
            .create_async()
            .await;

        let config = quick_config();
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap();

        let url = format!("{}/page", server.url());
        assert!(check_reachable(&client, &url, &config).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_reachable_reports_http_error_after_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/gone")
            .with_status(404)
            .expect(2)
            .create_async()
            .await;

        let config = quick_config();
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap();

        let url = format!("{}/gone", server.url());
        let err = check_reachable(&client, &url, &config).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Http(_)));
        mock.assert_async().await;
    }
}
