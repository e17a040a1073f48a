use std::time::Duration;

use async_trait::async_trait;

use crate::config::ScraperConfig;
use crate::error::AppError;

/// Browser-like UA; several of the target sites serve an empty shell or a
/// block page to obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Base for the linear retry backoff: 250ms, 500ms, ...
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Outbound HTTP seam. Everything the pipeline fetches goes through this
/// trait so tests can substitute canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str, timeout_ms: u64) -> Result<String, AppError>;
    async fn fetch_bytes(&self, url: &str, timeout_ms: u64) -> Result<Vec<u8>, AppError>;
}

/// Production fetcher: reqwest with an explicit timeout around the whole
/// request including body read. Non-2xx statuses are fetch errors.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(HttpFetcher { client })
    }

    async fn checked_response(&self, url: &str) -> Result<reqwest::Response, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("request failed for {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(AppError::Fetch(format!(
                "HTTP status {} for {url}",
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str, timeout_ms: u64) -> Result<String, AppError> {
        tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            self.checked_response(url)
                .await?
                .text()
                .await
                .map_err(|e| AppError::Fetch(format!("failed to read body from {url}: {e}")))
        })
        .await
        .map_err(|_| AppError::Fetch(format!("request timed out after {timeout_ms}ms for {url}")))?
    }

    async fn fetch_bytes(&self, url: &str, timeout_ms: u64) -> Result<Vec<u8>, AppError> {
        tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            let bytes = self
                .checked_response(url)
                .await?
                .bytes()
                .await
                .map_err(|e| AppError::Fetch(format!("failed to read body from {url}: {e}")))?;
            Ok(bytes.to_vec())
        })
        .await
        .map_err(|_| AppError::Fetch(format!("request timed out after {timeout_ms}ms for {url}")))?
    }
}

/// Fetch a page with bounded retries. Only transient failures (timeouts,
/// aborted or reset connections) are retried; a bad HTTP status is terminal
/// on the first hit. Backoff is linear in the attempt number.
pub async fn fetch_with_retries(
    fetcher: &dyn PageFetcher,
    url: &str,
    config: &ScraperConfig,
) -> Result<String, AppError> {
    let attempts = config.retry_attempts.max(1);
    let mut attempt = 1;
    loop {
        match fetcher.fetch_html(url, config.timeout_ms).await {
            Ok(html) => return Ok(html),
            Err(e) if attempt < attempts && e.is_transient_fetch() => {
                tracing::warn!("Fetch attempt {attempt}/{attempts} failed for {url}, retrying: {e}");
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct FlakyFetcher {
        failures_before_success: u32,
        error_message: String,
        attempts: AtomicU32,
    }

    impl FlakyFetcher {
        fn new(failures_before_success: u32, error_message: &str) -> Self {
            FlakyFetcher {
                failures_before_success,
                error_message: error_message.to_string(),
                attempts: AtomicU32::new(0),
            }
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for FlakyFetcher {
        async fn fetch_html(&self, _url: &str, _timeout_ms: u64) -> Result<String, AppError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.failures_before_success {
                Err(AppError::Fetch(self.error_message.clone()))
            } else {
                Ok("<html>ok</html>".to_string())
            }
        }

        async fn fetch_bytes(&self, url: &str, timeout_ms: u64) -> Result<Vec<u8>, AppError> {
            self.fetch_html(url, timeout_ms).await.map(String::into_bytes)
        }
    }

    fn config_with_attempts(retry_attempts: u32) -> ScraperConfig {
        ScraperConfig {
            retry_attempts,
            ..ScraperConfig::default()
        }
    }

    #[tokio::test]
    async fn transient_failure_is_retried_until_success() {
        let fetcher = FlakyFetcher::new(1, "connection reset by peer");
        let html = fetch_with_retries(&fetcher, "https://example.gov.in", &config_with_attempts(2))
            .await
            .unwrap();
        assert_eq!(html, "<html>ok</html>");
        assert_eq!(fetcher.attempts(), 2);
    }

    #[tokio::test]
    async fn bad_status_is_not_retried() {
        let fetcher = FlakyFetcher::new(5, "HTTP status 500 Internal Server Error for https://x");
        let result =
            fetch_with_retries(&fetcher, "https://example.gov.in", &config_with_attempts(3)).await;
        assert!(result.is_err());
        assert_eq!(fetcher.attempts(), 1);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let fetcher = FlakyFetcher::new(5, "request timed out after 20000ms");
        let result =
            fetch_with_retries(&fetcher, "https://example.gov.in", &config_with_attempts(2)).await;
        assert!(result.is_err());
        assert_eq!(fetcher.attempts(), 2);
    }
}
