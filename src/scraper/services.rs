use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::config::ScraperConfig;
use crate::error::AppError;
use crate::scraper::fetch::{HttpFetcher, PageFetcher};
use crate::scraper::text::truncate_chars;

/// Local mirror for notification PDFs, keyed by URL.
#[async_trait]
pub trait PdfAssetCache: Send + Sync {
    /// Download and store the PDF at `url`, returning the local path. A
    /// failure is logged and reported as `None`; a missing mirror copy
    /// never fails a scrape.
    async fn cache_pdf(&self, url: &str) -> Option<String>;
}

/// Plain-text extraction for linked documents.
#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    /// Fetch the document at `url` and return its text, or `None` when the
    /// download or the extraction fails.
    async fn extract_text(&self, url: &str) -> Option<String>;
}

/// Filesystem-backed [`PdfAssetCache`]. Files are named by the SHA-256 of
/// their URL so re-caching the same notification is idempotent.
pub struct FsPdfCache {
    fetcher: Arc<dyn PageFetcher>,
    dir: PathBuf,
    timeout_ms: u64,
}

impl FsPdfCache {
    pub fn new(fetcher: Arc<dyn PageFetcher>, dir: PathBuf, timeout_ms: u64) -> Self {
        FsPdfCache {
            fetcher,
            dir,
            timeout_ms,
        }
    }

    async fn cache_inner(&self, url: &str) -> Result<String, AppError> {
        let bytes = self.fetcher.fetch_bytes(url, self.timeout_ms).await?;
        if !bytes.starts_with(b"%PDF") {
            return Err(AppError::Parse(format!("response from {url} is not a PDF")));
        }
        let digest = Sha256::digest(url.as_bytes());
        let path = self.dir.join(format!("{}.pdf", hex::encode(digest)));
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(format!("failed to create {}: {e}", self.dir.display()))
        })?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write {}: {e}", path.display())))?;
        Ok(path.to_string_lossy().into_owned())
    }
}

#[async_trait]
impl PdfAssetCache for FsPdfCache {
    async fn cache_pdf(&self, url: &str) -> Option<String> {
        match self.cache_inner(url).await {
            Ok(path) => {
                tracing::debug!("Cached PDF {url} at {path}");
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Failed to cache PDF {url}: {e}");
                None
            }
        }
    }
}

/// [`DocumentTextExtractor`] backed by `pdf-extract`. The parse is CPU-bound
/// and runs on the blocking pool.
pub struct PdfTextExtractor {
    fetcher: Arc<dyn PageFetcher>,
    timeout_ms: u64,
    max_chars: usize,
}

impl PdfTextExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, timeout_ms: u64, max_chars: usize) -> Self {
        PdfTextExtractor {
            fetcher,
            timeout_ms,
            max_chars,
        }
    }

    async fn extract_inner(&self, url: &str) -> Result<String, AppError> {
        let bytes = self.fetcher.fetch_bytes(url, self.timeout_ms).await?;
        if !bytes.starts_with(b"%PDF") {
            return Err(AppError::Parse(format!("response from {url} is not a PDF")));
        }
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::Internal(format!("PDF extraction task failed: {e}")))?
            .map_err(|e| AppError::Parse(format!("failed to extract text from {url}: {e}")))?;
        Ok(truncate_chars(text.trim(), self.max_chars))
    }
}

#[async_trait]
impl DocumentTextExtractor for PdfTextExtractor {
    async fn extract_text(&self, url: &str) -> Option<String> {
        match self.extract_inner(url).await {
            Ok(text) if text.is_empty() => {
                tracing::warn!("PDF at {url} produced no text");
                None
            }
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Failed to extract PDF text from {url}: {e}");
                None
            }
        }
    }
}

/// The pipeline's outward-facing collaborators, bundled so the scrape and
/// worker entry points take one handle.
#[derive(Clone)]
pub struct ScraperServices {
    pub fetcher: Arc<dyn PageFetcher>,
    pub pdf_cache: Arc<dyn PdfAssetCache>,
    pub text_extractor: Arc<dyn DocumentTextExtractor>,
}

impl ScraperServices {
    pub fn production(config: &ScraperConfig, pdf_cache_dir: PathBuf) -> Result<Self, AppError> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new()?);
        let pdf_cache = Arc::new(FsPdfCache::new(
            fetcher.clone(),
            pdf_cache_dir,
            config.timeout_ms,
        ));
        let text_extractor = Arc::new(PdfTextExtractor::new(
            fetcher.clone(),
            config.timeout_ms,
            config.max_pdf_text_chars,
        ));
        Ok(ScraperServices {
            fetcher,
            pdf_cache,
            text_extractor,
        })
    }
}
