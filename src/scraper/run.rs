use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::config::ScraperConfig;
use crate::error::AppError;
use crate::models::job::Job;
use crate::models::source::SourceConfig;
use crate::scraper::services::ScraperServices;
use crate::scraper::source::scrape_source;
use crate::scraper::{RunReport, RunSummary, ScrapeOutcome, SourceStats};

/// Caller-provided control surface for a run: cooperative cancellation plus
/// per-source lifecycle notifications. Hook errors are not swallowed; they
/// abort the run and propagate.
#[async_trait]
pub trait RunHooks: Send + Sync {
    async fn should_cancel(&self) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn source_started(&self, _source: &SourceConfig) -> Result<(), AppError> {
        Ok(())
    }

    async fn source_completed(
        &self,
        _source: &SourceConfig,
        _stats: &SourceStats,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

/// Hooks for unmanaged runs.
pub struct NoopHooks;

#[async_trait]
impl RunHooks for NoopHooks {}

/// Ctrl-C flag for one-shot CLI runs: the first signal requests cooperative
/// cancellation and the current source is allowed to finish.
pub struct SignalHooks {
    cancelled: Arc<AtomicBool>,
}

impl SignalHooks {
    pub fn install() -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received, cancelling after current source");
                flag.store(true, Ordering::SeqCst);
            }
        });
        SignalHooks { cancelled }
    }
}

#[async_trait]
impl RunHooks for SignalHooks {
    async fn should_cancel(&self) -> Result<bool, AppError> {
        Ok(self.cancelled.load(Ordering::SeqCst))
    }
}

/// Scrape all `sources` sequentially, in input order. Cancellation is
/// polled before and after each source. A job whose canonical URL repeats
/// anywhere in the run, same source or not, is dropped and counted rather
/// than re-added.
pub async fn scrape_jobs(
    services: &ScraperServices,
    config: &ScraperConfig,
    sources: &[SourceConfig],
    hooks: &dyn RunHooks,
    lookback_override: Option<i64>,
) -> Result<ScrapeOutcome, AppError> {
    let lookback_days = lookback_override.unwrap_or(config.lookback_days);
    let now = Utc::now();
    let mut summary = RunSummary {
        total_sources: sources.len() as u32,
        lookback_days,
        ..RunSummary::default()
    };
    let mut jobs = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut pdf_url_cache: HashMap<String, Option<String>> = HashMap::new();

    for source in sources {
        if hooks.should_cancel().await? {
            summary.cancelled = true;
            break;
        }
        hooks.source_started(source).await?;
        tracing::info!("Scraping source '{}' ({})", source.name, source.url);

        let (source_jobs, stats) = scrape_source(
            services,
            config,
            source,
            lookback_days,
            now,
            &mut pdf_url_cache,
        )
        .await;

        for job in source_jobs {
            if seen_urls.insert(job.source_url.clone()) {
                jobs.push(job);
            } else {
                summary.cross_source_duplicates += 1;
            }
        }

        hooks.source_completed(source, &stats).await?;
        summary.absorb(stats);

        if hooks.should_cancel().await? {
            summary.cancelled = true;
            break;
        }
    }

    summary.jobs_found = jobs.len() as u32;
    Ok(ScrapeOutcome { jobs, summary })
}

/// Scrape then persist. Persistence errors propagate to the caller; one
/// consolidated record combines scrape and save counts.
pub async fn run_jobs_scraper(
    pool: &PgPool,
    services: &ScraperServices,
    config: &ScraperConfig,
    sources: &[SourceConfig],
    hooks: &dyn RunHooks,
    lookback_override: Option<i64>,
) -> Result<RunReport, AppError> {
    let outcome = scrape_jobs(services, config, sources, hooks, lookback_override).await?;
    let save = Job::save_scraped(pool, &outcome.jobs).await?;
    tracing::info!(
        "Scrape run finished: {} sources, {} jobs found, {} inserted, {} updated, {} within-batch duplicates, cancelled={}",
        outcome.summary.sources_processed,
        outcome.summary.jobs_found,
        save.inserted,
        save.updated,
        save.skipped_duplicates,
        outcome.summary.cancelled,
    );
    Ok(RunReport {
        summary: outcome.summary,
        save,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use super::*;
    use crate::models::source::{LocationScope, SourceSelectors};
    use crate::scraper::testing::{MapFetcher, StubPdfCache, StubTextExtractor, services_with};

    fn selectors() -> SourceSelectors {
        SourceSelectors {
            job_container: ".job".to_string(),
            title: ".title".to_string(),
            link: "a".to_string(),
            ..SourceSelectors::default()
        }
    }

    fn source(name: &str, url: &str) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            url: url.to_string(),
            location_scope: LocationScope::AllLocations,
            selectors: selectors(),
        }
    }

    fn listing(href: &str) -> String {
        format!(
            r#"<html><body><div class="job">
                <h3 class="title">Clerk Recruitment</h3>
                <a href="{href}">View</a>
            </div></body></html>"#
        )
    }

    fn empty_services() -> ScraperServices {
        services_with(
            Arc::new(MapFetcher::default()),
            Arc::new(StubPdfCache::default()),
            Arc::new(StubTextExtractor::default()),
        )
    }

    struct CancelAfter {
        after: u32,
        completed: AtomicU32,
    }

    #[async_trait]
    impl RunHooks for CancelAfter {
        async fn should_cancel(&self) -> Result<bool, AppError> {
            Ok(self.completed.load(Ordering::SeqCst) >= self.after)
        }

        async fn source_completed(
            &self,
            _source: &SourceConfig,
            _stats: &SourceStats,
        ) -> Result<(), AppError> {
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingHooks;

    #[async_trait]
    impl RunHooks for FailingHooks {
        async fn source_started(&self, _source: &SourceConfig) -> Result<(), AppError> {
            Err(AppError::Internal("progress sink unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn cancellation_after_first_source_stops_the_run() {
        let sources = vec![
            source("One", "https://one.example.org/jobs"),
            source("Two", "https://two.example.org/jobs"),
            source("Three", "https://three.example.org/jobs"),
        ];
        let hooks = CancelAfter {
            after: 1,
            completed: AtomicU32::new(0),
        };

        let outcome = scrape_jobs(
            &empty_services(),
            &ScraperConfig::default(),
            &sources,
            &hooks,
            None,
        )
        .await
        .unwrap();

        assert!(outcome.summary.cancelled);
        assert_eq!(outcome.summary.sources_processed, 1);
        assert_eq!(outcome.summary.total_sources, 3);
        assert_eq!(outcome.summary.source_stats.len(), 1);
    }

    #[tokio::test]
    async fn repeated_canonical_urls_collapse_across_sources() {
        let fetcher = MapFetcher::default()
            .with_html(
                "https://one.example.org/jobs",
                &listing("https://example.org/jobs/clerk?ref=one"),
            )
            .with_html(
                "https://two.example.org/jobs",
                &listing("https://example.org/jobs/clerk?ref=two"),
            );
        let services = services_with(
            Arc::new(fetcher),
            Arc::new(StubPdfCache::default()),
            Arc::new(StubTextExtractor::default()),
        );
        let sources = vec![
            source("One", "https://one.example.org/jobs"),
            source("Two", "https://two.example.org/jobs"),
        ];

        let outcome = scrape_jobs(
            &services,
            &ScraperConfig::default(),
            &sources,
            &NoopHooks,
            None,
        )
        .await
        .unwrap();

        assert_eq!(outcome.jobs.len(), 1);
        assert_eq!(outcome.jobs[0].source_url, "https://example.org/jobs/clerk");
        assert_eq!(outcome.summary.cross_source_duplicates, 1);
        assert_eq!(outcome.summary.jobs_found, 1);
        assert_eq!(outcome.summary.sources_processed, 2);
    }

    #[tokio::test]
    async fn hook_errors_propagate() {
        let sources = vec![source("One", "https://one.example.org/jobs")];
        let result = scrape_jobs(
            &empty_services(),
            &ScraperConfig::default(),
            &sources,
            &FailingHooks,
            None,
        )
        .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
