use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::config::ScraperConfig;
use crate::error::AppError;
use crate::models::scrape_run::ScrapeRun;
use crate::models::source::{Source, SourceConfig};
use crate::scraper::SourceStats;
use crate::scraper::run::{RunHooks, run_jobs_scraper};
use crate::scraper::services::ScraperServices;

/// Hooks for queue-managed runs: cancellation comes from the run row's
/// cancel_requested flag, and a progress snapshot is written back into the
/// summary column after each source so `runs` can show a live picture.
struct DbRunHooks {
    pool: PgPool,
    run_id: i32,
    completed: tokio::sync::Mutex<Vec<SourceStats>>,
}

#[async_trait]
impl RunHooks for DbRunHooks {
    async fn should_cancel(&self) -> Result<bool, AppError> {
        ScrapeRun::cancel_requested(&self.pool, self.run_id).await
    }

    async fn source_started(&self, source: &SourceConfig) -> Result<(), AppError> {
        tracing::info!("Run {}: scraping source '{}'", self.run_id, source.name);
        Ok(())
    }

    async fn source_completed(
        &self,
        _source: &SourceConfig,
        stats: &SourceStats,
    ) -> Result<(), AppError> {
        let progress = {
            let mut completed = self.completed.lock().await;
            completed.push(stats.clone());
            serde_json::json!({ "in_progress": true, "source_stats": &*completed })
        };
        ScrapeRun::record_progress(&self.pool, self.run_id, &progress).await
    }
}

/// Main worker loop: poll for pending scrape runs and process them one at a
/// time. Recovers stale runs on startup and exits gracefully on Ctrl-C.
pub async fn run(
    pool: PgPool,
    config: ScraperConfig,
    services: ScraperServices,
    poll_interval: u64,
) -> anyhow::Result<()> {
    let stale = ScrapeRun::recover_stale(&pool).await?;
    if stale > 0 {
        tracing::warn!("Recovered {stale} stale 'running' runs back to pending");
    }

    tracing::info!("Worker started, polling every {poll_interval}s");

    loop {
        tokio::select! {
            biased;

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received, exiting gracefully");
                break;
            }

            result = async {
                if let Some(run) = ScrapeRun::claim_next(&pool).await? {
                    tracing::info!("Claimed scrape run {}", run.id);
                    process_run(&pool, &config, &services, &run).await;
                }
                tokio::time::sleep(Duration::from_secs(poll_interval)).await;
                Ok::<(), anyhow::Error>(())
            } => {
                result?;
            }
        }
    }

    Ok(())
}

/// Drive one claimed run to a terminal state. Errors are recorded on the
/// run row; a failed run never takes down the worker loop.
async fn process_run(
    pool: &PgPool,
    config: &ScraperConfig,
    services: &ScraperServices,
    run: &ScrapeRun,
) {
    let sources = match Source::load_enabled_configs(pool).await {
        Ok(sources) => sources,
        Err(e) => {
            let message = format!("Failed to load sources: {e}");
            tracing::error!("Run {}: {message}", run.id);
            let _ = ScrapeRun::mark_failed(pool, run.id, &message).await;
            return;
        }
    };
    if sources.is_empty() {
        tracing::warn!("Run {}: no enabled sources", run.id);
        let _ = ScrapeRun::mark_failed(pool, run.id, "No enabled sources").await;
        return;
    }

    let hooks = DbRunHooks {
        pool: pool.clone(),
        run_id: run.id,
        completed: tokio::sync::Mutex::new(Vec::new()),
    };
    let lookback_override = run.lookback_days.map(i64::from);

    match run_jobs_scraper(pool, services, config, &sources, &hooks, lookback_override).await {
        Ok(report) => {
            let summary =
                serde_json::to_value(&report.summary).unwrap_or(serde_json::Value::Null);
            let found = report.summary.jobs_found as i32;
            let inserted = report.save.inserted as i32;
            let updated = report.save.updated as i32;
            if report.summary.cancelled {
                tracing::info!(
                    "Run {} cancelled after {} sources, {found} jobs kept",
                    run.id,
                    report.summary.sources_processed
                );
                let _ =
                    ScrapeRun::mark_cancelled(pool, run.id, found, inserted, updated, &summary)
                        .await;
            } else {
                tracing::info!(
                    "Run {} completed: {found} jobs found, {inserted} new, {updated} updated",
                    run.id
                );
                let _ =
                    ScrapeRun::mark_succeeded(pool, run.id, found, inserted, updated, &summary)
                        .await;
            }
        }
        Err(e) => {
            let error = e.to_string();
            tracing::error!("Run {} failed: {error}", run.id);
            let _ = ScrapeRun::mark_failed(pool, run.id, &error).await;
        }
    }
}
