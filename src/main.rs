mod config;
mod db;
mod error;
mod models;
mod scraper;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config, ScraperConfig};
use crate::models::scrape_run::ScrapeRun;
use crate::models::source::Source;
use crate::scraper::run::{SignalHooks, run_jobs_scraper};
use crate::scraper::services::ScraperServices;
use crate::scraper::worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobradar=info")),
        )
        .init();

    let config = Config::parse();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations complete");
    }

    match config.command {
        Command::Scrape { source, scraper } => {
            let scraper_config = ScraperConfig::resolve(&scraper);
            let services = ScraperServices::production(&scraper_config, scraper.pdf_cache_dir)?;
            let sources = match source {
                Some(name) => vec![Source::get_by_name(&pool, &name).await?.into_config()?],
                None => Source::load_enabled_configs(&pool).await?,
            };
            if sources.is_empty() {
                anyhow::bail!("No enabled sources configured; add rows to the sources table");
            }

            let hooks = SignalHooks::install();
            let report =
                run_jobs_scraper(&pool, &services, &scraper_config, &sources, &hooks, None).await?;
            println!("{}", report.summary);
            println!(
                "Saved: {} new, {} updated, {} duplicates skipped",
                report.save.inserted, report.save.updated, report.save.skipped_duplicates
            );
        }
        Command::Worker {
            poll_interval,
            scraper,
        } => {
            let scraper_config = ScraperConfig::resolve(&scraper);
            let services = ScraperServices::production(&scraper_config, scraper.pdf_cache_dir)?;
            worker::run(pool, scraper_config, services, poll_interval).await?;
        }
        Command::Enqueue { lookback_days } => {
            let run = ScrapeRun::enqueue(&pool, lookback_days).await?;
            println!("Enqueued scrape run {}", run.id);
        }
        Command::Cancel { run } => {
            ScrapeRun::request_cancel(&pool, run).await?;
            println!("Cancellation requested for run {run}");
        }
        Command::Runs { limit } => {
            let runs = ScrapeRun::recent(&pool, limit).await?;
            if runs.is_empty() {
                println!("No scrape runs recorded");
            }
            for run in runs {
                let counts = match (run.jobs_found, run.jobs_inserted, run.jobs_updated) {
                    (Some(found), Some(inserted), Some(updated)) => {
                        format!("{found} found, {inserted} new, {updated} updated")
                    }
                    _ => "-".to_string(),
                };
                let flags = match (run.cancel_requested, run.error.as_deref()) {
                    (_, Some(error)) => format!("  error: {error}"),
                    (true, None) => "  cancel requested".to_string(),
                    (false, None) => String::new(),
                };
                println!(
                    "#{:<4} {:<10} requested {}  {counts}{flags}",
                    run.id,
                    run.status,
                    run.requested_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}
