use std::path::PathBuf;

use clap::Parser;

use crate::scraper::text::{DEFAULT_EXCLUDE_KEYWORDS, DEFAULT_INCLUDE_KEYWORDS, parse_keyword_list};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "jobradar",
    about = "Job listings scraper for Meghalaya government and job-board sources"
)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Run database migrations on startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "true")]
    pub run_migrations: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Run one scrape over the enabled sources and persist the results
    Scrape {
        /// Restrict the run to a single source by name
        #[arg(long)]
        source: Option<String>,

        #[command(flatten)]
        scraper: ScraperArgs,
    },
    /// Run the scrape-queue worker loop
    Worker {
        /// Poll interval in seconds
        #[arg(long, env = "POLL_INTERVAL", default_value = "10")]
        poll_interval: u64,

        #[command(flatten)]
        scraper: ScraperArgs,
    },
    /// Enqueue a pending scrape run for the worker
    Enqueue {
        /// Lookback window override for this run, in days
        #[arg(long)]
        lookback_days: Option<i64>,
    },
    /// Request cooperative cancellation of a pending or running scrape run
    Cancel {
        /// Run id to cancel
        #[arg(long)]
        run: i32,
    },
    /// Show recent scrape runs
    Runs {
        /// Maximum number of runs to list
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

/// Scraper tunables, each overridable through the environment and falling
/// back to the hardcoded defaults below.
#[derive(clap::Args, Debug, Clone)]
pub struct ScraperArgs {
    /// Timeout for each outbound fetch, in milliseconds
    #[arg(long, env = "FETCH_TIMEOUT_MS", default_value_t = 20_000)]
    pub fetch_timeout_ms: u64,

    /// Bounded attempt count for the listing-page fetch
    #[arg(long, env = "FETCH_RETRY_ATTEMPTS", default_value_t = 2)]
    pub fetch_retry_attempts: u32,

    /// Maximum containers processed per source
    #[arg(long, env = "MAX_ITEMS_PER_SOURCE", default_value_t = 40)]
    pub max_items_per_source: usize,

    /// Maximum PDF text extractions per source
    #[arg(long, env = "MAX_PDF_ENRICHMENTS_PER_SOURCE", default_value_t = 4)]
    pub max_pdf_enrichments_per_source: usize,

    /// Maximum characters kept from extracted PDF text
    #[arg(long, env = "MAX_PDF_TEXT_CHARS", default_value_t = 20_000)]
    pub max_pdf_text_chars: usize,

    /// Lookback window in days for accepting listings
    #[arg(long, env = "LOOKBACK_DAYS", default_value_t = 30)]
    pub lookback_days: i64,

    /// Comma-separated include keywords; replaces the built-in list entirely
    #[arg(long, env = "INCLUDE_KEYWORDS")]
    pub include_keywords: Option<String>,

    /// Comma-separated exclude keywords; replaces the built-in list entirely
    #[arg(long, env = "EXCLUDE_KEYWORDS")]
    pub exclude_keywords: Option<String>,

    /// Directory for cached PDF assets
    #[arg(long, env = "PDF_CACHE_DIR", default_value = "data/pdfs")]
    pub pdf_cache_dir: PathBuf,
}

/// Effective scraper parameters, resolved once at run start.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub max_items_per_source: usize,
    pub max_pdf_enrichments_per_source: usize,
    pub max_pdf_text_chars: usize,
    pub lookback_days: i64,
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
}

impl ScraperConfig {
    pub fn resolve(args: &ScraperArgs) -> Self {
        ScraperConfig {
            timeout_ms: args.fetch_timeout_ms,
            retry_attempts: args.fetch_retry_attempts,
            max_items_per_source: args.max_items_per_source,
            max_pdf_enrichments_per_source: args.max_pdf_enrichments_per_source,
            max_pdf_text_chars: args.max_pdf_text_chars,
            lookback_days: args.lookback_days,
            include_keywords: parse_keyword_list(
                args.include_keywords.as_deref(),
                DEFAULT_INCLUDE_KEYWORDS,
            ),
            exclude_keywords: parse_keyword_list(
                args.exclude_keywords.as_deref(),
                DEFAULT_EXCLUDE_KEYWORDS,
            ),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            timeout_ms: 20_000,
            retry_attempts: 2,
            max_items_per_source: 40,
            max_pdf_enrichments_per_source: 4,
            max_pdf_text_chars: 20_000,
            lookback_days: 30,
            include_keywords: parse_keyword_list(None, DEFAULT_INCLUDE_KEYWORDS),
            exclude_keywords: parse_keyword_list(None, DEFAULT_EXCLUDE_KEYWORDS),
        }
    }
}
