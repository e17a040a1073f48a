pub mod dates;
pub mod fetch;
pub mod intent;
pub mod pdf;
pub mod run;
pub mod services;
pub mod source;
pub mod text;
pub mod worker;

use serde::Serialize;

/// One normalized job row ready for persistence. `source_url` is the
/// canonical dedup key.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub source_url: String,
    pub pdf_source_url: Option<String>,
    pub pdf_cached_url: Option<String>,
    pub source_name: String,
}

/// Counters accumulated while scraping one source.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SourceStats {
    pub source: String,
    pub fetched: u32,
    pub containers_scanned: u32,
    pub extracted: u32,
    pub filtered_by_location: u32,
    pub filtered_by_date: u32,
    pub filtered_by_keyword: u32,
    pub parse_errors: u32,
    pub pdf_detail_attempts: u32,
    pub pdf_detail_successes: u32,
    pub pdf_detail_failures: u32,
    pub pdf_fields_extracted: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Aggregated result of one orchestrator run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub sources_processed: u32,
    pub total_sources: u32,
    pub lookback_days: i64,
    pub jobs_found: u32,
    pub total_extracted: u32,
    pub total_filtered_by_location: u32,
    pub total_filtered_by_date: u32,
    pub total_filtered_by_keyword: u32,
    pub cross_source_duplicates: u32,
    pub cancelled: bool,
    pub source_stats: Vec<SourceStats>,
}

impl RunSummary {
    pub(crate) fn absorb(&mut self, stats: SourceStats) {
        self.sources_processed += 1;
        self.total_extracted += stats.extracted;
        self.total_filtered_by_location += stats.filtered_by_location;
        self.total_filtered_by_date += stats.filtered_by_date;
        self.total_filtered_by_keyword += stats.filtered_by_keyword;
        self.source_stats.push(stats);
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Scrape Run Complete ===")?;
        writeln!(
            f,
            "Sources processed:    {}/{}",
            self.sources_processed, self.total_sources
        )?;
        writeln!(f, "Lookback window:      {} days", self.lookback_days)?;
        writeln!(f, "Jobs found:           {}", self.jobs_found)?;
        writeln!(f, "Items extracted:      {}", self.total_extracted)?;
        writeln!(f, "Filtered by location: {}", self.total_filtered_by_location)?;
        writeln!(f, "Filtered by date:     {}", self.total_filtered_by_date)?;
        writeln!(f, "Filtered by keyword:  {}", self.total_filtered_by_keyword)?;
        writeln!(f, "Duplicate URLs:       {}", self.cross_source_duplicates)?;
        if self.cancelled {
            writeln!(f, "Run cancelled before all sources completed")?;
        }
        if !self.source_stats.is_empty() {
            writeln!(f, "\nPer source:")?;
        }
        for stats in &self.source_stats {
            write!(
                f,
                "  {}: {} scanned, {} extracted, pdf {}/{}",
                stats.source,
                stats.containers_scanned,
                stats.extracted,
                stats.pdf_detail_successes,
                stats.pdf_detail_attempts,
            )?;
            match &stats.error_message {
                Some(error) => writeln!(f, " (error: {error})")?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}

/// Jobs plus summary from one orchestrator run.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub jobs: Vec<ScrapedJob>,
    pub summary: RunSummary,
}

/// A finished run: scrape summary plus persistence counts.
#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub save: crate::models::job::SaveOutcome,
}
