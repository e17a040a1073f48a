use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;
use crate::scraper::ScrapedJob;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub source_url: String,
    pub pdf_source_url: Option<String>,
    pub pdf_cached_url: Option<String>,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counts from one persistence batch.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SaveOutcome {
    pub attempted: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped_duplicates: usize,
}

impl Job {
    /// Upsert a batch of scraped rows keyed on the canonical `source_url`.
    /// A URL seen in a previous run gets its fields refreshed instead of
    /// erroring; a URL repeated within this batch is skipped and counted.
    pub async fn save_scraped(pool: &PgPool, rows: &[ScrapedJob]) -> Result<SaveOutcome, AppError> {
        let mut outcome = SaveOutcome {
            attempted: rows.len(),
            ..SaveOutcome::default()
        };
        let mut seen: HashSet<&str> = HashSet::new();

        for row in rows {
            if !seen.insert(row.source_url.as_str()) {
                outcome.skipped_duplicates += 1;
                continue;
            }

            let (inserted,): (bool,) = sqlx::query_as(
                "INSERT INTO jobs (title, company, location, description, source_url, pdf_source_url, pdf_cached_url, source_name) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (source_url) DO UPDATE SET \
                    title = EXCLUDED.title, \
                    company = EXCLUDED.company, \
                    location = EXCLUDED.location, \
                    description = EXCLUDED.description, \
                    pdf_source_url = EXCLUDED.pdf_source_url, \
                    pdf_cached_url = EXCLUDED.pdf_cached_url, \
                    source_name = EXCLUDED.source_name, \
                    updated_at = NOW() \
                 RETURNING (xmax = 0)",
            )
            .bind(&row.title)
            .bind(&row.company)
            .bind(&row.location)
            .bind(&row.description)
            .bind(&row.source_url)
            .bind(&row.pdf_source_url)
            .bind(&row.pdf_cached_url)
            .bind(&row.source_name)
            .fetch_one(pool)
            .await?;

            if inserted {
                outcome.inserted += 1;
            } else {
                outcome.updated += 1;
            }
        }

        Ok(outcome)
    }
}
