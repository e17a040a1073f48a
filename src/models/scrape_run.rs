use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ScrapeRun {
    pub id: i32,
    pub status: String,
    pub cancel_requested: bool,
    pub lookback_days: Option<i32>,
    pub jobs_found: Option<i32>,
    pub jobs_inserted: Option<i32>,
    pub jobs_updated: Option<i32>,
    pub error: Option<String>,
    pub summary: Option<serde_json::Value>,
    pub requested_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScrapeRun {
    /// Insert a new pending run into the queue.
    pub async fn enqueue(pool: &PgPool, lookback_days: Option<i64>) -> Result<ScrapeRun, AppError> {
        let run = sqlx::query_as::<_, ScrapeRun>(
            "INSERT INTO scrape_runs (lookback_days) VALUES ($1) RETURNING *",
        )
        .bind(lookback_days.map(|d| d as i32))
        .fetch_one(pool)
        .await?;
        Ok(run)
    }

    /// Atomically claim the next pending run. Uses SELECT FOR UPDATE SKIP
    /// LOCKED so concurrent workers never contend for the same run.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<ScrapeRun>, AppError> {
        let run = sqlx::query_as::<_, ScrapeRun>(
            "UPDATE scrape_runs SET status = 'running', started_at = NOW()
             WHERE id = (
                 SELECT id FROM scrape_runs
                 WHERE status = 'pending'
                 ORDER BY requested_at
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING *",
        )
        .fetch_optional(pool)
        .await?;
        Ok(run)
    }

    /// Mark a run as succeeded with job counts and the serialized summary.
    pub async fn mark_succeeded(
        pool: &PgPool,
        id: i32,
        jobs_found: i32,
        jobs_inserted: i32,
        jobs_updated: i32,
        summary: &serde_json::Value,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE scrape_runs SET status = 'succeeded', jobs_found = $2, jobs_inserted = $3, jobs_updated = $4, summary = $5, finished_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(jobs_found)
        .bind(jobs_inserted)
        .bind(jobs_updated)
        .bind(summary)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a cooperatively-cancelled run. Partial counts and stats are kept.
    pub async fn mark_cancelled(
        pool: &PgPool,
        id: i32,
        jobs_found: i32,
        jobs_inserted: i32,
        jobs_updated: i32,
        summary: &serde_json::Value,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE scrape_runs SET status = 'cancelled', jobs_found = $2, jobs_inserted = $3, jobs_updated = $4, summary = $5, finished_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(jobs_found)
        .bind(jobs_inserted)
        .bind(jobs_updated)
        .bind(summary)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Write an in-progress summary snapshot without touching run status.
    /// The terminal mark_* calls overwrite it with the final summary.
    pub async fn record_progress(
        pool: &PgPool,
        id: i32,
        summary: &serde_json::Value,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE scrape_runs SET summary = $2 WHERE id = $1")
            .bind(id)
            .bind(summary)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a run as failed with an error message.
    pub async fn mark_failed(pool: &PgPool, id: i32, error: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE scrape_runs SET status = 'failed', error = $2, finished_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Flag a pending or running run for cooperative cancellation. The worker
    /// checks the flag between sources and winds the run down.
    pub async fn request_cancel(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE scrape_runs SET cancel_requested = TRUE WHERE id = $1 AND status IN ('pending', 'running')",
        )
        .bind(id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Run {id} not found or already finished"
            )));
        }
        Ok(())
    }

    pub async fn cancel_requested(pool: &PgPool, id: i32) -> Result<bool, AppError> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT cancel_requested FROM scrape_runs WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|r| r.0).unwrap_or(false))
    }

    /// Reset runs left in 'running' state by a previous crash back to pending.
    pub async fn recover_stale(pool: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE scrape_runs SET status = 'pending', started_at = NULL WHERE status = 'running'",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Recent runs, newest first.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ScrapeRun>, AppError> {
        let runs = sqlx::query_as::<_, ScrapeRun>(
            "SELECT * FROM scrape_runs ORDER BY requested_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(runs)
    }
}
