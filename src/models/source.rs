use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;

/// A managed source row: one website to scrape, with its CSS selectors and
/// location scope. Edited externally (admin tooling writes this table); the
/// scraper only reads it.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Source {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub location_scope: String,
    pub selectors: serde_json::Value,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-source filter: restrict to the target region or accept everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationScope {
    MeghalayaOnly,
    AllLocations,
}

/// CSS selectors for one source. Every field except `published_at` is
/// required; empty strings are tolerated here and rejected per-source at
/// scrape time so one bad config cannot take down a whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSelectors {
    pub job_container: String,
    pub title: String,
    pub location: String,
    pub company: String,
    pub link: String,
    pub description: String,
    pub published_at: Option<String>,
}

/// Immutable per-run configuration for one source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub location_scope: LocationScope,
    pub selectors: SourceSelectors,
}

impl Source {
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<Source>, AppError> {
        let sources =
            sqlx::query_as::<_, Source>("SELECT * FROM sources WHERE enabled ORDER BY id")
                .fetch_all(pool)
                .await?;
        Ok(sources)
    }

    pub async fn get_by_name(pool: &PgPool, name: &str) -> Result<Source, AppError> {
        sqlx::query_as::<_, Source>("SELECT * FROM sources WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Source '{name}' not found")))
    }

    /// Enabled sources as run-ready configs. A source whose stored config
    /// does not parse is skipped with a warning instead of failing the run.
    pub async fn load_enabled_configs(pool: &PgPool) -> Result<Vec<SourceConfig>, AppError> {
        let mut configs = Vec::new();
        for source in Self::list_enabled(pool).await? {
            let name = source.name.clone();
            match source.into_config() {
                Ok(config) => configs.push(config),
                Err(e) => tracing::warn!("Skipping source '{name}': {e}"),
            }
        }
        Ok(configs)
    }

    pub fn into_config(self) -> Result<SourceConfig, AppError> {
        let location_scope = match self.location_scope.as_str() {
            "meghalaya_only" => LocationScope::MeghalayaOnly,
            "all_locations" => LocationScope::AllLocations,
            other => {
                return Err(AppError::Parse(format!(
                    "Unknown location scope '{other}' for source '{}'",
                    self.name
                )));
            }
        };
        let selectors: SourceSelectors = serde_json::from_value(self.selectors)
            .map_err(|e| AppError::Parse(format!("Invalid selectors for source '{}': {e}", self.name)))?;
        Ok(SourceConfig {
            name: self.name,
            url: self.url,
            location_scope,
            selectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_row(scope: &str, selectors: serde_json::Value) -> Source {
        Source {
            id: 1,
            name: "Test Source".to_string(),
            url: "https://example.gov.in/jobs".to_string(),
            location_scope: scope.to_string(),
            selectors,
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn config_parses_scope_and_selectors() {
        let row = source_row(
            "meghalaya_only",
            serde_json::json!({"job_container": ".job", "title": ".t", "link": "a"}),
        );
        let config = row.into_config().unwrap();
        assert_eq!(config.location_scope, LocationScope::MeghalayaOnly);
        assert_eq!(config.selectors.job_container, ".job");
        // Missing selector fields default to empty and are caught at scrape time.
        assert!(config.selectors.description.is_empty());
        assert!(config.selectors.published_at.is_none());
    }

    #[test]
    fn unknown_scope_is_a_parse_error() {
        let row = source_row("everywhere", serde_json::json!({}));
        assert!(matches!(row.into_config(), Err(AppError::Parse(_))));
    }
}
