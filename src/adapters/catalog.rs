use crate::config::CatalogSettings;
use crate::domain::model::CatalogEntry;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{MatchError, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

const LABEL_QUERY: &str = r"
    SELECT id::text, title
    FROM label
    WHERE category = $1
    ORDER BY id
";

fn unavailable(e: impl std::fmt::Display) -> MatchError {
    MatchError::CatalogUnavailable {
        message: e.to_string(),
    }
}

/// An entry with a blank title would search for the empty string.
fn keep_titled(entry: CatalogEntry) -> Option<CatalogEntry> {
    if entry.title.trim().is_empty() {
        warn!("Skipping catalog entry {} without a title", entry.id);
        None
    } else {
        Some(entry)
    }
}

/// Product labels stored in PostgreSQL, filtered by category.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    database_url: String,
    category: String,
}

impl PostgresCatalog {
    pub fn new(database_url: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            category: category.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for PostgresCatalog {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&self.database_url)
            .await
            .map_err(unavailable)?;

        debug!("Querying catalog for category '{}'", self.category);
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(LABEL_QUERY)
            .bind(&self.category)
            .fetch_all(&pool)
            .await
            .map_err(unavailable)?;

        pool.close().await;

        Ok(rows
            .into_iter()
            .filter_map(|(id, title)| {
                keep_titled(CatalogEntry {
                    id,
                    title: title.unwrap_or_default(),
                })
            })
            .collect())
    }
}

/// Catalog exported to a CSV file with `id` and `title` columns.
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for CsvCatalog {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            unavailable(format!("cannot open {}: {}", self.path.display(), e))
        })?;

        let entries = reader
            .deserialize::<CatalogEntry>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(unavailable)?;

        Ok(entries.into_iter().filter_map(keep_titled).collect())
    }
}

/// The catalog chosen by configuration.
#[derive(Debug, Clone)]
pub enum CatalogBackend {
    Postgres(PostgresCatalog),
    Csv(CsvCatalog),
}

impl From<CatalogSettings> for CatalogBackend {
    fn from(settings: CatalogSettings) -> Self {
        match settings {
            CatalogSettings::Postgres { url, category } => {
                CatalogBackend::Postgres(PostgresCatalog::new(url, category))
            }
            CatalogSettings::Csv { path } => CatalogBackend::Csv(CsvCatalog::new(path)),
        }
    }
}

#[async_trait]
impl CatalogSource for CatalogBackend {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        match self {
            CatalogBackend::Postgres(catalog) => catalog.load().await,
            CatalogBackend::Csv(catalog) => catalog.load().await,
        }
    }
}
