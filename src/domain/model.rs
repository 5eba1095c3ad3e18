use crate::utils::error::MatchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Written to the output file for any field that could not be determined.
pub const NOT_AVAILABLE: &str = "N.A.";

/// Column order of the exported file; matches the field order of [`OutputRow`].
pub const OUTPUT_HEADER: [&str; 5] = ["TITLE", "URL", "PRICE", "DB_ID", "DB_TITLE"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One product card scraped from a results page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub price: Option<String>,
}

impl CandidateRecord {
    /// Title used for similarity scoring; a missing title compares as empty.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub record: CandidateRecord,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub title: String,
    pub url: String,
    pub price: String,
    pub catalog_id: String,
    pub catalog_title: String,
}

impl OutputRow {
    pub fn from_match(entry: &CatalogEntry, matched: &MatchResult) -> Self {
        let or_sentinel =
            |field: &Option<String>| field.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            title: or_sentinel(&matched.record.title),
            url: or_sentinel(&matched.record.url),
            price: or_sentinel(&matched.record.price),
            catalog_id: entry.id.clone(),
            catalog_title: entry.title.clone(),
        }
    }
}

/// Snapshot of a fully rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
}

/// What happened to a single catalog entry. Fatal errors never get here;
/// they end the batch instead.
#[derive(Debug)]
pub enum EntryOutcome {
    Matched { row: OutputRow, score: f64 },
    NotFound,
    Failed(MatchError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub attempted: usize,
    pub matched: usize,
    pub not_found: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &EntryOutcome) {
        self.attempted += 1;
        match outcome {
            EntryOutcome::Matched { .. } => self.matched += 1,
            EntryOutcome::NotFound => self.not_found += 1,
            EntryOutcome::Failed(_) => self.failed += 1,
        }
    }
}
