#[cfg(feature = "cli")]
pub mod cli;
pub mod site;
pub mod toml_config;

pub use site::{SiteProfile, SiteSelectors};

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const DEFAULT_CATEGORY: &str = "HUMAN OTC DRUG LABEL";
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 5_000;
pub const MAX_NAVIGATION_TIMEOUT_MS: u64 = 300_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogSettings {
    Postgres {
        url: String,
        #[serde(default = "default_category")]
        category: String,
    },
    Csv {
        path: String,
    },
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Validate for CatalogSettings {
    fn validate(&self) -> Result<()> {
        match self {
            CatalogSettings::Postgres { url, category } => {
                validate_non_empty_string("catalog.url", url)?;
                validate_non_empty_string("catalog.category", category)
            }
            CatalogSettings::Csv { path } => validate_path("catalog.path", path),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FetchMode {
    /// Headless Chromium; runs the page's scripts before extraction
    #[default]
    Browser,
    /// Plain HTTP GET; for targets that render on the server
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub mode: FetchMode,
    pub headless: bool,
    pub navigation_timeout_ms: u64,
    /// How long to wait for the first result card after the load event.
    /// Elapsing is not an error: the page may simply have no results.
    pub settle_timeout_ms: u64,
    pub chrome_executable: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            mode: FetchMode::Browser,
            headless: true,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            settle_timeout_ms: DEFAULT_SETTLE_TIMEOUT_MS,
            chrome_executable: None,
        }
    }
}

impl Validate for FetchSettings {
    fn validate(&self) -> Result<()> {
        validate_range(
            "fetch.navigation_timeout_ms",
            self.navigation_timeout_ms,
            1,
            MAX_NAVIGATION_TIMEOUT_MS,
        )?;
        validate_range(
            "fetch.settle_timeout_ms",
            self.settle_timeout_ms,
            0,
            MAX_NAVIGATION_TIMEOUT_MS,
        )?;
        if let Some(path) = &self.chrome_executable {
            validate_path("fetch.chrome_executable", path)?;
        }
        Ok(())
    }
}

/// Slice of the catalog to process, so long runs can be resumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchWindow {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl BatchWindow {
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.skip.min(total);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(total),
            None => total,
        };
        start..end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}
