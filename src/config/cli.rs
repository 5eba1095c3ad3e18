use crate::config::site::{DEFAULT_BASE_URL, DEFAULT_SEARCH_PATH};
use crate::config::{
    BatchWindow, CatalogSettings, FetchMode, FetchSettings, LogFormat, SiteProfile, SiteSelectors,
    DEFAULT_CATEGORY,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "catalog-match")]
#[command(about = "Match catalog products against a retailer's search results")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of the flags below
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Read the catalog from a CSV file with `id,title` columns
    #[arg(long)]
    pub catalog_csv: Option<String>,

    #[arg(short, long, default_value = "output.csv")]
    pub output: String,

    /// Append to an existing output file instead of replacing it
    #[arg(long)]
    pub append: bool,

    #[arg(long, default_value = "1000")]
    pub delay_ms: u64,

    /// Number of catalog entries to skip
    #[arg(long, default_value = "0")]
    pub skip: usize,

    /// Maximum number of catalog entries to process
    #[arg(long)]
    pub limit: Option<usize>,

    /// Matches scoring below this are reported as not found
    #[arg(long, default_value = "0.0")]
    pub min_score: f64,

    #[arg(long, value_enum, default_value_t = FetchMode::Browser)]
    pub fetch_mode: FetchMode,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    #[arg(long, default_value = "30000")]
    pub navigation_timeout_ms: u64,

    #[arg(long, default_value = "5000")]
    pub settle_timeout_ms: u64,

    #[arg(long, env = "CHROMIUM_PATH")]
    pub chrome_path: Option<String>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = DEFAULT_SEARCH_PATH)]
    pub search_path: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl ConfigProvider for CliConfig {
    fn site(&self) -> SiteProfile {
        SiteProfile {
            base_url: self.base_url.clone(),
            search_path: self.search_path.clone(),
            selectors: SiteSelectors::default(),
        }
    }

    fn catalog(&self) -> Result<CatalogSettings> {
        if let Some(path) = &self.catalog_csv {
            return Ok(CatalogSettings::Csv { path: path.clone() });
        }

        let url = self
            .database_url
            .clone()
            .ok_or_else(|| MatchError::MissingConfigError {
                field: "database_url (or --catalog-csv)".to_string(),
            })?;

        Ok(CatalogSettings::Postgres {
            url,
            category: self.category.clone(),
        })
    }

    fn fetch(&self) -> FetchSettings {
        FetchSettings {
            mode: self.fetch_mode,
            headless: !self.headed,
            navigation_timeout_ms: self.navigation_timeout_ms,
            settle_timeout_ms: self.settle_timeout_ms,
            chrome_executable: self.chrome_path.clone(),
        }
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn append_output(&self) -> bool {
        self.append
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn window(&self) -> BatchWindow {
        BatchWindow {
            skip: self.skip,
            limit: self.limit,
        }
    }

    fn min_score(&self) -> f64 {
        self.min_score
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.site().validate()?;
        self.catalog()?.validate()?;
        self.fetch().validate()?;
        validate_path("output", &self.output)?;
        validate_range("min_score", self.min_score, 0.0, 1.0)?;
        if let Some(limit) = self.limit {
            validate_positive_number("limit", limit, 1)?;
        }
        Ok(())
    }
}
