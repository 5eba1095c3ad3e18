use crate::config::{
    BatchWindow, CatalogSettings, FetchSettings, LogFormat, SiteProfile, DEFAULT_DELAY_MS,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteProfile,
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub delay_ms: u64,
    pub skip: usize,
    pub limit: Option<usize>,
    pub min_score: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            skip: 0,
            limit: None,
            min_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "output.csv".to_string(),
            append: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MatchError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        self.site.validate()?;
        self.catalog.validate()?;
        self.fetch.validate()?;

        validate_path("output.path", &self.output.path)?;
        validate_range("batch.min_score", self.batch.min_score, 0.0, 1.0)?;
        if let Some(limit) = self.batch.limit {
            validate_positive_number("batch.limit", limit, 1)?;
        }

        if let CatalogSettings::Postgres { url, .. } = &self.catalog {
            if url.contains("${") {
                return Err(MatchError::MissingConfigError {
                    field: format!("catalog.url (unresolved variable in '{}')", url),
                });
            }
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn site(&self) -> SiteProfile {
        self.site.clone()
    }

    fn catalog(&self) -> Result<CatalogSettings> {
        Ok(self.catalog.clone())
    }

    fn fetch(&self) -> FetchSettings {
        self.fetch.clone()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn append_output(&self) -> bool {
        self.output.append
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.batch.delay_ms)
    }

    fn window(&self) -> BatchWindow {
        BatchWindow {
            skip: self.batch.skip,
            limit: self.batch.limit,
        }
    }

    fn min_score(&self) -> f64 {
        self.batch.min_score
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
