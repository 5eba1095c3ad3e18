use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Catalog unavailable: {message}")]
    CatalogUnavailable { message: String },

    #[error("Search failed for '{query}': {cause}")]
    SearchFailed { query: String, cause: String },

    #[error("Candidate set is empty")]
    EmptyCandidateSet,

    #[error("Browser engine unavailable: {message}")]
    EngineUnavailable { message: String },

    #[error("Navigation to {url} failed: {message}")]
    NavigationFailed { url: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Catalog,
    Search,
    Matching,
    Engine,
    Output,
}

impl MatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::CatalogUnavailable { .. } => ErrorCategory::Catalog,
            MatchError::SearchFailed { .. }
            | MatchError::NavigationFailed { .. }
            | MatchError::HttpError(_) => ErrorCategory::Search,
            MatchError::EmptyCandidateSet => ErrorCategory::Matching,
            MatchError::EngineUnavailable { .. } => ErrorCategory::Engine,
            MatchError::CsvError(_) | MatchError::IoError(_) => ErrorCategory::Output,
            MatchError::ConfigError { .. }
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Matching => ErrorSeverity::Low,
            ErrorCategory::Search => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Catalog | ErrorCategory::Engine => ErrorSeverity::Critical,
        }
    }

    /// Fatal errors end the batch; everything below `High` is handled per entry.
    pub fn is_fatal(&self) -> bool {
        self.severity() >= ErrorSeverity::High
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Catalog => 2,
            ErrorCategory::Engine | ErrorCategory::Output => 3,
            ErrorCategory::Search | ErrorCategory::Matching => 0,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags or the TOML configuration file"
            }
            ErrorCategory::Catalog => {
                "Verify the database URL, credentials and that the catalog table is reachable"
            }
            ErrorCategory::Search => "The entry was skipped; the target site may be slow or blocking requests",
            ErrorCategory::Matching => "No candidates were available to compare",
            ErrorCategory::Engine => {
                "Make sure Chrome/Chromium is installed or set CHROMIUM_PATH to its executable"
            }
            ErrorCategory::Output => "Check that the output path is writable and the disk is not full",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MatchError::CatalogUnavailable { .. } => {
                format!("Could not load the product catalog. {}", self)
            }
            MatchError::EngineUnavailable { .. } => {
                format!("The browser engine stopped working. {}", self)
            }
            MatchError::CsvError(_) | MatchError::IoError(_) => {
                format!("Could not write the output file. {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
