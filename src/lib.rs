pub mod adapters;
pub mod app;
pub mod config;
pub mod context;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::catalog::{CatalogBackend, CsvCatalog, PostgresCatalog};
pub use adapters::http::HttpPageSource;
pub use adapters::sink::CsvSink;
pub use app::RunReport;
pub use context::{AppContext, PageBackend};
pub use crate::core::{batch::BatchRunner, search::ProductSearch};
pub use domain::model::{BatchSummary, CandidateRecord, CatalogEntry, MatchResult, OutputRow};
pub use utils::error::{MatchError, Result};
