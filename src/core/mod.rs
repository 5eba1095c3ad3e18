pub mod batch;
pub mod extractor;
pub mod matcher;
pub mod search;

pub use crate::domain::model::{CandidateRecord, CatalogEntry, MatchResult, OutputRow};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, OutputSink, PageSource};
pub use crate::utils::error::Result;
