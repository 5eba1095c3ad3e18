use crate::config::{BatchWindow, CatalogSettings, FetchSettings, SiteProfile};
use crate::domain::model::{CatalogEntry, OutputRow, RenderedPage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<CatalogEntry>>;
}

/// Opens an isolated browsing context for `url`, waits for it to render and
/// returns the resulting markup. The context is released before returning.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn render(&self, url: &str) -> Result<RenderedPage>;
}

#[async_trait]
impl<P: PageSource + ?Sized> PageSource for &P {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        (**self).render(url).await
    }
}

pub trait OutputSink: Send {
    fn append(&mut self, row: &OutputRow) -> Result<()>;
}

/// A child of a DOM element as seen by the extractor.
#[derive(Debug, Clone)]
pub enum DomChild<N> {
    Text(String),
    Element(N),
    Other,
}

/// Structural queries over a parsed document. Selectors are CSS and are
/// evaluated against descendants of `self`.
pub trait DomNode: Sized {
    fn locate(&self, selector: &str) -> Option<Self>;
    fn locate_all(&self, selector: &str) -> Vec<Self>;
    fn attribute(&self, name: &str) -> Option<String>;
    /// Text as a browser would render it (`innerText`): block boundaries and
    /// `<br>` become line breaks, other whitespace runs collapse to one space.
    fn rendered_text(&self) -> String;
    fn child_nodes(&self) -> Vec<DomChild<Self>>;
}

pub trait ConfigProvider: Send + Sync {
    fn site(&self) -> SiteProfile;
    fn catalog(&self) -> Result<CatalogSettings>;
    fn fetch(&self) -> FetchSettings;
    fn output_path(&self) -> &str;
    fn append_output(&self) -> bool;
    fn request_delay(&self) -> Duration;
    fn window(&self) -> BatchWindow;
    fn min_score(&self) -> f64;
}
