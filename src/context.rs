use crate::adapters::browser::BrowserSession;
use crate::adapters::http::HttpPageSource;
use crate::config::FetchMode;
use crate::domain::model::RenderedPage;
use crate::domain::ports::{ConfigProvider, PageSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The page source selected by configuration.
pub enum PageBackend {
    Browser(BrowserSession),
    Http(HttpPageSource),
}

#[async_trait]
impl PageSource for PageBackend {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        match self {
            PageBackend::Browser(session) => session.render(url).await,
            PageBackend::Http(client) => client.render(url).await,
        }
    }
}

/// Process-wide resources, created once before the batch and torn down
/// once after it.
pub struct AppContext {
    pub pages: PageBackend,
}

impl AppContext {
    pub async fn init<C: ConfigProvider>(config: &C) -> Result<Self> {
        let fetch = config.fetch();
        let pages = match fetch.mode {
            FetchMode::Browser => {
                let settle_selector = Some(config.site().selectors.card);
                PageBackend::Browser(BrowserSession::launch(&fetch, settle_selector).await?)
            }
            FetchMode::Http => PageBackend::Http(HttpPageSource::new(Duration::from_millis(
                fetch.navigation_timeout_ms,
            ))?),
        };

        Ok(Self { pages })
    }

    pub async fn shutdown(self) {
        if let PageBackend::Browser(session) = self.pages {
            session.shutdown().await;
        }
    }
}
