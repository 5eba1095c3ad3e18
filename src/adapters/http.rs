use crate::domain::model::RenderedPage;
use crate::domain::ports::PageSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fetches pages without executing scripts. Only suitable for targets that
/// render their results on the server.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        debug!("Making HTTP request to: {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!("HTTP response status: {}", response.status());

        let final_url = response.url().to_string();
        let html = response.text().await?;

        Ok(RenderedPage {
            url: final_url,
            html,
        })
    }
}
