//! Headless Chromium session that renders search pages.
//!
//! One browser process lives for the whole run; every render opens its own
//! page (an isolated browsing context) and closes it before returning,
//! whether or not the navigation succeeded.

use crate::adapters::http::USER_AGENT;
use crate::config::FetchSettings;
use crate::domain::model::RenderedPage;
use crate::domain::ports::PageSource;
use crate::utils::error::{MatchError, Result};
use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

pub struct BrowserSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    navigation_timeout: Duration,
    settle_timeout: Duration,
    settle_selector: Option<String>,
}

impl BrowserSession {
    /// Launch the browser. `settle_selector` is polled for after each page
    /// load so client-side rendered results have a chance to appear.
    pub async fn launch(settings: &FetchSettings, settle_selector: Option<String>) -> Result<Self> {
        let user_data_dir = std::env::temp_dir().join(format!(
            "catalog_match_chrome_{}",
            std::process::id()
        ));

        let (browser, handler) = launch_browser(settings, &user_data_dir)
            .await
            .map_err(|e| MatchError::EngineUnavailable {
                message: format!("{:#}", e),
            })?;

        info!("Browser launched (headless: {})", settings.headless);
        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            user_data_dir: Some(user_data_dir),
            navigation_timeout: Duration::from_millis(settings.navigation_timeout_ms),
            settle_timeout: Duration::from_millis(settings.settle_timeout_ms),
            settle_selector,
        })
    }

    /// Close the browser, wait for the process to exit and remove its profile.
    pub async fn shutdown(mut self) {
        info!("Shutting down browser");
        {
            let browser = self.browser.get_mut();
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }
        }
        self.handler.abort();
        self.cleanup_user_data_dir();
    }

    fn cleanup_user_data_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Cleaning up browser profile: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up browser profile {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    async fn snapshot(&self, page: &Page, url: &str) -> Result<RenderedPage> {
        let failed = |message: String| MatchError::NavigationFailed {
            url: url.to_string(),
            message,
        };

        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, CdpError>(())
        };
        tokio::time::timeout(self.navigation_timeout, navigation)
            .await
            .map_err(|_| {
                failed(format!(
                    "timeout after {}ms",
                    self.navigation_timeout.as_millis()
                ))
            })?
            .map_err(|e| failed(e.to_string()))?;

        if let Some(selector) = &self.settle_selector {
            if !wait_for_element(page, selector, self.settle_timeout).await {
                debug!(
                    "No '{}' element after {}ms on {}",
                    selector,
                    self.settle_timeout.as_millis(),
                    url
                );
            }
        }

        let html = page
            .content()
            .await
            .map_err(|e| failed(format!("failed to read page content: {}", e)))?;
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        Ok(RenderedPage {
            url: final_url,
            html,
        })
    }
}

#[async_trait]
impl PageSource for BrowserSession {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| MatchError::EngineUnavailable {
                    message: format!("Failed to open browsing context: {}", e),
                })?
        };

        let snapshot = self.snapshot(&page, url).await;

        release_within(page.close(), self.navigation_timeout).await;
        snapshot
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(path) = &self.user_data_dir {
            warn!(
                "BrowserSession dropped without shutdown(); profile left at {}",
                path.display()
            );
        }
    }
}

/// Await a page cleanup step for at most `limit`. A close that never
/// answers is abandoned so the next search can start.
async fn release_within<F, E>(release: F, limit: Duration) -> bool
where
    F: Future<Output = std::result::Result<(), E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(limit, release).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Failed to close search page: {}", e);
            false
        }
        Err(_) => {
            warn!(
                "Closing search page timed out after {}ms",
                limit.as_millis()
            );
            false
        }
    }
}

/// Poll for `selector` with exponential backoff (100ms doubling, capped at 1s).
async fn wait_for_element(page: &Page, selector: &str, timeout: Duration) -> bool {
    let start = Instant::now();
    let mut poll_interval = Duration::from_millis(100);
    let max_interval = Duration::from_secs(1);

    loop {
        if page.find_element(selector).await.is_ok() {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        tokio::time::sleep(poll_interval).await;
        poll_interval = (poll_interval * 2).min(max_interval);
    }
}

async fn launch_browser(
    settings: &FetchSettings,
    user_data_dir: &Path,
) -> anyhow::Result<(Browser, JoinHandle<()>)> {
    std::fs::create_dir_all(user_data_dir).context("Failed to create user data directory")?;

    let mut builder = BrowserConfig::builder()
        .request_timeout(Duration::from_millis(settings.navigation_timeout_ms))
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir);

    if let Some(path) = &settings.chrome_executable {
        builder = builder.chrome_executable(path);
    }

    builder = if settings.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    builder = builder
        .arg(format!("--user-agent={}", USER_AGENT))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--disable-extensions")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--mute-audio");

    if should_disable_sandbox() {
        info!("Detected containerized environment, disabling sandbox");
        builder = builder.arg("--no-sandbox").arg("--disable-setuid-sandbox");
    }

    let config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // chromiumoxide cannot decode some newer CDP events; those are noise
                let benign = message.contains("data did not match any variant of untagged enum Message")
                    || message.contains("Failed to deserialize WS response");
                if benign {
                    trace!("Suppressed CDP decode error: {}", message);
                } else {
                    error!("Browser handler error: {:?}", e);
                }
            }
        }
        debug!("Browser handler task completed");
    });

    Ok((browser, handler_task))
}

/// Inside containers the setuid sandbox is unavailable.
fn should_disable_sandbox() -> bool {
    Path::new("/.dockerenv").exists()
        || std::env::var("container").is_ok()
        || std::env::var("KUBERNETES_SERVICE_HOST").is_ok()
}
