use crate::config::BrowserConfig;
use crate::error::{Result, ScrapeError};
use crate::scrapers::traits::{PageSurface, WaitCondition};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tracing::{debug, info, warn};

/// One Chrome process with a single tab, driven over CDP.
///
/// `headless_chrome` is blocking, so every call runs on the blocking pool.
/// Dropping the surface kills the Chrome process.
pub struct ChromeSurface {
    // Held for its Drop, which tears the process down.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSurface {
    /// Launch Chrome and open a tab with the configured user agent.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let config = config.clone();

        task::spawn_blocking(move || Self::launch_blocking(&config))
            .await
            .map_err(ScrapeError::browser)?
    }

    fn launch_blocking(config: &BrowserConfig) -> Result<Self> {
        info!("🚀 Launching Chrome (headless: {})...", config.headless);

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(config.sandbox)
            .window_size(None)
            .idle_browser_timeout(config.idle_browser_timeout)
            .build()
            .map_err(ScrapeError::browser)?;

        let browser = Browser::new(options).map_err(ScrapeError::browser)?;
        let tab = browser.new_tab().map_err(ScrapeError::browser)?;

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(ScrapeError::browser)?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    /// Run a blocking tab operation off the async runtime.
    async fn with_tab<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Tab) -> Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        task::spawn_blocking(move || op(tab.as_ref()))
            .await
            .map_err(ScrapeError::browser)?
    }
}

#[async_trait]
impl PageSurface for ChromeSurface {
    async fn navigate(&self, url: &str, wait: WaitCondition, timeout: Duration) -> Result<()> {
        let url = url.to_string();

        self.with_tab(move |tab| {
            let navigation_error = |e: anyhow::Error| ScrapeError::Navigation {
                url: url.clone(),
                reason: format!("{e:#}"),
            };

            debug!("Navigating to {}", url);
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url).map_err(navigation_error)?;

            if wait == WaitCondition::Loaded {
                tab.wait_until_navigated().map_err(navigation_error)?;
            }
            Ok(())
        })
        .await
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<()> {
        let selector = selector.to_string();

        self.with_tab(move |tab| {
            tab.wait_for_element_with_custom_timeout(&selector, timeout)
                .map(|_| ())
                .map_err(|e| {
                    debug!("Waiting for {} failed: {:#}", selector, e);
                    ScrapeError::ListingsNotFound {
                        selector: selector.clone(),
                        timeout_ms: timeout.as_millis(),
                    }
                })
        })
        .await
    }

    async fn evaluate(&self, script: &str) -> Result<Option<Value>> {
        let script = script.to_string();

        self.with_tab(move |tab| {
            let result = tab.evaluate(&script, false).map_err(ScrapeError::script)?;
            Ok(result.value)
        })
        .await
    }

    async fn content(&self) -> Result<String> {
        self.with_tab(|tab| tab.get_content().map_err(ScrapeError::script))
            .await
    }

    async fn dismiss_overlay(&self) -> Result<()> {
        self.with_tab(|tab| {
            tab.press_key("Escape").map_err(ScrapeError::script)?;
            Ok(())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        info!("🛑 Closing browser...");
        self.with_tab(|tab| {
            if let Err(e) = tab.close(true) {
                warn!("Tab did not close cleanly: {:#}", e);
            }
            Ok(())
        })
        .await
    }
}
