use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// Return as soon as the navigation request is issued
    Committed,
    /// Wait until the browser reports the page as loaded
    Loaded,
}

/// A live, scriptable page owned by exactly one scrape.
///
/// Implemented by the headless Chrome session in production and by a
/// scripted in-memory page in tests.
#[async_trait]
pub trait PageSurface: Send + Sync {
    /// Navigate and suspend until `wait` is satisfied or `timeout` passes.
    async fn navigate(&self, url: &str, wait: WaitCondition, timeout: Duration) -> Result<()>;

    /// Fails with `ListingsNotFound` if nothing matches within `timeout`.
    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Run a script against the rendered document and return its value, if any.
    async fn evaluate(&self, script: &str) -> Result<Option<Value>>;

    /// Current outer HTML of the document.
    async fn content(&self) -> Result<String>;

    /// Best-effort dismissal of a login or interstitial overlay.
    async fn dismiss_overlay(&self) -> Result<()>;

    /// Release the session. Must be safe to call after a failure.
    async fn close(&self) -> Result<()>;
}
