use crate::scrapers::types::SearchParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration: what to search for and how to drive the browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub search: SearchParams,
    pub collector: CollectorConfig,
    pub browser: BrowserConfig,
}

impl ScoutConfig {
    /// Load from a JSON file. Missing sections and fields fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// How to wait for lazily loaded listings after each scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleStrategy {
    /// Sleep for a fixed duration
    Fixed(Duration),
    /// Poll the card count until two consecutive polls agree, up to `max_wait`
    CountStable { poll: Duration, max_wait: Duration },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        Self::Fixed(Duration::from_secs(3))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub settle: SettleStrategy,
    /// Consecutive rounds without a count change before giving up
    pub stagnation_limit: u32,
    /// Optional wall-clock cap on the whole collection loop
    pub max_duration: Option<Duration>,
    pub card_selector: String,
    pub price_selector: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            settle: SettleStrategy::default(),
            stagnation_limit: 3,
            max_duration: None,
            card_selector: "div.listingRowOuter".to_string(),
            price_selector: "p.priceText".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub sandbox: bool,
    pub user_agent: String,
    /// Visited first so the site sets its session cookies
    pub home_url: String,
    /// Pause after dismissing the login overlay
    pub overlay_settle: Duration,
    pub navigation_timeout: Duration,
    /// Bounded wait for the first listing card
    pub listings_timeout: Duration,
    /// Chrome is torn down after this long without CDP traffic
    pub idle_browser_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            sandbox: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".to_string(),
            home_url: "https://www.makemytrip.com/".to_string(),
            overlay_settle: Duration::from_secs(3),
            navigation_timeout: Duration::from_secs(60),
            listings_timeout: Duration::from_secs(15),
            idle_browser_timeout: Duration::from_secs(600),
        }
    }
}
