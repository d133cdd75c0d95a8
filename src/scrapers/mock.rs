//! In-memory listing page for tests.
//!
//! Every scroll reveals the next scripted round of cards. Once the script is
//! exhausted the last round keeps being rendered.

use crate::error::{Result, ScrapeError};
use crate::scrapers::collector::SCROLL_TO_BOTTOM;
use crate::scrapers::traits::{PageSurface, WaitCondition};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct ScriptedSurface {
    rounds: Vec<Vec<Option<u64>>>,
    growth: Option<(usize, usize)>,
    scrolls: AtomicUsize,
    count_queries: AtomicUsize,
    content_reads: AtomicUsize,
    content_fails_after: Option<usize>,
    fail_navigation: bool,
    listings_present: bool,
    closed: AtomicBool,
    visited: Mutex<Vec<String>>,
    dismissed: AtomicBool,
}

impl ScriptedSurface {
    pub fn from_rounds(rounds: Vec<Vec<Option<u64>>>) -> Self {
        Self {
            rounds,
            growth: None,
            scrolls: AtomicUsize::new(0),
            count_queries: AtomicUsize::new(0),
            content_reads: AtomicUsize::new(0),
            content_fails_after: None,
            fail_navigation: false,
            listings_present: true,
            closed: AtomicBool::new(false),
            visited: Mutex::new(Vec::new()),
            dismissed: AtomicBool::new(false),
        }
    }

    /// Rounds showing `counts[i]` priced cards each.
    pub fn from_counts(counts: &[usize]) -> Self {
        Self::from_rounds(counts.iter().map(|&n| priced_cards(n)).collect())
    }

    /// `growth` more cards every round, for at most `max_rounds` rounds.
    pub fn growing(growth: usize, max_rounds: usize) -> Self {
        Self {
            growth: Some((growth, max_rounds)),
            ..Self::from_rounds(Vec::new())
        }
    }

    pub fn failing_content_after(mut self, successful_reads: usize) -> Self {
        self.content_fails_after = Some(successful_reads);
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn without_listings(mut self) -> Self {
        self.listings_present = false;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn overlay_dismissed(&self) -> bool {
        self.dismissed.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn count_queries(&self) -> usize {
        self.count_queries.load(Ordering::SeqCst)
    }

    fn current_cards(&self) -> Vec<Option<u64>> {
        let round = self.scrolls().max(1);

        if let Some((growth, max_rounds)) = self.growth {
            return priced_cards(growth * round.min(max_rounds));
        }

        self.rounds
            .get(round - 1)
            .or_else(|| self.rounds.last())
            .cloned()
            .unwrap_or_default()
    }

    fn render(&self) -> String {
        let cards: String = self
            .current_cards()
            .iter()
            .map(|price| match price {
                Some(p) => format!(
                    r#"<div class="listingRowOuter"><p class="priceText">₹ {p}</p></div>"#
                ),
                None => r#"<div class="listingRowOuter"><p class="soldOut">Sold out</p></div>"#
                    .to_string(),
            })
            .collect();
        format!("<html><body>{cards}</body></html>")
    }
}

fn priced_cards(n: usize) -> Vec<Option<u64>> {
    (0..n).map(|i| Some(1000 + i as u64)).collect()
}

#[async_trait]
impl PageSurface for ScriptedSurface {
    async fn navigate(&self, url: &str, _wait: WaitCondition, _timeout: Duration) -> Result<()> {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(url.to_string());
        }
        if self.fail_navigation {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        Ok(())
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<()> {
        if self.listings_present {
            Ok(())
        } else {
            Err(ScrapeError::ListingsNotFound {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis(),
            })
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Option<Value>> {
        if script == SCROLL_TO_BOTTOM {
            self.scrolls.fetch_add(1, Ordering::SeqCst);
            return Ok(None);
        }
        if script.starts_with("document.querySelectorAll") {
            self.count_queries.fetch_add(1, Ordering::SeqCst);
            return Ok(Some(Value::from(self.current_cards().len())));
        }
        Err(ScrapeError::Script {
            reason: format!("unscripted evaluation: {script}"),
        })
    }

    async fn content(&self) -> Result<String> {
        let reads = self.content_reads.fetch_add(1, Ordering::SeqCst);
        if matches!(self.content_fails_after, Some(limit) if reads >= limit) {
            return Err(ScrapeError::script("Execution context was destroyed"));
        }
        Ok(self.render())
    }

    async fn dismiss_overlay(&self) -> Result<()> {
        self.dismissed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
