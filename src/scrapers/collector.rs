//! Scroll-and-collect loop.
//!
//! Each round scrolls to the bottom of the listing page, waits for lazily
//! loaded cards to settle, and re-reads the full set of visible prices. The
//! sample is replaced every round, never merged. Collection ends when the
//! sample reaches the target size or its length has not changed for
//! `stagnation_limit` consecutive rounds. Without a `max_duration` there is
//! no other bound: a page that keeps growing keeps the loop running.

use crate::config::{CollectorConfig, SettleStrategy};
use crate::error::{Result, ScrapeError};
use crate::models::StopReason;
use crate::scrapers::extract::{self, PriceSelectors};
use crate::scrapers::traits::PageSurface;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// Where the loop stands after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sampling,
    Stagnant(u32),
    Done(StopReason),
}

/// Loop state, updated once per round.
#[derive(Debug, Default)]
pub struct CollectionState {
    pub current_sample: Vec<u64>,
    pub previous_count: usize,
    pub stagnant_rounds: u32,
}

impl CollectionState {
    /// Replace the sample and advance the stagnation counter.
    pub fn observe(&mut self, sample: Vec<u64>, target: usize, stagnation_limit: u32) -> Phase {
        if sample.len() == self.previous_count {
            self.stagnant_rounds += 1;
        } else {
            self.stagnant_rounds = 0;
        }
        self.previous_count = sample.len();
        self.current_sample = sample;

        if self.current_sample.len() >= target {
            Phase::Done(StopReason::TargetReached)
        } else if self.stagnant_rounds >= stagnation_limit {
            Phase::Done(StopReason::Stagnated)
        } else if self.stagnant_rounds > 0 {
            Phase::Stagnant(self.stagnant_rounds)
        } else {
            Phase::Sampling
        }
    }
}

/// Final sample of a finished loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub prices: Vec<u64>,
    pub rounds: usize,
    pub stop_reason: StopReason,
}

pub struct ConvergenceCollector {
    config: CollectorConfig,
    selectors: PriceSelectors,
}

impl ConvergenceCollector {
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let selectors = PriceSelectors::new(&config.card_selector, &config.price_selector)
            .ok_or_else(|| ScrapeError::InvalidRequest {
                reason: format!(
                    "invalid listing selectors \"{}\" / \"{}\"",
                    config.card_selector, config.price_selector
                ),
            })?;

        Ok(Self { config, selectors })
    }

    pub fn card_selector(&self) -> &str {
        &self.config.card_selector
    }

    /// Run rounds until the target is reached or the page stops yielding.
    pub async fn collect(&self, page: &dyn PageSurface, target: usize) -> Result<Collection> {
        let started = Instant::now();
        let mut state = CollectionState::default();
        let mut rounds = 0usize;

        loop {
            rounds += 1;

            info!("📜 Scrolling to bottom...");
            if let Err(e) = page.evaluate(SCROLL_TO_BOTTOM).await {
                warn!("Scroll failed, sampling anyway: {}", e);
            }

            info!(
                "⏳ Waiting for new hotels to load... (stagnant rounds: {})",
                state.stagnant_rounds
            );
            self.settle(page).await;

            let sample = match self.sample(page).await {
                Ok(sample) => sample,
                Err(e) => {
                    warn!("Could not read listings this round, keeping previous sample: {}", e);
                    state.current_sample.clone()
                }
            };

            let phase = state.observe(sample, target, self.config.stagnation_limit);
            info!("🏨 Found {} hotels so far...", state.current_sample.len());
            debug!("Round {} ended in {:?}", rounds, phase);

            if let Phase::Done(stop_reason) = phase {
                return Ok(Collection {
                    prices: state.current_sample,
                    rounds,
                    stop_reason,
                });
            }

            if let Some(budget) = self.config.max_duration {
                if started.elapsed() >= budget {
                    warn!("Collection time budget of {:?} used up", budget);
                    return Ok(Collection {
                        prices: state.current_sample,
                        rounds,
                        stop_reason: StopReason::TimeBudgetExhausted,
                    });
                }
            }
        }
    }

    /// Read every price currently rendered on the page.
    pub async fn sample(&self, page: &dyn PageSurface) -> Result<Vec<u64>> {
        let html = page.content().await?;
        Ok(extract::prices_from_html(&html, &self.selectors))
    }

    async fn settle(&self, page: &dyn PageSurface) {
        match self.config.settle {
            SettleStrategy::Fixed(delay) => time::sleep(delay).await,
            SettleStrategy::CountStable { poll, max_wait } => {
                self.wait_for_stable_count(page, poll, max_wait).await
            }
        }
    }

    async fn wait_for_stable_count(&self, page: &dyn PageSurface, poll: Duration, max_wait: Duration) {
        let deadline = Instant::now() + max_wait;
        let script = count_script(&self.config.card_selector);
        let mut last = None;

        loop {
            let count = page
                .evaluate(&script)
                .await
                .ok()
                .flatten()
                .and_then(|v| v.as_u64());

            if count.is_some() && count == last {
                debug!("Card count settled at {:?}", count);
                return;
            }
            if Instant::now() >= deadline {
                debug!("Card count still moving after {:?}", max_wait);
                return;
            }

            last = count;
            time::sleep(poll).await;
        }
    }
}

fn count_script(card_selector: &str) -> String {
    // JSON string literals are valid JS string literals
    let quoted = serde_json::Value::String(card_selector.to_string());
    format!("document.querySelectorAll({quoted}).length")
}
