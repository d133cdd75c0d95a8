use crate::config::{BrowserConfig, ScoutConfig};
use crate::error::Result;
use crate::models::{ScrapeResult, SearchRequest};
use crate::scrapers::browser::ChromeSurface;
use crate::scrapers::collector::ConvergenceCollector;
use crate::scrapers::traits::{PageSurface, WaitCondition};
use crate::scrapers::types::SearchParams;
use tokio::time;
use tracing::{info, warn};
use url::Url;

const LISTING_URL: &str = "https://www.makemytrip.com/hotels/hotel-listing/";

/// Build the hotel listing URL for a search.
pub fn search_url(request: &SearchRequest) -> String {
    let mut url = Url::parse(LISTING_URL).expect("listing URL constant is valid");
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("checkin", &request.checkin.token())
            .append_pair("checkout", &request.checkout.token())
            .append_pair("city", &request.destination_code)
            .append_pair("country", "IN")
            .append_pair("locusId", &request.destination_code)
            .append_pair("locusType", "city")
            .append_pair("regionNearByExp", "3")
            .append_pair("roomStayQualifier", "2e0e")
            .append_pair("rsc", "1e2e0e")
            .append_pair("searchText", &request.destination_name);

        if let Some(rating) = request.star_rating {
            query.append_pair("filterData", &format!("STAR_RATING|{rating}"));
        }

        query.append_pair("sort", "reviewRating-desc");
    }
    url.into()
}

/// Hotel price scraper for MakeMyTrip listing pages.
pub struct HotelPriceScraper {
    browser: BrowserConfig,
    collector: ConvergenceCollector,
}

impl HotelPriceScraper {
    pub fn new(config: &ScoutConfig) -> Result<Self> {
        Ok(Self {
            browser: config.browser.clone(),
            collector: ConvergenceCollector::new(config.collector.clone())?,
        })
    }

    /// Scrape with a fresh Chrome session.
    pub async fn scrape(&self, params: &SearchParams) -> Result<ScrapeResult> {
        let request = SearchRequest::from_params(params)?;

        info!(
            "🚀 Launching browser for {} ({} hotels)...",
            request.destination_name,
            request.rating_label()
        );
        let page = ChromeSurface::launch(&self.browser).await?;

        self.run(&page, &request).await
    }

    /// Run one scrape on `page` and release it afterwards, whatever the outcome.
    pub async fn run(&self, page: &dyn PageSurface, request: &SearchRequest) -> Result<ScrapeResult> {
        let outcome = self.collect_prices(page, request).await;

        if let Err(e) = page.close().await {
            warn!("Failed to release browser session: {}", e);
        }

        outcome
    }

    async fn collect_prices(&self, page: &dyn PageSurface, request: &SearchRequest) -> Result<ScrapeResult> {
        let url = search_url(request);

        info!("🌐 Navigating to MakeMyTrip homepage...");
        page.navigate(
            &self.browser.home_url,
            WaitCondition::Committed,
            self.browser.navigation_timeout,
        )
        .await?;

        info!("🧹 Closing login popup...");
        if let Err(e) = page.dismiss_overlay().await {
            warn!("Could not dismiss overlay: {}", e);
        }
        time::sleep(self.browser.overlay_settle).await;

        info!("🏨 Navigating to hotel listings page...");
        page.navigate(&url, WaitCondition::Loaded, self.browser.navigation_timeout)
            .await?;

        info!("🔍 Waiting for hotel listings to load...");
        page.wait_for_element(self.collector.card_selector(), self.browser.listings_timeout)
            .await?;

        let collection = self
            .collector
            .collect(page, request.target_sample_size)
            .await?;

        let result = ScrapeResult::from_sample(&collection.prices, collection.rounds, collection.stop_reason);

        info!("✅ Fetched {} prices", result.sample_count);
        info!(
            "📊 Average price of {} hotels in {}: ₹{}",
            request.rating_label(),
            request.destination_name,
            result.rounded_average()
        );

        Ok(result)
    }
}

/// Scrape hotel prices for `params` with a fresh browser session.
pub async fn scrape_hotel_prices(params: &SearchParams, config: &ScoutConfig) -> Result<ScrapeResult> {
    HotelPriceScraper::new(config)?.scrape(params).await
}
