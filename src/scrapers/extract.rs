use scraper::{Html, Selector};
use tracing::debug;

/// Selectors locating listing cards and the price inside each card.
#[derive(Debug, Clone)]
pub struct PriceSelectors {
    cards: Selector,
    price: Selector,
}

impl PriceSelectors {
    pub fn new(card_selector: &str, price_selector: &str) -> Option<Self> {
        Some(Self {
            cards: Selector::parse(card_selector).ok()?,
            price: Selector::parse(price_selector).ok()?,
        })
    }
}

/// Pulls one price per listing card, in document order.
///
/// A card without a price element, or whose price text holds no digits,
/// is left out of the sample.
pub fn prices_from_html(html: &str, selectors: &PriceSelectors) -> Vec<u64> {
    let document = Html::parse_document(html);

    let mut prices = Vec::new();
    let mut skipped = 0usize;

    for card in document.select(&selectors.cards) {
        let price = card
            .select(&selectors.price)
            .next()
            .and_then(|el| parse_price(&el.text().collect::<String>()));

        match price {
            Some(price) => prices.push(price),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} listing cards without a parseable price", skipped);
    }

    prices
}

/// "₹ 4,599" -> 4599. Currency symbols, separators and spaces are dropped.
pub fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|price| *price > 0)
}
