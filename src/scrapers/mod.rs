pub mod browser;
pub mod collector;
pub mod extract;
pub mod makemytrip;
#[cfg(test)]
pub mod mock;
pub mod traits;
pub mod types;

pub use makemytrip::scrape_hotel_prices;
