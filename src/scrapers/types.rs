use serde::{Deserialize, Serialize};

/// Search parameters for a hotel price scrape, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Destination as shown in the search box, e.g. "Pune"
    pub destination_name: String,
    /// Site city code, e.g. "CTPUN"
    pub destination_code: String,
    /// Check-in date in any accepted format; today when absent
    pub checkin: Option<String>,
    /// Check-out date in any accepted format; the day after check-in when absent
    pub checkout: Option<String>,
    /// Only list hotels with this star rating (1-5)
    pub star_rating: Option<u8>,
    /// Stop once this many prices are visible
    pub target_sample_size: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            destination_name: "Pune".to_string(),
            destination_code: "CTPUN".to_string(),
            checkin: None,
            checkout: None,
            star_rating: None,
            target_sample_size: 50,
        }
    }
}
