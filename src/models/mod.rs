use crate::dates::{self, CalendarDate};
use crate::error::{Result, ScrapeError};
use crate::scrapers::types::SearchParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hotel star rating used as a listing filter (1 to 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl TryFrom<u8> for StarRating {
    type Error = ScrapeError;

    fn try_from(value: u8) -> Result<Self> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScrapeError::InvalidRequest {
                reason: format!("star rating must be between 1 and 5, got {value}"),
            })
        }
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated search, fixed for the lifetime of one scrape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub destination_name: String,
    pub destination_code: String,
    pub checkin: CalendarDate,
    pub checkout: CalendarDate,
    pub star_rating: Option<StarRating>,
    pub target_sample_size: usize,
}

impl SearchRequest {
    /// Normalizes dates, applies defaults and checks the request invariants.
    pub fn from_params(params: &SearchParams) -> Result<Self> {
        let checkin = dates::resolve_checkin(params.checkin.as_deref())?;
        let checkout = dates::resolve_checkout(params.checkout.as_deref(), checkin)?;

        if checkout <= checkin {
            return Err(ScrapeError::InvalidRequest {
                reason: format!("checkout {checkout} must be after checkin {checkin}"),
            });
        }

        if params.target_sample_size == 0 {
            return Err(ScrapeError::InvalidRequest {
                reason: "target sample size must be positive".to_string(),
            });
        }

        let star_rating = params.star_rating.map(StarRating::try_from).transpose()?;

        Ok(Self {
            destination_name: params.destination_name.clone(),
            destination_code: params.destination_code.clone(),
            checkin,
            checkout,
            star_rating,
            target_sample_size: params.target_sample_size,
        })
    }

    /// Label used in progress logs, e.g. "3-star" or "all".
    pub fn rating_label(&self) -> String {
        match self.star_rating {
            Some(rating) => format!("{rating}-star"),
            None => "all".to_string(),
        }
    }
}

/// Why the collection loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TargetReached,
    Stagnated,
    TimeBudgetExhausted,
}

/// Summary of one scrape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeResult {
    pub sample_count: usize,
    pub average_price: f64,
    pub rounds: usize,
    pub stop_reason: StopReason,
}

impl ScrapeResult {
    pub fn from_sample(sample: &[u64], rounds: usize, stop_reason: StopReason) -> Self {
        Self {
            sample_count: sample.len(),
            average_price: average(sample),
            rounds,
            stop_reason,
        }
    }

    /// Average rounded to whole currency units for display.
    pub fn rounded_average(&self) -> u64 {
        self.average_price.round() as u64
    }
}

/// Arithmetic mean, 0 for an empty sample.
pub fn average(sample: &[u64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let total: u64 = sample.iter().sum();
    total as f64 / sample.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams {
            destination_name: "Pune".to_string(),
            destination_code: "CTPUN".to_string(),
            checkin: Some("March 27, 2025".to_string()),
            checkout: Some("March 28, 2025".to_string()),
            star_rating: Some(3),
            target_sample_size: 50,
        }
    }

    #[test]
    fn average_of_sample() {
        assert_eq!(average(&[100, 200, 300]), 200.0);
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn rounded_average_rounds_half_up() {
        let result = ScrapeResult::from_sample(&[1000, 1001], 2, StopReason::Stagnated);
        assert_eq!(result.average_price, 1000.5);
        assert_eq!(result.rounded_average(), 1001);
    }

    #[test]
    fn request_from_full_params() {
        let request = SearchRequest::from_params(&params()).unwrap();
        assert_eq!(request.checkin.token(), "03272025");
        assert_eq!(request.checkout.token(), "03282025");
        assert_eq!(request.star_rating.map(u8::from), Some(3));
        assert_eq!(request.rating_label(), "3-star");
    }

    #[test]
    fn missing_checkout_is_the_next_day() {
        let mut p = params();
        p.checkin = Some("2025-12-31".to_string());
        p.checkout = None;
        let request = SearchRequest::from_params(&p).unwrap();
        assert_eq!(request.checkout.token(), "01012026");
    }

    #[test]
    fn checkout_must_follow_checkin() {
        let mut p = params();
        p.checkout = Some("March 27, 2025".to_string());
        assert!(matches!(
            SearchRequest::from_params(&p),
            Err(ScrapeError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn unparseable_dates_surface_to_the_caller() {
        let mut p = params();
        p.checkin = Some("27/03/25".to_string());
        assert!(matches!(
            SearchRequest::from_params(&p),
            Err(ScrapeError::UnparseableDate { .. })
        ));
    }

    #[test]
    fn star_rating_is_bounded() {
        let mut p = params();
        p.star_rating = Some(6);
        assert!(SearchRequest::from_params(&p).is_err());

        p.star_rating = None;
        let request = SearchRequest::from_params(&p).unwrap();
        assert_eq!(request.rating_label(), "all");
    }

    #[test]
    fn zero_target_is_rejected() {
        let mut p = params();
        p.target_sample_size = 0;
        assert!(SearchRequest::from_params(&p).is_err());
    }
}
