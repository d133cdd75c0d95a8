use crate::error::{Result, ScrapeError};
use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accepted input patterns, tried in order. The first one that parses wins.
///
/// `%B` and `%b` both accept full and abbreviated month names, and numeric
/// fields accept one or two digits, so `27-3-2025` and `27-03-2025` are both
/// matched by the second entry.
const INPUT_FORMATS: [&str; 5] = [
    "%B %d, %Y", // March 27, 2025
    "%d-%m-%Y",  // 27-3-2025
    "%Y/%m/%d",  // 2025/3/27
    "%Y-%m-%d",  // 2025-03-27
    "%d %b %Y",  // 27 Mar 2025
];

/// Canonical token layout expected by the listing URL.
const TOKEN_FORMAT: &str = "%m%d%Y";

/// A normalized calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parses free text against the accepted patterns.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        INPUT_FORMATS
            .iter()
            .filter_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            // chrono happily reads "25" as the year 25; only four-digit years count
            .find(|date| date.year() >= 1000)
            .map(Self)
            .ok_or_else(|| ScrapeError::UnparseableDate {
                input: input.to_string(),
            })
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The following calendar day, rolling over month and year ends.
    pub fn next_day(self) -> Self {
        // Only fails at NaiveDate::MAX, far outside any bookable date.
        Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
    }

    /// `MMDDYYYY`, e.g. `03272025`.
    pub fn token(&self) -> String {
        self.0.format(TOKEN_FORMAT).to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Check-in date: the supplied text, or today when absent.
pub fn resolve_checkin(input: Option<&str>) -> Result<CalendarDate> {
    match input {
        Some(text) => CalendarDate::parse(text),
        None => Ok(CalendarDate::today()),
    }
}

/// Check-out date: the supplied text, or the day after check-in when absent.
pub fn resolve_checkout(input: Option<&str>, checkin: CalendarDate) -> Result<CalendarDate> {
    match input {
        Some(text) => CalendarDate::parse(text),
        None => Ok(checkin.next_day()),
    }
}
