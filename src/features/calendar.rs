//! Calendar features derived from the observation date
//!
//! All values here are pure functions of the date, so they are the only
//! features that can be computed for a forecast day before any sales value
//! is known for it.

use chrono::{Datelike, NaiveDate};

/// Calendar-derived features for a single date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    /// Month number (1-12)
    pub month: u32,
    /// Day of the month (1-31)
    pub day_of_month: u32,
    /// Day of the year (1-366)
    pub day_of_year: u32,
    /// ISO 8601 week number (1-53)
    pub week_of_year: u32,
    /// Day of the week, Monday = 0
    pub day_of_week: u32,
    /// Calendar year
    pub year: i32,
    /// Weekend flag computed as `day_of_week / 4`.
    ///
    /// This flags Friday through Sunday rather than the conventional
    /// Saturday/Sunday. The trained model saw exactly this encoding, so it
    /// must be kept as-is for training parity.
    pub is_wknd: u32,
    /// First day of the month
    pub is_month_start: bool,
    /// Last day of the month
    pub is_month_end: bool,
}

impl CalendarFeatures {
    /// Compute all calendar features for a date
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_monday();
        let is_month_end = match date.succ_opt() {
            Some(next) => next.month() != date.month(),
            None => true,
        };

        Self {
            month: date.month(),
            day_of_month: date.day(),
            day_of_year: date.ordinal(),
            week_of_year: date.iso_week().week(),
            day_of_week,
            year: date.year(),
            is_wknd: day_of_week / 4,
            is_month_start: date.day() == 1,
            is_month_end,
        }
    }
}
