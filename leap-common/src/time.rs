//! Timestamp and calendar-date utilities

use chrono::{DateTime, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Get current UTC calendar date
///
/// Streak accounting works at calendar-day granularity; all services use the
/// UTC date so two replicas never disagree about "today".
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse an ISO calendar date (`YYYY-MM-DD`)
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Format a calendar date as ISO (`YYYY-MM-DD`)
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
