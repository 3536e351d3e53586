//! Rent-agreement date arithmetic.

use chrono::{Months, NaiveDate};

/// Date format used by agreement forms (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest agreement term accepted, in months.
pub const MAX_DURATION_MONTHS: u32 = 36;

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// End of the agreement term: `start` plus `months` calendar months.
///
/// Days past the end of the target month clamp to its last day (Jan 31 + 1 = Feb 28).
pub fn agreement_end_date(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))
}

/// Display conversion for lock-in and notice periods entered in days.
pub fn days_to_months(days: u32) -> u32 {
    days / 30
}
