//! Common utility functions

use chrono::{Datelike, Local, Months, NaiveDate};

/// Date format embedded in an identity number (8 chars: YYYYMMDD)
pub const SHORT_DATE_FORMAT: &str = "%Y%m%d";

/// Get the current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as YYYYMMDD
pub fn format_short_date(date: &NaiveDate) -> String {
    date.format(SHORT_DATE_FORMAT).to_string()
}

/// Parse short date (YYYYMMDD) to NaiveDate
pub fn parse_short_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Same calendar day `years` years earlier; Feb 29 clamps to Feb 28
pub fn years_before(date: &NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(years.checked_mul(12)?))
}

/// Full years elapsed between `birth` and `on`, zero if `on` precedes `birth`
pub fn age_on(birth: &NaiveDate, on: &NaiveDate) -> u32 {
    if on < birth {
        return 0;
    }
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// Remove every whitespace character from a string
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
