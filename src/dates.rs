//! Calendar arithmetic on plain dates.
//!
//! Everything here works on `NaiveDate`, never on wall-clock instants, so month
//! boundaries come out the same regardless of the caller's time zone.

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{LeaseError, Result};
use crate::types::YearMonth;

/// number of days in `month`, or `None` for a month that does not exist
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .filter(|_| (1..=12).contains(&month))
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
}

/// date in `month` on `day`, clamped to the last day of that month
pub fn clamped_day(month: YearMonth, day: u32) -> Result<NaiveDate> {
    let invalid = || LeaseError::InvalidDate {
        message: format!("{}-{:02} does not exist", month, day),
    };
    let last = days_in_month(month.year(), month.month()).ok_or_else(invalid)?;
    NaiveDate::from_ymd_opt(month.year(), month.month(), day.clamp(1, last)).ok_or_else(invalid)
}

/// due date `offset` months after `start`'s month, on `due_day` clamped per month
pub fn due_date_for_offset(start: NaiveDate, offset: u32, due_day: u32) -> Result<NaiveDate> {
    clamped_day(YearMonth::from_date(start).plus_months(offset), due_day)
}

pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date + Duration::days(days as i64)
}

/// whole days from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn period_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
