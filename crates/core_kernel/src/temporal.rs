//! Civil-date helpers for due-date arithmetic
//!
//! Invoice dates are civil dates, not instants: an invoice issued on
//! 2024-01-01 is due a whole number of calendar days later, regardless of
//! timezone or DST. All helpers here operate on [`NaiveDate`] only.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Date arithmetic out of range: {0} + {1} days")]
    OutOfRange(NaiveDate, i64),
}

/// Adds a signed number of calendar days to a civil date.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, TemporalError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(TemporalError::OutOfRange(date, days))
}

/// Signed number of whole calendar days from `from` to `to`.
///
/// Positive when `to` is in the future relative to `from`.
pub fn days_until(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
