//! Day-of-month to calendar date resolution.
//!
//! Duty reports only print the day of the month. This module turns such a
//! day into a full date using the report's reporting period, and detects
//! legs that land in the following month.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::ReportingPeriod;

/// Resolves a bare day-of-month into a calendar date.
///
/// Without an anchor the day is combined with the reporting period. With an
/// anchor (the departure date of the same leg, used for its arrival day) the
/// anchor's month is used instead, and a day smaller than the anchor's day
/// means the leg crossed into the next month.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDate`] when the day is not a number or the
/// resulting date does not exist (e.g. 30 February).
///
/// # Example
///
/// ```
/// use crew_per_diem::extraction::resolve_day;
/// use crew_per_diem::models::ReportingPeriod;
/// use chrono::NaiveDate;
///
/// let june = ReportingPeriod::new(2024, 6).unwrap();
/// let departure = resolve_day("29", june, None).unwrap();
/// let arrival = resolve_day("02", june, Some(departure)).unwrap();
/// assert_eq!(arrival, NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
/// ```
pub fn resolve_day(
    day: &str,
    period: ReportingPeriod,
    anchor: Option<NaiveDate>,
) -> EngineResult<NaiveDate> {
    let day: u32 = day.trim().parse().map_err(|_| EngineError::InvalidDate {
        year: period.year,
        month: period.month,
        day: 0,
    })?;

    let (year, month) = match anchor {
        None => (period.year, period.month),
        Some(anchor) if day < anchor.day() => next_month(anchor.year(), anchor.month()),
        Some(anchor) => (anchor.year(), anchor.month()),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or(EngineError::InvalidDate { year, month, day })
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
