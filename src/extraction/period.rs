//! Reporting period inference.
//!
//! Duty reports are named after the month they cover (`ep5_062024.pdf`,
//! `EP5-0624.pdf`). When the name carries no usable month, the report text
//! is searched for a `MM/YYYY` mention instead.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ReportingPeriod;

/// A run of digits long enough to hold `MMYY`.
static FILE_NAME_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4,}").expect("file name pattern is valid"));

/// `MM/YYYY`, `MM-YYYY` or `MM.YYYY` inside report text.
static TEXT_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(0?[1-9]|1[0-2])[/.-](\d{4})\b").expect("text period pattern is valid")
});

/// Years outside this range are treated as misreads.
const MIN_REPORTING_YEAR: i32 = 1991;
const MAX_REPORTING_YEAR: i32 = 2099;

/// Infers the reporting period from a document's file name.
///
/// Each run of digits is read from its end: the last six digits as `MMYYYY`,
/// then the last four as `MMYY`, so a prefix such as a day (`15062024`) is
/// ignored. Runs are tried left to right; the first one giving a month
/// between 1 and 12 and a plausible year wins. Two-digit years are read as
/// `20YY`.
///
/// # Example
///
/// ```
/// use crew_per_diem::extraction::period_from_file_name;
/// use crew_per_diem::models::ReportingPeriod;
///
/// assert_eq!(period_from_file_name("EP5_062024.pdf"), ReportingPeriod::new(2024, 6));
/// assert_eq!(period_from_file_name("ep5-1123.pdf"), ReportingPeriod::new(2023, 11));
/// assert_eq!(period_from_file_name("roster.pdf"), None);
/// ```
pub fn period_from_file_name(file_name: &str) -> Option<ReportingPeriod> {
    FILE_NAME_DIGITS
        .find_iter(file_name)
        .find_map(|run| period_from_digits(run.as_str()))
}

/// Searches report text for a `MM/YYYY` mention.
pub fn period_from_text(text: &str) -> Option<ReportingPeriod> {
    TEXT_PERIOD.captures_iter(text).find_map(|captures| {
        let month: u32 = captures.get(1)?.as_str().parse().ok()?;
        let year: i32 = captures.get(2)?.as_str().parse().ok()?;
        plausible_period(year, month)
    })
}

/// Infers the reporting period from the file name, falling back to the
/// text of the report's pages.
pub fn infer_reporting_period<S: AsRef<str>>(
    file_name: &str,
    pages: &[S],
) -> Option<ReportingPeriod> {
    period_from_file_name(file_name)
        .or_else(|| pages.iter().find_map(|page| period_from_text(page.as_ref())))
}

fn period_from_digits(digits: &str) -> Option<ReportingPeriod> {
    [6, 4].into_iter().find_map(|width| {
        let candidate = digits.get(digits.len().checked_sub(width)?..)?;
        let (month, year_digits) = candidate.split_at(2);
        let month: u32 = month.parse().ok()?;
        let year: i32 = year_digits.parse().ok()?;
        let year = if year_digits.len() == 2 { 2000 + year } else { year };
        plausible_period(year, month)
    })
}

fn plausible_period(year: i32, month: u32) -> Option<ReportingPeriod> {
    if !(MIN_REPORTING_YEAR..=MAX_REPORTING_YEAR).contains(&year) {
        return None;
    }
    ReportingPeriod::new(year, month)
}
