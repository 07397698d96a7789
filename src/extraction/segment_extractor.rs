//! Flight segment extraction from duty report text.
//!
//! A duty report page is mostly headers, totals and unrelated rows. Only the
//! lines laid out as a flight record are turned into [`FlightSegment`]s;
//! everything else is skipped without complaint.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::{Captures, Regex};
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{FlightSegment, ReportingPeriod};

use super::date_resolver::resolve_day;

/// One flight record:
/// `index type registration flight DEP day|time ARR day|time`.
static SEGMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*\d+\s+",
        r"([A-Z0-9-]+)\s+",
        r"([A-Z0-9]+)\s+",
        r"([A-Z0-9]+)\s+",
        r"([A-Z]{3})\s+",
        r"(\d{1,2})(?:\s*\|\s*|\s+)(\d{1,2}(?:\.\d{2,3})?)\s+",
        r"([A-Z]{3})\s+",
        r"(\d{1,2})(?:\s*\|\s*|\s+)(\d{1,2}(?:\.\d{2,3})?)",
    ))
    .expect("segment line pattern is valid")
});

/// Fraction digits considered when converting a duty time.
const MAX_FRACTION_DIGITS: usize = 3;

/// Extracts every flight segment printed on a page.
///
/// Lines that do not look like a flight record are ignored. A record whose
/// day does not exist in the resolved month is discarded on its own; the
/// rest of the page is still read. The output follows page order, not
/// chronological order.
///
/// # Example
///
/// ```
/// use crew_per_diem::extraction::extract_segments;
/// use crew_per_diem::models::ReportingPeriod;
///
/// let page = "EP5 JUIN 2024\n1 B77W FGSQA AF006 CDG 05|10.50 JFK 05|13.25\n";
/// let segments = extract_segments(page, ReportingPeriod::new(2024, 6).unwrap(), "ep5.pdf");
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].arrival_airport, "JFK");
/// ```
pub fn extract_segments(
    page_text: &str,
    period: ReportingPeriod,
    source_document: &str,
) -> Vec<FlightSegment> {
    let mut segments = Vec::new();

    for (line_idx, line) in page_text.lines().enumerate() {
        let Some(captures) = SEGMENT_LINE.captures(line.trim()) else {
            continue;
        };

        match parse_segment(&captures, period, source_document) {
            Ok(segment) => segments.push(segment),
            Err(e) => debug!(
                document = source_document,
                line = line_idx + 1,
                error = %e,
                "Discarding flight record"
            ),
        }
    }

    segments
}

fn parse_segment(
    captures: &Captures<'_>,
    period: ReportingPeriod,
    source_document: &str,
) -> EngineResult<FlightSegment> {
    let group = |idx: usize| captures.get(idx).map(|m| m.as_str()).unwrap_or_default();

    let departure_date = resolve_day(group(5), period, None)?;
    let arrival_date = resolve_day(group(8), period, Some(departure_date))?;

    Ok(FlightSegment {
        aircraft_type: group(1).to_string(),
        registration: group(2).to_string(),
        flight_number: group(3).to_string(),
        departure_airport: group(4).to_string(),
        departure_date,
        departure_time: parse_duty_time(group(6)).unwrap_or(NaiveTime::MIN),
        arrival_airport: group(7).to_string(),
        arrival_date,
        arrival_time: parse_duty_time(group(9)).unwrap_or(NaiveTime::MIN),
        source_document: source_document.to_string(),
    })
}

/// Converts a duty-report time into a time of day.
///
/// Reports print times as hours with an optional decimal fraction of an
/// hour: `9.53` is nine hours plus 0.53 of an hour, i.e. 09:32. Minutes are
/// rounded to the nearest whole minute and capped at 59. Only the first three
/// fraction digits are read.
///
/// Returns `None` when the hour is not a number or is 24 or more.
///
/// # Example
///
/// ```
/// use crew_per_diem::extraction::parse_duty_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_duty_time("9.53"), NaiveTime::from_hms_opt(9, 32, 0));
/// assert_eq!(parse_duty_time("14"), NaiveTime::from_hms_opt(14, 0, 0));
/// ```
pub fn parse_duty_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let (hour, fraction) = match raw.split_once('.') {
        Some((hour, fraction)) => (hour, fraction),
        None => (raw, ""),
    };

    let hour: u32 = hour.parse().ok()?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];

    let minute = if fraction.is_empty() {
        0
    } else {
        let digits: u32 = fraction.parse().ok()?;
        let scale = 10u32.pow(fraction.len() as u32);
        ((digits * 60 + scale / 2) / scale).min(59)
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Whether a page belongs to a flight-duty report.
///
/// The comparison ignores case.
pub fn is_duty_report_page(page_text: &str, marker: &str) -> bool {
    page_text
        .to_uppercase()
        .contains(&marker.to_uppercase())
}
