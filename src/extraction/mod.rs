//! Text extraction for flight-duty reports.
//!
//! This module turns documents into flight segments: per-page text through a
//! [`PageTextSource`], reporting-period inference from file names, day-of-month
//! resolution with month rollover, and line-by-line segment extraction.

mod date_resolver;
mod page_source;
mod period;
mod segment_extractor;

pub use date_resolver::resolve_day;
pub use page_source::{
    AutoPageSource, PAGE_BREAK, PageTextSource, PdfPageSource, PlainTextPageSource,
    SourceDocument,
};
pub use period::{infer_reporting_period, period_from_file_name, period_from_text};
pub use segment_extractor::{extract_segments, is_duty_report_page, parse_duty_time};
