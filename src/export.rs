//! Tabular exports of an analysis.
//!
//! The rotations table and the aircraft statistics are written as
//! semicolon-delimited UTF-8 files with a byte-order mark, so spreadsheet
//! software in French locales opens them with the right columns and accents.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{AnalysisResult, NOT_AVAILABLE, RotationLine, UsageCount};

/// UTF-8 byte-order mark written at the start of every export.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File name of the aircraft type statistics inside a statistics directory.
pub const AIRCRAFT_TYPES_FILE: &str = "aircraft_types.csv";

/// File name of the registration statistics inside a statistics directory.
pub const REGISTRATIONS_FILE: &str = "registrations.csv";

const DELIMITER: u8 = b';';

const ROTATION_HEADERS: [&str; 8] = [
    "Month",
    "Departure Day",
    "Return Day",
    "Itinerary",
    "Principal Stopover",
    "Daily Rate (EUR)",
    "Days",
    "Total Indemnity (EUR)",
];

/// One row of the exported rotations table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRecord {
    /// Month and year of departure, e.g. `June 2024`.
    #[serde(rename = "Month")]
    pub month: String,
    /// Day of month of departure.
    #[serde(rename = "Departure Day")]
    pub departure_day: u32,
    /// Day of month of return.
    #[serde(rename = "Return Day")]
    pub return_day: u32,
    /// Itinerary joined with arrows.
    #[serde(rename = "Itinerary")]
    pub itinerary: String,
    /// Principal stopover label.
    #[serde(rename = "Principal Stopover")]
    pub principal_stopover: String,
    /// Daily rate with two decimals, or `N/A`.
    #[serde(rename = "Daily Rate (EUR)")]
    pub daily_rate: String,
    /// Duration in days.
    #[serde(rename = "Days")]
    pub days: i64,
    /// Total indemnity with two decimals.
    #[serde(rename = "Total Indemnity (EUR)")]
    pub total_indemnity: String,
}

impl RotationRecord {
    /// The daily rate as a number, `None` for `N/A`.
    pub fn daily_rate_eur(&self) -> Option<Decimal> {
        Decimal::from_str(&self.daily_rate).ok()
    }

    /// The total indemnity as a number.
    pub fn total_indemnity_eur(&self) -> Option<Decimal> {
        Decimal::from_str(&self.total_indemnity).ok()
    }
}

impl From<&RotationLine> for RotationRecord {
    fn from(line: &RotationLine) -> Self {
        let rotation = &line.rotation;
        Self {
            month: rotation.month_label(),
            departure_day: rotation.departure_day(),
            return_day: rotation.return_day(),
            itinerary: rotation.itinerary_label(),
            principal_stopover: line.stopover.label(),
            daily_rate: line
                .daily_rate
                .map(format_amount)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            days: rotation.duration_days,
            total_indemnity: format_amount(line.total_indemnity),
        }
    }
}

/// Formats an amount in EUR with exactly two decimals, rounding half away
/// from zero.
///
/// # Example
///
/// ```
/// use crew_per_diem::export::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(960, 0)), "960.00");
/// assert_eq!(format_amount(Decimal::new(101625, 3)), "101.63");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Writes the rotations table.
///
/// The header row is always written, even for an empty table.
pub fn write_rotations_csv<W: Write>(mut writer: W, lines: &[RotationLine]) -> EngineResult<()> {
    writer.write_all(UTF8_BOM).map_err(export_error)?;

    let mut csv_writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(ROTATION_HEADERS).map_err(export_error)?;
    for line in lines {
        csv_writer
            .serialize(RotationRecord::from(line))
            .map_err(export_error)?;
    }

    csv_writer.flush().map_err(export_error)
}

/// Reads a rotations table written by [`write_rotations_csv`].
pub fn read_rotations_csv<R: Read>(mut reader: R) -> EngineResult<Vec<RotationRecord>> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content).map_err(export_error)?;
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .from_reader(content);

    csv_reader
        .deserialize()
        .collect::<Result<Vec<RotationRecord>, _>>()
        .map_err(export_error)
}

/// Writes one usage table: a key column named `key_header` and a segment count.
pub fn write_usage_csv<W: Write>(
    mut writer: W,
    key_header: &str,
    counts: &[UsageCount],
) -> EngineResult<()> {
    writer.write_all(UTF8_BOM).map_err(export_error)?;

    let mut csv_writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);

    csv_writer
        .write_record([key_header, "Segments"])
        .map_err(export_error)?;
    for count in counts {
        csv_writer
            .write_record([count.key.as_str(), count.segments.to_string().as_str()])
            .map_err(export_error)?;
    }

    csv_writer.flush().map_err(export_error)
}

/// Writes the rotations table of a result to a file.
pub fn write_rotations_file(path: &Path, result: &AnalysisResult) -> EngineResult<()> {
    let file = File::create(path).map_err(export_error)?;
    write_rotations_csv(BufWriter::new(file), &result.rotations)?;
    info!(path = %path.display(), rotations = result.rotations.len(), "Rotations table written");
    Ok(())
}

/// Writes the aircraft type and registration tables into a directory,
/// creating it if needed. Returns the paths written.
pub fn write_statistics_files(dir: &Path, result: &AnalysisResult) -> EngineResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(export_error)?;

    let tables = [
        (AIRCRAFT_TYPES_FILE, "Aircraft Type", &result.aircraft_types),
        (REGISTRATIONS_FILE, "Registration", &result.registrations),
    ];

    let mut written = Vec::with_capacity(tables.len());
    for (file_name, key_header, counts) in tables {
        let path = dir.join(file_name);
        let file = File::create(&path).map_err(export_error)?;
        write_usage_csv(BufWriter::new(file), key_header, counts)?;
        written.push(path);
    }

    info!(dir = %dir.display(), "Aircraft statistics written");
    Ok(written)
}

fn export_error(error: impl std::fmt::Display) -> EngineError {
    EngineError::ExportError {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlightSegment, Rotation, StopoverResolution};
    use chrono::{NaiveDate, NaiveTime};

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn leg(dep: &str, arr: &str, date: &str) -> FlightSegment {
        FlightSegment {
            aircraft_type: "B77W".to_string(),
            registration: "FGSQA".to_string(),
            flight_number: "AF006".to_string(),
            departure_airport: dep.to_string(),
            departure_date: make_date(date),
            departure_time: NaiveTime::MIN,
            arrival_airport: arr.to_string(),
            arrival_date: make_date(date),
            arrival_time: NaiveTime::MIN,
            source_document: "ep5_062024.pdf".to_string(),
        }
    }

    fn line(daily_rate: Option<&str>, total: &str) -> RotationLine {
        RotationLine {
            rotation: Rotation {
                departure_date: make_date("2024-06-05"),
                return_date: make_date("2024-06-12"),
                duration_days: 8,
                itinerary: vec!["CDG".into(), "JFK".into(), "CDG".into()],
                segments: vec![leg("CDG", "JFK", "2024-06-05"), leg("JFK", "CDG", "2024-06-12")],
                source_document: "ep5_062024.pdf".to_string(),
                reporting_year: 2024,
            },
            stopover: StopoverResolution::Resolved {
                airport: "JFK".to_string(),
                label: "New York (US)".to_string(),
                location_code: "NY".to_string(),
            },
            daily_rate: daily_rate.map(dec),
            total_indemnity: dec(total),
        }
    }

    #[test]
    fn test_rotations_table_layout() {
        let mut buffer = Vec::new();
        write_rotations_csv(&mut buffer, &[line(Some("120"), "960")]).unwrap();

        assert!(buffer.starts_with(UTF8_BOM));
        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut rows = text.lines();
        assert_eq!(
            rows.next(),
            Some(
                "Month;Departure Day;Return Day;Itinerary;Principal Stopover;\
                 Daily Rate (EUR);Days;Total Indemnity (EUR)"
            )
        );
        assert_eq!(
            rows.next(),
            Some("June 2024;5;12;CDG → JFK → CDG;New York (US);120.00;8;960.00")
        );
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn test_missing_rate_is_not_available() {
        let record = RotationRecord::from(&line(None, "0"));
        assert_eq!(record.daily_rate, "N/A");
        assert_eq!(record.daily_rate_eur(), None);
        assert_eq!(record.total_indemnity, "0.00");
    }

    #[test]
    fn test_rotations_read_back_at_two_decimals() {
        let lines = vec![line(Some("101.625"), "813.00"), line(None, "0")];
        let mut buffer = Vec::new();
        write_rotations_csv(&mut buffer, &lines).unwrap();

        let records = read_rotations_csv(buffer.as_slice()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], RotationRecord::from(&lines[0]));
        assert_eq!(records[0].daily_rate_eur(), Some(dec("101.63")));
        assert_eq!(records[0].total_indemnity_eur(), Some(dec("813.00")));
        assert_eq!(records[1].daily_rate_eur(), None);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let mut buffer = Vec::new();
        write_rotations_csv(&mut buffer, &[]).unwrap();

        assert!(read_rotations_csv(buffer.as_slice()).unwrap().is_empty());
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Total Indemnity (EUR)"));
    }

    #[test]
    fn test_usage_table() {
        let counts = vec![
            UsageCount { key: "A320".to_string(), segments: 12 },
            UsageCount { key: "B77W".to_string(), segments: 4 },
        ];
        let mut buffer = Vec::new();
        write_usage_csv(&mut buffer, "Aircraft Type", &counts).unwrap();

        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "Aircraft Type;Segments\nA320;12\nB77W;4\n");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(dec("0.005")), "0.01");
        assert_eq!(format_amount(dec("115.96")), "115.96");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }
}
