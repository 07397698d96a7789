//! Flight segment model.
//!
//! This module defines the [`FlightSegment`] struct, one directional leg read
//! from a single line of a flight-duty report.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Represents one flight leg of a duty roster.
///
/// Segments are created by the segment extractor and never mutated afterwards.
///
/// # Example
///
/// ```
/// use crew_per_diem::models::FlightSegment;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let segment = FlightSegment {
///     aircraft_type: "B77W".to_string(),
///     registration: "FGSQA".to_string(),
///     flight_number: "AF006".to_string(),
///     departure_airport: "CDG".to_string(),
///     departure_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
///     departure_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
///     arrival_airport: "JFK".to_string(),
///     arrival_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
///     arrival_time: NaiveTime::from_hms_opt(18, 45, 0).unwrap(),
///     source_document: "ep5_062024.pdf".to_string(),
/// };
/// assert!(!segment.is_overnight());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    /// The aircraft type designator (e.g., "B77W").
    pub aircraft_type: String,
    /// The aircraft registration (e.g., "FGSQA").
    pub registration: String,
    /// The flight number as printed on the report.
    pub flight_number: String,
    /// Three-letter departure airport code.
    pub departure_airport: String,
    /// Calendar date of departure.
    pub departure_date: NaiveDate,
    /// Time of day of departure.
    pub departure_time: NaiveTime,
    /// Three-letter arrival airport code.
    pub arrival_airport: String,
    /// Calendar date of arrival (never before the departure date).
    pub arrival_date: NaiveDate,
    /// Time of day of arrival.
    pub arrival_time: NaiveTime,
    /// Display name of the document this segment was read from.
    pub source_document: String,
}

impl FlightSegment {
    /// Returns true when the leg lands on a later calendar day than it left.
    pub fn is_overnight(&self) -> bool {
        self.arrival_date > self.departure_date
    }

    /// Sort key used to put segments in chronological order.
    pub fn chronological_key(&self) -> (NaiveDate, NaiveTime) {
        (self.departure_date, self.departure_time)
    }
}

/// Sorts segments by departure date, then departure time.
///
/// The sort is stable, so legs sharing a departure instant keep their
/// report order.
pub fn sort_segments(segments: &mut [FlightSegment]) {
    segments.sort_by_key(FlightSegment::chronological_key);
}
