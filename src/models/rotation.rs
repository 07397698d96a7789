//! Rotation model.
//!
//! A rotation is a closed loop of flight segments that leaves a home base and
//! comes back to one. It is the unit the per-diem indemnity is paid on.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::FlightSegment;

/// Separator used when rendering an itinerary for display.
pub const ITINERARY_SEPARATOR: &str = " → ";

/// A closed sequence of segments beginning and ending at a home base.
///
/// Created by the rotation builder; never mutated afterwards. Duplicates read
/// from several documents are discarded by the report assembler rather than
/// merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    /// Departure date of the first segment.
    pub departure_date: NaiveDate,
    /// Arrival date of the last segment.
    pub return_date: NaiveDate,
    /// Inclusive length in days (`return - departure + 1`).
    pub duration_days: i64,
    /// Airport codes visited, consecutive duplicates collapsed.
    pub itinerary: Vec<String>,
    /// The segments making up the rotation, in flight order.
    pub segments: Vec<FlightSegment>,
    /// Display name of the document the rotation was read from.
    pub source_document: String,
    /// The reporting year of the source document.
    pub reporting_year: i32,
}

/// Identity of a rotation across documents.
///
/// Two rotations with the same key are the same mission reported twice.
pub type RotationKey = (NaiveDate, NaiveDate, String, String);

impl Rotation {
    /// The home base the rotation left from.
    pub fn departure_airport(&self) -> &str {
        self.segments
            .first()
            .map(|s| s.departure_airport.as_str())
            .unwrap_or_default()
    }

    /// The home base the rotation returned to.
    pub fn arrival_airport(&self) -> &str {
        self.segments
            .last()
            .map(|s| s.arrival_airport.as_str())
            .unwrap_or_default()
    }

    /// Deduplication key: dates plus the departure and arrival airports.
    pub fn key(&self) -> RotationKey {
        (
            self.departure_date,
            self.return_date,
            self.departure_airport().to_string(),
            self.arrival_airport().to_string(),
        )
    }

    /// The itinerary joined with arrows, e.g. `CDG → JFK → CDG`.
    pub fn itinerary_label(&self) -> String {
        if self.itinerary.is_empty() {
            return "N/A".to_string();
        }
        self.itinerary.join(ITINERARY_SEPARATOR)
    }

    /// Month and year of departure, e.g. `June 2024`.
    pub fn month_label(&self) -> String {
        self.departure_date.format("%B %Y").to_string()
    }

    /// Day of month the rotation started.
    pub fn departure_day(&self) -> u32 {
        self.departure_date.day()
    }

    /// Day of month the rotation ended.
    pub fn return_day(&self) -> u32 {
        self.return_date.day()
    }
}

/// Collapses consecutive duplicate airport codes.
///
/// Non-consecutive repeats are kept: `CDG, JFK, JFK, LAX, JFK, CDG` becomes
/// `CDG, JFK, LAX, JFK, CDG`.
pub fn collapse_itinerary(airports: Vec<String>) -> Vec<String> {
    let mut collapsed = airports;
    collapsed.dedup();
    collapsed
}
