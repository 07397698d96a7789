//! Rotation reconstruction.
//!
//! A duty roster is a flat list of legs. Only departures from and arrivals at
//! a home base delimit a paid mission, so legs are grouped into rotations by
//! a two-state machine walking the chronologically sorted segments.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{FlightSegment, Rotation, collapse_itinerary};

/// State of the rotation builder between two segments.
#[derive(Debug)]
enum RotationState {
    /// Waiting for a departure from a home base.
    Idle,
    /// Accumulating the legs of an open rotation.
    InRotation {
        start_date: NaiveDate,
        itinerary: Vec<String>,
        segments: Vec<FlightSegment>,
    },
}

/// Groups chronologically sorted segments into closed rotations.
///
/// A rotation opens on a departure from a home base and closes on the next
/// arrival at a home base. Legs seen while idle that do not leave from a home
/// base are orphans and belong to no rotation. A rotation still open when the
/// input ends is dropped: the roster was truncated.
///
/// The opening leg never closes its own rotation, even when it lands on a
/// home base (a positioning hop between two bases).
///
/// # Example
///
/// ```
/// use crew_per_diem::calculation::build_rotations;
/// use crew_per_diem::extraction::extract_segments;
/// use crew_per_diem::models::ReportingPeriod;
///
/// let page = "\
/// 1 B77W FGSQA AF006 CDG 05|10.50 JFK 05|13.25
/// 2 B77W FGSQB AF011 JFK 12|22.10 CDG 12|23.45
/// ";
/// let segments = extract_segments(page, ReportingPeriod::new(2024, 6).unwrap(), "ep5.pdf");
/// let bases = vec!["CDG".to_string(), "ORY".to_string()];
/// let rotations = build_rotations(&segments, &bases, 2024);
///
/// assert_eq!(rotations.len(), 1);
/// assert_eq!(rotations[0].duration_days, 8);
/// assert_eq!(rotations[0].itinerary_label(), "CDG → JFK → CDG");
/// ```
pub fn build_rotations(
    segments: &[FlightSegment],
    home_bases: &[String],
    reporting_year: i32,
) -> Vec<Rotation> {
    let is_home_base = |airport: &str| home_bases.iter().any(|base| base == airport);

    let mut rotations = Vec::new();
    let mut state = RotationState::Idle;

    for segment in segments {
        state = match state {
            RotationState::Idle if is_home_base(&segment.departure_airport) => {
                RotationState::InRotation {
                    start_date: segment.departure_date,
                    itinerary: vec![
                        segment.departure_airport.clone(),
                        segment.arrival_airport.clone(),
                    ],
                    segments: vec![segment.clone()],
                }
            }
            RotationState::Idle => {
                debug!(
                    departure = %segment.departure_airport,
                    arrival = %segment.arrival_airport,
                    date = %segment.departure_date,
                    "Orphan segment outside any rotation"
                );
                RotationState::Idle
            }
            RotationState::InRotation {
                start_date,
                mut itinerary,
                mut segments,
            } => {
                itinerary.push(segment.arrival_airport.clone());
                segments.push(segment.clone());

                if is_home_base(&segment.arrival_airport) {
                    rotations.push(close_rotation(
                        start_date,
                        itinerary,
                        segments,
                        reporting_year,
                    ));
                    RotationState::Idle
                } else {
                    RotationState::InRotation {
                        start_date,
                        itinerary,
                        segments,
                    }
                }
            }
        };
    }

    if let RotationState::InRotation {
        start_date,
        segments,
        ..
    } = state
    {
        debug!(
            start = %start_date,
            legs = segments.len(),
            "Dropping rotation that never returned to base"
        );
    }

    rotations
}

fn close_rotation(
    start_date: NaiveDate,
    itinerary: Vec<String>,
    segments: Vec<FlightSegment>,
    reporting_year: i32,
) -> Rotation {
    let return_date = segments
        .last()
        .map(|s| s.arrival_date)
        .unwrap_or(start_date);
    let source_document = segments
        .first()
        .map(|s| s.source_document.clone())
        .unwrap_or_default();

    Rotation {
        departure_date: start_date,
        return_date,
        duration_days: (return_date - start_date).num_days() + 1,
        itinerary: collapse_itinerary(itinerary),
        segments,
        source_document,
        reporting_year,
    }
}
