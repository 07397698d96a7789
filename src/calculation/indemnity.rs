//! Per-diem indemnity for one rotation.
//!
//! The indemnity is paid at the rate of the rotation's principal stopover,
//! the first place visited outside the home bases, for every day of the
//! rotation.

use rust_decimal::Decimal;

use crate::config::{AirportDirectory, PerDiemSchedule};
use crate::models::{Rotation, RotationLine, StopoverResolution};

/// The indemnity computed for a rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationIndemnity {
    /// The principal stopover and how it was resolved.
    pub stopover: StopoverResolution,
    /// The daily rate in EUR, when one applies.
    pub daily_rate: Option<Decimal>,
    /// Daily rate times duration, zero when no rate applies.
    pub total: Decimal,
    /// The year's schedule was loaded but holds no rate for the stopover's
    /// location on the departure date.
    pub rate_missing: bool,
}

impl RotationIndemnity {
    /// Attaches the indemnity to its rotation as a table line.
    pub fn into_line(self, rotation: Rotation) -> RotationLine {
        RotationLine {
            rotation,
            stopover: self.stopover,
            daily_rate: self.daily_rate,
            total_indemnity: self.total,
        }
    }
}

/// The first airport of the itinerary that is not a home base.
///
/// An opening hop between two bases (ORY to CDG before a long-haul) is
/// skipped this way. `None` when the rotation never leaves the home bases.
pub fn principal_stopover<'a>(rotation: &'a Rotation, home_bases: &[String]) -> Option<&'a str> {
    rotation
        .itinerary
        .iter()
        .map(String::as_str)
        .find(|airport| !home_bases.iter().any(|base| base == airport))
}

/// Looks a stopover up in the airport directory.
pub fn resolve_stopover(airport: &str, directory: &AirportDirectory) -> StopoverResolution {
    match directory.get(airport) {
        Some(info) => StopoverResolution::Resolved {
            airport: airport.to_string(),
            label: info.display_label(),
            location_code: info.location_code().to_string(),
        },
        None => StopoverResolution::UnknownAirport {
            airport: airport.to_string(),
        },
    }
}

/// Computes the indemnity owed for a rotation.
///
/// The rate is the one in force on the departure date for the stopover's
/// location. Without a schedule for the rotation's year, a known stopover or
/// an applicable rate, the indemnity is zero. This never fails: missing data
/// is reported by the caller as warnings.
///
/// # Example
///
/// ```
/// use crew_per_diem::calculation::{build_rotations, calculate_indemnity};
/// use crew_per_diem::config::AirportDirectory;
/// use crew_per_diem::extraction::extract_segments;
/// use crew_per_diem::models::{ReportingPeriod, StopoverResolution};
///
/// let page = "\
/// 1 B77W FGSQA AF006 CDG 05|10.50 JFK 05|13.25
/// 2 B77W FGSQB AF011 JFK 12|22.10 CDG 12|23.45
/// ";
/// let segments = extract_segments(page, ReportingPeriod::new(2024, 6).unwrap(), "ep5.pdf");
/// let bases = vec!["CDG".to_string(), "ORY".to_string()];
/// let rotation = &build_rotations(&segments, &bases, 2024)[0];
///
/// let indemnity = calculate_indemnity(rotation, &AirportDirectory::default(), None, &bases);
/// assert_eq!(
///     indemnity.stopover,
///     StopoverResolution::UnknownAirport { airport: "JFK".to_string() }
/// );
/// assert!(indemnity.total.is_zero());
/// ```
pub fn calculate_indemnity(
    rotation: &Rotation,
    directory: &AirportDirectory,
    schedule: Option<&PerDiemSchedule>,
    home_bases: &[String],
) -> RotationIndemnity {
    let stopover = match principal_stopover(rotation, home_bases) {
        Some(airport) => resolve_stopover(airport, directory),
        None => StopoverResolution::NoForeignStopover,
    };

    let (daily_rate, rate_missing) = match (stopover.location_code(), schedule) {
        (Some(code), Some(schedule)) => {
            let rate = schedule
                .resolve(code, rotation.departure_date)
                .map(|entry| entry.amount_eur);
            (rate, rate.is_none())
        }
        _ => (None, false),
    };

    let total = daily_rate
        .map(|rate| rate * Decimal::from(rotation.duration_days))
        .unwrap_or(Decimal::ZERO);

    RotationIndemnity {
        stopover,
        daily_rate,
        total,
        rate_missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AirportInfo, FlightSegment, PerDiemEntry};
    use chrono::{Datelike, NaiveDate, NaiveTime};
    use std::collections::HashMap;
    use std::str::FromStr;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bases() -> Vec<String> {
        vec!["CDG".to_string(), "ORY".to_string()]
    }

    fn make_rotation(itinerary: &[&str], departure: &str, ret: &str) -> Rotation {
        let departure_date = make_date(departure);
        let return_date = make_date(ret);
        let segments = itinerary
            .windows(2)
            .map(|pair| FlightSegment {
                aircraft_type: "B77W".to_string(),
                registration: "FGSQA".to_string(),
                flight_number: "AF000".to_string(),
                departure_airport: pair[0].to_string(),
                departure_date,
                departure_time: NaiveTime::MIN,
                arrival_airport: pair[1].to_string(),
                arrival_date: return_date,
                arrival_time: NaiveTime::MIN,
                source_document: "ep5_062024.pdf".to_string(),
            })
            .collect();

        Rotation {
            departure_date,
            return_date,
            duration_days: (return_date - departure_date).num_days() + 1,
            itinerary: itinerary.iter().map(|s| s.to_string()).collect(),
            segments,
            source_document: "ep5_062024.pdf".to_string(),
            reporting_year: departure_date.year(),
        }
    }

    fn directory() -> AirportDirectory {
        let mut directory = AirportDirectory::default();
        directory.insert(
            "NRT",
            AirportInfo {
                city: "Tokyo".to_string(),
                country: "JP".to_string(),
                name: "Narita International Airport".to_string(),
                location_override: Some("TY".to_string()),
            },
        );
        directory.insert(
            "FRA",
            AirportInfo {
                city: "Frankfurt am Main".to_string(),
                country: "DE".to_string(),
                name: "Frankfurt am Main Airport".to_string(),
                location_override: None,
            },
        );
        directory.insert(
            "YUL",
            AirportInfo {
                city: "Montreal".to_string(),
                country: "CA".to_string(),
                name: "Montreal Airport".to_string(),
                location_override: None,
            },
        );
        directory
    }

    fn schedule() -> PerDiemSchedule {
        let entry = |date: &str, amount: &str| PerDiemEntry {
            effective_date: make_date(date),
            currency: None,
            amount_eur: dec(amount),
        };
        let mut rates = HashMap::new();
        rates.insert("TY".to_string(), vec![entry("2024-01-01", "115.96")]);
        rates.insert("JP".to_string(), vec![entry("2024-01-01", "97.65")]);
        rates.insert("DE".to_string(), vec![entry("2023-01-01", "59.00")]);
        PerDiemSchedule::new(2024, rates)
    }

    #[test]
    fn test_city_override_rate_is_used() {
        let rotation = make_rotation(&["CDG", "NRT", "CDG"], "2024-06-05", "2024-06-08");

        let indemnity = calculate_indemnity(&rotation, &directory(), Some(&schedule()), &bases());

        assert_eq!(
            indemnity.stopover,
            StopoverResolution::Resolved {
                airport: "NRT".to_string(),
                label: "Tokyo (JP)".to_string(),
                location_code: "TY".to_string(),
            }
        );
        assert_eq!(indemnity.daily_rate, Some(dec("115.96")));
        assert_eq!(indemnity.total, dec("463.84"));
        assert!(!indemnity.rate_missing);
    }

    #[test]
    fn test_positioning_hop_is_skipped() {
        let rotation = make_rotation(&["CDG", "ORY", "FRA", "CDG"], "2024-06-10", "2024-06-11");

        assert_eq!(principal_stopover(&rotation, &bases()), Some("FRA"));

        let indemnity = calculate_indemnity(&rotation, &directory(), Some(&schedule()), &bases());
        assert_eq!(indemnity.daily_rate, Some(dec("59.00")));
        assert_eq!(indemnity.total, dec("118.00"));
    }

    #[test]
    fn test_no_foreign_stopover() {
        let rotation = make_rotation(&["ORY", "CDG"], "2024-06-10", "2024-06-10");

        let indemnity = calculate_indemnity(&rotation, &directory(), Some(&schedule()), &bases());

        assert_eq!(indemnity.stopover, StopoverResolution::NoForeignStopover);
        assert_eq!(indemnity.daily_rate, None);
        assert_eq!(indemnity.total, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_airport_yields_zero() {
        let rotation = make_rotation(&["CDG", "XXX", "CDG"], "2024-06-10", "2024-06-12");

        let indemnity = calculate_indemnity(&rotation, &directory(), Some(&schedule()), &bases());

        assert_eq!(indemnity.stopover.label(), "XXX (info not available)");
        assert_eq!(indemnity.total, Decimal::ZERO);
    }

    #[test]
    fn test_location_without_rate_yields_zero() {
        let rotation = make_rotation(&["CDG", "YUL", "CDG"], "2024-06-10", "2024-06-12");

        let indemnity = calculate_indemnity(&rotation, &directory(), Some(&schedule()), &bases());

        assert_eq!(indemnity.stopover.location_code(), Some("CA"));
        assert_eq!(indemnity.daily_rate, None);
        assert_eq!(indemnity.total, Decimal::ZERO);
        assert!(indemnity.rate_missing);
    }

    #[test]
    fn test_missing_schedule_keeps_stopover() {
        let rotation = make_rotation(&["CDG", "NRT", "CDG"], "2024-06-05", "2024-06-08");

        let indemnity = calculate_indemnity(&rotation, &directory(), None, &bases());

        assert_eq!(indemnity.stopover.label(), "Tokyo (JP)");
        assert_eq!(indemnity.daily_rate, None);
        assert_eq!(indemnity.total, Decimal::ZERO);
        assert!(!indemnity.rate_missing);
    }

    #[test]
    fn test_into_line_carries_everything() {
        let rotation = make_rotation(&["CDG", "FRA", "CDG"], "2024-06-10", "2024-06-10");
        let indemnity = calculate_indemnity(&rotation, &directory(), Some(&schedule()), &bases());

        let line = indemnity.into_line(rotation.clone());

        assert_eq!(line.rotation, rotation);
        assert_eq!(line.daily_rate, Some(dec("59.00")));
        assert_eq!(line.total_indemnity, dec("59.00"));
    }
}
