//! Report assembly.
//!
//! Rotations from every document of a batch are merged here: duplicates read
//! from overlapping reports are dropped, each rotation is priced, and the
//! headline total and aircraft statistics are computed.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    AnalysisResult, AnalysisWarning, FlightSegment, Rotation, RotationLine, StopoverResolution,
    UsageCount, WarningCode,
};

use super::RotationIndemnity;

/// Drops rotations reported more than once.
///
/// Two rotations are the same when they share departure date, return date,
/// departure airport and arrival airport. The first occurrence is kept. The
/// result is sorted by departure date; rotations leaving the same day keep
/// their input order.
pub fn deduplicate_rotations(rotations: Vec<Rotation>) -> Vec<Rotation> {
    let before = rotations.len();
    let mut seen = HashSet::new();

    let mut unique: Vec<Rotation> = rotations
        .into_iter()
        .filter(|rotation| seen.insert(rotation.key()))
        .collect();
    unique.sort_by_key(|rotation| rotation.departure_date);

    if unique.len() < before {
        debug!(
            duplicates = before - unique.len(),
            "Dropped duplicate rotations"
        );
    }

    unique
}

/// The reporting year with the most rotations.
///
/// When two years have as many rotations, the later year wins. `None` for an
/// empty batch.
///
/// # Example
///
/// ```
/// use crew_per_diem::calculation::predominant_year;
///
/// assert_eq!(predominant_year([2023, 2024, 2024]), Some(2024));
/// assert_eq!(predominant_year([2023, 2024]), Some(2024));
/// assert_eq!(predominant_year(Vec::new()), None);
/// ```
pub fn predominant_year<I>(years: I) -> Option<i32>
where
    I: IntoIterator<Item = i32>,
{
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in years {
        *counts.entry(year).or_insert(0) += 1;
    }

    // max_by_key returns the last maximum; BTreeMap iterates years ascending.
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(year, _)| year)
}

/// Counts segments per key, most used first then alphabetically.
pub fn tally_usage<'a, I>(keys: I) -> Vec<UsageCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut usage: Vec<UsageCount> = counts
        .into_iter()
        .map(|(key, segments)| UsageCount {
            key: key.to_string(),
            segments,
        })
        .collect();
    usage.sort_by(|a, b| b.segments.cmp(&a.segments).then_with(|| a.key.cmp(&b.key)));
    usage
}

/// Builds the batch result from every rotation and segment read.
///
/// `price` computes the indemnity of one rotation. Aircraft statistics are
/// taken over all `segments`, including those outside any rotation. The
/// headline total only sums rotations of the predominant year; the detail
/// table keeps them all.
///
/// A stopover missing from the airport directory raises an
/// [`WarningCode::UnresolvedStopover`] warning; a loaded schedule without a
/// rate for the stopover raises [`WarningCode::MissingReferenceData`].
///
/// An empty batch is not an error: the result carries a
/// [`WarningCode::NoDataExtracted`] warning, no rotation, and the aircraft
/// statistics of whatever segments were read.
pub fn assemble_report<F>(
    analysis_id: Uuid,
    rotations: Vec<Rotation>,
    segments: &[FlightSegment],
    mut warnings: Vec<AnalysisWarning>,
    mut price: F,
) -> AnalysisResult
where
    F: FnMut(&Rotation) -> RotationIndemnity,
{
    let rotations = deduplicate_rotations(rotations);
    let aircraft_types = tally_usage(segments.iter().map(|s| s.aircraft_type.as_str()));
    let registrations = tally_usage(segments.iter().map(|s| s.registration.as_str()));

    if rotations.is_empty() {
        warnings.push(AnalysisWarning::general(
            WarningCode::NoDataExtracted,
            "No rotation could be extracted from the submitted documents",
        ));
        let mut result = AnalysisResult::empty(warnings);
        result.analysis_id = analysis_id;
        result.aircraft_types = aircraft_types;
        result.registrations = registrations;
        return result;
    }

    let lines: Vec<RotationLine> = rotations
        .into_iter()
        .map(|rotation| {
            let indemnity = price(&rotation);
            match &indemnity.stopover {
                StopoverResolution::UnknownAirport { airport } => {
                    warnings.push(AnalysisWarning::for_document(
                        WarningCode::UnresolvedStopover,
                        rotation.source_document.clone(),
                        format!(
                            "Airport {} is not in the airport directory; rotation of {} has no indemnity",
                            airport, rotation.departure_date
                        ),
                    ));
                }
                StopoverResolution::Resolved {
                    label,
                    location_code,
                    ..
                } if indemnity.rate_missing => {
                    warnings.push(AnalysisWarning::for_document(
                        WarningCode::MissingReferenceData,
                        rotation.source_document.clone(),
                        format!(
                            "No per-diem rate for {} ({}) on {}; rotation has no indemnity",
                            location_code, label, rotation.departure_date
                        ),
                    ));
                }
                _ => {}
            }
            indemnity.into_line(rotation)
        })
        .collect();

    let predominant_year = predominant_year(lines.iter().map(|line| line.rotation.reporting_year));
    let total_indemnity: Decimal = lines
        .iter()
        .filter(|line| Some(line.rotation.reporting_year) == predominant_year)
        .map(|line| line.total_indemnity)
        .sum();

    AnalysisResult {
        analysis_id,
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        rotations: lines,
        predominant_year,
        total_indemnity,
        aircraft_types,
        registrations,
        warnings,
    }
}
