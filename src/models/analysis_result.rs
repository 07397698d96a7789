//! Analysis result models for the crew per-diem engine.
//!
//! This module contains the [`AnalysisResult`] type and its associated
//! structures that capture every output of a batch run: the rotations table,
//! the headline indemnity total, aircraft usage statistics and warnings.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Rotation;

/// Category of a non-fatal problem met during a batch.
///
/// # Example
///
/// ```
/// use crew_per_diem::models::WarningCode;
///
/// let code = WarningCode::MissingReferenceData;
/// assert_eq!(code.to_string(), "missing_reference_data");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// The document could not be opened or decoded.
    UnreadableDocument,
    /// The reporting month/year of the document could not be inferred.
    UnrecognizedPeriod,
    /// No usable per-diem file for a reporting year.
    MissingReferenceData,
    /// A rotation's principal stopover is not in the airport directory.
    UnresolvedStopover,
    /// The batch produced no rotation at all.
    NoDataExtracted,
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            WarningCode::UnreadableDocument => "unreadable_document",
            WarningCode::UnrecognizedPeriod => "unrecognized_period",
            WarningCode::MissingReferenceData => "missing_reference_data",
            WarningCode::UnresolvedStopover => "unresolved_stopover",
            WarningCode::NoDataExtracted => "no_data_extracted",
        };
        f.write_str(code)
    }
}

/// A warning generated during a batch.
///
/// Warnings never abort the batch; they describe what was skipped or
/// degraded so the user can act on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    /// The type of warning.
    pub code: WarningCode,
    /// The document concerned, if the warning is about one document.
    pub document: Option<String>,
    /// A human-readable description.
    pub message: String,
}

impl AnalysisWarning {
    /// Creates a warning attached to a document.
    pub fn for_document(
        code: WarningCode,
        document: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            document: Some(document.into()),
            message: message.into(),
        }
    }

    /// Creates a warning that concerns the batch as a whole.
    pub fn general(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            document: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(document) => write!(f, "{}: {}", document, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// How a rotation's principal stopover was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StopoverResolution {
    /// The stopover was found in the airport directory.
    Resolved {
        /// The stopover airport code.
        airport: String,
        /// Display label, e.g. `New York (US)`.
        label: String,
        /// The per-diem location code used for the rate lookup.
        location_code: String,
    },
    /// The itinerary never leaves the home bases.
    NoForeignStopover,
    /// The stopover airport is missing from the directory.
    UnknownAirport {
        /// The stopover airport code.
        airport: String,
    },
}

impl StopoverResolution {
    /// The label shown in the rotations table.
    pub fn label(&self) -> String {
        match self {
            StopoverResolution::Resolved { label, .. } => label.clone(),
            StopoverResolution::NoForeignStopover => "No foreign stopover".to_string(),
            StopoverResolution::UnknownAirport { airport } => {
                format!("{} (info not available)", airport)
            }
        }
    }

    /// The per-diem location code, when the stopover was resolved.
    pub fn location_code(&self) -> Option<&str> {
        match self {
            StopoverResolution::Resolved { location_code, .. } => Some(location_code),
            _ => None,
        }
    }
}

/// One row of the rotations table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationLine {
    /// The rotation itself.
    pub rotation: Rotation,
    /// The principal stopover and how it was resolved.
    pub stopover: StopoverResolution,
    /// The daily per-diem rate in EUR, when one applies.
    pub daily_rate: Option<Decimal>,
    /// Daily rate times duration; zero when no rate applies.
    pub total_indemnity: Decimal,
}

/// How many segments were flown with one aircraft type or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCount {
    /// The aircraft type or registration.
    pub key: String,
    /// Number of segments flown with it.
    pub segments: usize,
}

/// The complete result of a batch analysis.
///
/// # Example
///
/// ```
/// use crew_per_diem::models::AnalysisResult;
///
/// let result = AnalysisResult::empty(vec![]);
/// assert!(!result.has_results());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Unique identifier for this analysis run.
    pub analysis_id: Uuid,
    /// When the analysis was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// Deduplicated rotations, sorted by departure date.
    pub rotations: Vec<RotationLine>,
    /// The reporting year most represented among the rotations.
    pub predominant_year: Option<i32>,
    /// Sum of indemnities for rotations of the predominant year.
    pub total_indemnity: Decimal,
    /// Segment counts per aircraft type, most used first.
    pub aircraft_types: Vec<UsageCount>,
    /// Segment counts per aircraft registration, most used first.
    pub registrations: Vec<UsageCount>,
    /// Non-fatal problems met during the batch.
    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisResult {
    /// A result with no rotation, carrying only warnings.
    pub fn empty(warnings: Vec<AnalysisWarning>) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            rotations: Vec::new(),
            predominant_year: None,
            total_indemnity: Decimal::ZERO,
            aircraft_types: Vec::new(),
            registrations: Vec::new(),
            warnings,
        }
    }

    /// Whether any rotation was extracted.
    pub fn has_results(&self) -> bool {
        !self.rotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_with_document() {
        let warning = AnalysisWarning::for_document(
            WarningCode::UnreadableDocument,
            "ep5_062024.pdf",
            "not a PDF file",
        );
        assert_eq!(warning.to_string(), "ep5_062024.pdf: not a PDF file");
    }

    #[test]
    fn test_warning_display_without_document() {
        let warning =
            AnalysisWarning::general(WarningCode::NoDataExtracted, "No data extracted");
        assert_eq!(warning.to_string(), "No data extracted");
    }

    #[test]
    fn test_warning_code_serialization() {
        let json = serde_json::to_string(&WarningCode::UnresolvedStopover).unwrap();
        assert_eq!(json, "\"unresolved_stopover\"");

        let code: WarningCode = serde_json::from_str("\"unrecognized_period\"").unwrap();
        assert_eq!(code, WarningCode::UnrecognizedPeriod);
    }

    #[test]
    fn test_stopover_labels() {
        let resolved = StopoverResolution::Resolved {
            airport: "NRT".to_string(),
            label: "Tokyo (JP)".to_string(),
            location_code: "TY".to_string(),
        };
        assert_eq!(resolved.label(), "Tokyo (JP)");
        assert_eq!(resolved.location_code(), Some("TY"));

        let unknown = StopoverResolution::UnknownAirport {
            airport: "XXX".to_string(),
        };
        assert_eq!(unknown.label(), "XXX (info not available)");
        assert_eq!(unknown.location_code(), None);

        assert_eq!(
            StopoverResolution::NoForeignStopover.label(),
            "No foreign stopover"
        );
    }

    #[test]
    fn test_stopover_serialization_is_tagged() {
        let json = serde_json::to_string(&StopoverResolution::UnknownAirport {
            airport: "XXX".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"unknown_airport","airport":"XXX"}"#);
    }

    #[test]
    fn test_empty_result_has_no_results() {
        let result = AnalysisResult::empty(vec![AnalysisWarning::general(
            WarningCode::NoDataExtracted,
            "No data extracted",
        )]);
        assert!(!result.has_results());
        assert_eq!(result.total_indemnity, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
    }
}
