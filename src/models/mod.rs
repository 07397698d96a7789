//! Core data models for the crew per-diem engine.
//!
//! This module contains all the domain models used throughout the engine.

mod analysis_result;
mod flight_segment;
mod reference;
mod reporting_period;
mod rotation;

pub use analysis_result::{
    AnalysisResult, AnalysisWarning, RotationLine, StopoverResolution, UsageCount, WarningCode,
};
pub use flight_segment::{FlightSegment, sort_segments};
pub use reference::{AirportInfo, NOT_AVAILABLE, PerDiemEntry};
pub use reporting_period::ReportingPeriod;
pub use rotation::{ITINERARY_SEPARATOR, Rotation, RotationKey, collapse_itinerary};
