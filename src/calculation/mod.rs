//! Calculation logic for the crew per-diem engine.
//!
//! This module turns flight segments into paid rotations: rotation
//! reconstruction around the home bases, per-diem rate lookup by effective
//! date, the indemnity of each rotation, and assembly of the batch report
//! (deduplication, predominant year, headline total and aircraft usage).

mod indemnity;
mod rate_resolver;
mod report;
mod rotation_builder;

pub use indemnity::{RotationIndemnity, calculate_indemnity, principal_stopover, resolve_stopover};
pub use rate_resolver::find_applicable_entry;
pub use report::{assemble_report, deduplicate_rotations, predominant_year, tally_usage};
pub use rotation_builder::build_rotations;
