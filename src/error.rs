//! Error types for the crew per-diem engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading reference data,
//! reading duty reports and exporting results.

use thiserror::Error;

/// The main error type for the crew per-diem engine.
///
/// Configuration and reference-table failures are returned to the caller.
/// Document-level failures are caught by the batch analyzer and turned into
/// warnings, so a single bad report never aborts a batch.
///
/// # Example
///
/// ```
/// use crew_per_diem::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A reference table (airports, per-diem rates) was not found.
    #[error("Reference file not found: {path}")]
    ReferenceNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A reference table exists but is malformed.
    #[error("Failed to read reference file '{path}': {message}")]
    ReferenceParseError {
        /// The path to the malformed file.
        path: String,
        /// A description of the problem.
        message: String,
    },

    /// A document could not be opened or its text could not be extracted.
    #[error("Unreadable document '{name}': {message}")]
    UnreadableDocument {
        /// The display name of the document.
        name: String,
        /// A description of the failure.
        message: String,
    },

    /// The reporting month/year of a document could not be determined.
    #[error("Could not determine the reporting month of '{name}'")]
    UnrecognizedPeriod {
        /// The display name of the document.
        name: String,
    },

    /// A day/month/year combination is not a real calendar date.
    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// The year.
        year: i32,
        /// The month (1-12, may be out of range when the input was bad).
        month: u32,
        /// The day of month.
        day: u32,
    },

    /// Writing or reading an exported table failed.
    #[error("Export error: {message}")]
    ExportError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_reference_parse_error_displays_path_and_message() {
        let error = EngineError::ReferenceParseError {
            path: "airport-codes.csv".to_string(),
            message: "missing column 'iata_code'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read reference file 'airport-codes.csv': missing column 'iata_code'"
        );
    }

    #[test]
    fn test_invalid_date_is_zero_padded() {
        let error = EngineError::InvalidDate {
            year: 2024,
            month: 2,
            day: 30,
        };
        assert_eq!(error.to_string(), "Invalid date: 2024-02-30");
    }

    #[test]
    fn test_unrecognized_period_displays_name() {
        let error = EngineError::UnrecognizedPeriod {
            name: "roster.pdf".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Could not determine the reporting month of 'roster.pdf'"
        );
    }

    #[test]
    fn test_unreadable_document_displays_name_and_message() {
        let error = EngineError::UnreadableDocument {
            name: "ep5_062024.pdf".to_string(),
            message: "not a PDF".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unreadable document 'ep5_062024.pdf': not a PDF"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_reference_not_found() -> EngineResult<()> {
            Err(EngineError::ReferenceNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_reference_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
