//! Reference data records.
//!
//! These are the rows of the airport directory and of the per-diem schedule,
//! as held in memory after loading.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder used for blank reference fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Static attributes of one airport.
///
/// # Example
///
/// ```
/// use crew_per_diem::models::AirportInfo;
///
/// let jfk = AirportInfo {
///     city: "New York".to_string(),
///     country: "US".to_string(),
///     name: "John F Kennedy International Airport".to_string(),
///     location_override: Some("NY".to_string()),
/// };
/// assert_eq!(jfk.location_code(), "NY");
/// assert_eq!(jfk.display_label(), "New York (US)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportInfo {
    /// The municipality served by the airport.
    pub city: String,
    /// ISO 3166 alpha-2 country code.
    pub country: String,
    /// The airport's name.
    pub name: String,
    /// Tax-authority location code used instead of the country code, if any.
    pub location_override: Option<String>,
}

impl AirportInfo {
    /// The code to look up in the per-diem schedule.
    pub fn location_code(&self) -> &str {
        self.location_override.as_deref().unwrap_or(&self.country)
    }

    /// Human-readable label, e.g. `Tokyo (JP)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.city, self.country)
    }
}

/// One per-diem rate record for a location.
///
/// Amounts are already converted to EUR by the job that produced the
/// reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDiemEntry {
    /// The date from which this rate applies.
    pub effective_date: NaiveDate,
    /// The currency the rate was published in, when the file records it.
    pub currency: Option<String>,
    /// The daily amount in EUR.
    pub amount_eur: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(country: &str, location_override: Option<&str>) -> AirportInfo {
        AirportInfo {
            city: "Somewhere".to_string(),
            country: country.to_string(),
            name: NOT_AVAILABLE.to_string(),
            location_override: location_override.map(str::to_string),
        }
    }

    #[test]
    fn test_location_code_defaults_to_country() {
        assert_eq!(airport("DE", None).location_code(), "DE");
    }

    #[test]
    fn test_location_code_prefers_override() {
        assert_eq!(airport("CA", Some("VT")).location_code(), "VT");
    }
}
