//! Configuration types for rotation analysis.
//!
//! This module contains the strongly-typed settings deserialized from
//! `engine.yaml`, and the read-only reference tables built from the airport
//! and per-diem files.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::Deserialize;

use crate::models::{AirportInfo, PerDiemEntry};

/// Placeholder replaced by the reporting year in the per-diem file pattern.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Engine settings loaded from `engine.yaml`.
///
/// Every field has a default, so an empty file (or none at all, through
/// [`EngineSettings::default`]) gives the standard Paris-based setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Airports that open and close a rotation.
    pub home_bases: Vec<String>,
    /// Text marking a page as a flight-duty report page.
    pub document_marker: String,
    /// Airport directory file, relative to the configuration directory.
    pub airports_file: PathBuf,
    /// Directory holding the per-diem files, relative to the configuration directory.
    pub per_diem_dir: PathBuf,
    /// File name of a per-diem file, with `{year}` standing for the reporting year.
    pub per_diem_file_pattern: String,
    /// Header names of the per-diem file.
    pub per_diem_columns: PerDiemColumns,
    /// Rules mapping airports to city-specific per-diem locations.
    pub location_overrides: LocationOverrides,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            home_bases: vec!["CDG".to_string(), "ORY".to_string()],
            document_marker: "EP5".to_string(),
            airports_file: PathBuf::from("airport-codes.csv"),
            per_diem_dir: PathBuf::from("per_diem"),
            per_diem_file_pattern: format!("dgfip_indemnites_{}.csv", YEAR_PLACEHOLDER),
            per_diem_columns: PerDiemColumns::default(),
            location_overrides: LocationOverrides::default(),
        }
    }
}

impl EngineSettings {
    /// Checks whether an airport is one of the home bases.
    pub fn is_home_base(&self, airport: &str) -> bool {
        self.home_bases.iter().any(|base| base == airport)
    }

    /// The per-diem file name for a reporting year.
    pub fn per_diem_file_name(&self, year: i32) -> String {
        self.per_diem_file_pattern
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }
}

/// Header names of the per-diem reference file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PerDiemColumns {
    /// Location (country or city) code column.
    pub location_code: String,
    /// Validity date column, `YYYY-MM-DD`.
    pub validity_date: String,
    /// Amount in EUR column.
    pub amount_eur: String,
    /// Optional currency column.
    pub currency: Option<String>,
}

impl Default for PerDiemColumns {
    fn default() -> Self {
        Self {
            location_code: "Code Pays".to_string(),
            validity_date: "Date Validité Barème".to_string(),
            amount_eur: "Montant Barème (EUR)".to_string(),
            currency: Some("Devise Barème".to_string()),
        }
    }
}

/// A city inside a country that has its own per-diem rate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CityOverride {
    /// ISO country code of the city.
    pub country: String,
    /// City name as found in the airport directory.
    pub city: String,
    /// The per-diem location code to use.
    pub code: String,
}

/// Rules mapping airports to per-diem location codes other than their country.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationOverrides {
    /// Airport code to location code.
    pub airports: BTreeMap<String, String>,
    /// City rules, checked after the airport map.
    pub cities: Vec<CityOverride>,
}

impl Default for LocationOverrides {
    fn default() -> Self {
        let airports = [
            ("EWR", "NY"),
            ("YTZ", "VT"),
            ("YKZ", "VT"),
            ("YYZ", "VT"),
            ("CXH", "VV"),
            ("YVR", "VV"),
            ("LFW", "VL"),
            ("ABV", "NV"),
            ("LOS", "NV"),
            ("PHC", "NV"),
        ]
        .into_iter()
        .map(|(airport, code)| (airport.to_string(), code.to_string()))
        .collect();

        let cities = vec![
            CityOverride {
                country: "JP".to_string(),
                city: "Tokyo".to_string(),
                code: "TY".to_string(),
            },
            CityOverride {
                country: "US".to_string(),
                city: "New York".to_string(),
                code: "NY".to_string(),
            },
        ];

        Self { airports, cities }
    }
}

impl LocationOverrides {
    /// Finds the override code for an airport, if any rule applies.
    pub fn resolve(&self, airport: &str, city: &str, country: &str) -> Option<String> {
        if let Some(code) = self.airports.get(airport) {
            return Some(code.clone());
        }
        self.cities
            .iter()
            .find(|rule| rule.country == country && rule.city.eq_ignore_ascii_case(city))
            .map(|rule| rule.code.clone())
    }
}

/// Airport code to airport attributes, keyed by upper-cased code.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: HashMap<String, AirportInfo>,
}

impl AirportDirectory {
    /// Inserts an airport, replacing any earlier entry with the same code.
    pub fn insert(&mut self, code: &str, info: AirportInfo) {
        self.airports.insert(code.trim().to_uppercase(), info);
    }

    /// Looks an airport up by code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&AirportInfo> {
        self.airports.get(&code.trim().to_uppercase())
    }

    /// Number of airports in the directory.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

/// Per-diem rates for one reporting year, keyed by location code.
///
/// Each location's entries are kept sorted by effective date, most recent
/// first, so the applicable rate is the first entry not after the target date.
#[derive(Debug, Clone)]
pub struct PerDiemSchedule {
    year: i32,
    rates: HashMap<String, Vec<PerDiemEntry>>,
}

impl PerDiemSchedule {
    /// Creates a schedule, sorting each location's entries newest first.
    pub fn new(year: i32, rates: HashMap<String, Vec<PerDiemEntry>>) -> Self {
        let mut sorted_rates = rates;
        for entries in sorted_rates.values_mut() {
            entries.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));
        }
        Self {
            year,
            rates: sorted_rates,
        }
    }

    /// The reporting year this schedule was loaded for.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Entries for a location, newest first. Empty when the location is unknown.
    pub fn entries(&self, location_code: &str) -> &[PerDiemEntry] {
        self.rates
            .get(location_code)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of locations with at least one entry.
    pub fn location_count(&self) -> usize {
        self.rates.len()
    }
}
