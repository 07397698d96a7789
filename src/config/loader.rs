//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine settings
//! from YAML and the airport and per-diem reference tables from delimited
//! files.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{AirportInfo, NOT_AVAILABLE, PerDiemEntry};

use super::types::{
    AirportDirectory, EngineSettings, LocationOverrides, PerDiemColumns, PerDiemSchedule,
};

/// Name of the settings file inside a configuration directory.
pub const SETTINGS_FILE: &str = "engine.yaml";

/// Field delimiter of every reference table.
const DELIMITER: u8 = b';';

const AIRPORT_CODE_COLUMN: &str = "iata_code";
const AIRPORT_CITY_COLUMN: &str = "municipality";
const AIRPORT_COUNTRY_COLUMN: &str = "iso_country";
const AIRPORT_NAME_COLUMN: &str = "name";

/// Loads and provides access to engine configuration and reference data.
///
/// The `ConfigLoader` reads the settings file and the airport directory once.
/// Per-diem schedules are read on demand, one file per reporting year; the
/// batch analyzer memoises them.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── engine.yaml                      # Engine settings
/// ├── airport-codes.csv                # Airport directory
/// └── per_diem/
///     └── dgfip_indemnites_2024.csv    # Per-diem rates for 2024
/// ```
///
/// # Example
///
/// ```no_run
/// use crew_per_diem::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let schedule = loader.load_per_diem(2024).unwrap();
/// println!("{} locations", schedule.location_count());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: PathBuf,
    settings: EngineSettings,
    airports: AirportDirectory,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing or contains invalid YAML
    /// - the airport directory is missing or lacks a required column
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join(SETTINGS_FILE))?;

        let airports_path = path.join(&settings.airports_file);
        let airports = Self::load_airports(&airports_path, &settings.location_overrides)?;

        info!(
            config_dir = %path.display(),
            airports = airports.len(),
            home_bases = ?settings.home_bases,
            "Configuration loaded"
        );

        Ok(Self {
            base_dir: path.to_path_buf(),
            settings,
            airports,
        })
    }

    /// Builds a loader from already constructed parts.
    ///
    /// Per-diem files are still looked up under `base_dir`.
    pub fn from_parts(
        base_dir: impl Into<PathBuf>,
        settings: EngineSettings,
        airports: AirportDirectory,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            settings,
            airports,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the airport directory.
    pub fn airports(&self) -> &AirportDirectory {
        &self.airports
    }

    /// Returns the configuration directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the per-diem file for a reporting year.
    pub fn per_diem_path(&self, year: i32) -> PathBuf {
        self.base_dir
            .join(&self.settings.per_diem_dir)
            .join(self.settings.per_diem_file_name(year))
    }

    /// Loads the per-diem schedule for a reporting year.
    ///
    /// Returns `ReferenceNotFound` when no file exists for the year.
    pub fn load_per_diem(&self, year: i32) -> EngineResult<PerDiemSchedule> {
        let path = self.per_diem_path(year);
        let path_str = path.display().to_string();

        let file = File::open(&path).map_err(|_| EngineError::ReferenceNotFound {
            path: path_str.clone(),
        })?;

        let schedule = read_per_diem(file, year, &self.settings.per_diem_columns, &path_str)?;
        info!(
            year,
            path = %path_str,
            locations = schedule.location_count(),
            "Per-diem schedule loaded"
        );
        Ok(schedule)
    }

    /// Loads the airport directory from a file.
    pub fn load_airports(
        path: &Path,
        overrides: &LocationOverrides,
    ) -> EngineResult<AirportDirectory> {
        let path_str = path.display().to_string();
        let file = File::open(path).map_err(|_| EngineError::ReferenceNotFound {
            path: path_str.clone(),
        })?;
        read_airports(file, overrides, &path_str)
    }
}

/// Reads an airport directory from delimited text.
///
/// Rows with a blank code are skipped, blank attributes become `N/A`, and a
/// later row with the same code replaces an earlier one.
pub fn read_airports<R: Read>(
    reader: R,
    overrides: &LocationOverrides,
    source: &str,
) -> EngineResult<AirportDirectory> {
    let mut csv_reader = reference_reader(reader);
    let headers = read_headers(&mut csv_reader, source)?;

    let code_idx = required_column(&headers, AIRPORT_CODE_COLUMN, source)?;
    let city_idx = required_column(&headers, AIRPORT_CITY_COLUMN, source)?;
    let country_idx = required_column(&headers, AIRPORT_COUNTRY_COLUMN, source)?;
    let name_idx = required_column(&headers, AIRPORT_NAME_COLUMN, source)?;

    let mut directory = AirportDirectory::default();

    for (line, record) in csv_reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(source, line = line + 2, error = %e, "Skipping unreadable airport row");
                continue;
            }
        };

        let code = field(&record, code_idx).to_uppercase();
        if code.is_empty() {
            continue;
        }

        let city = or_not_available(field(&record, city_idx));
        let country = or_not_available(field(&record, country_idx));
        let name = or_not_available(field(&record, name_idx));
        let location_override = overrides.resolve(&code, &city, &country);

        directory.insert(
            &code,
            AirportInfo {
                city,
                country,
                name,
                location_override,
            },
        );
    }

    Ok(directory)
}

/// Reads a per-diem schedule from delimited text.
///
/// Rows with a blank location, an unparseable date or an unparseable amount
/// are skipped.
pub fn read_per_diem<R: Read>(
    reader: R,
    year: i32,
    columns: &PerDiemColumns,
    source: &str,
) -> EngineResult<PerDiemSchedule> {
    let mut csv_reader = reference_reader(reader);
    let headers = read_headers(&mut csv_reader, source)?;

    let code_idx = required_column(&headers, &columns.location_code, source)?;
    let date_idx = required_column(&headers, &columns.validity_date, source)?;
    let amount_idx = required_column(&headers, &columns.amount_eur, source)?;
    let currency_idx = columns
        .currency
        .as_deref()
        .and_then(|name| find_column(&headers, name));

    let mut rates: HashMap<String, Vec<PerDiemEntry>> = HashMap::new();
    let mut skipped = 0usize;

    for record in csv_reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };

        let code = field(&record, code_idx).to_uppercase();
        let effective_date = NaiveDate::parse_from_str(field(&record, date_idx), "%Y-%m-%d");
        let amount_eur = parse_amount(field(&record, amount_idx));

        let (Ok(effective_date), Some(amount_eur)) = (effective_date, amount_eur) else {
            skipped += 1;
            continue;
        };
        if code.is_empty() {
            skipped += 1;
            continue;
        }

        let currency = currency_idx
            .map(|idx| field(&record, idx))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        rates.entry(code).or_default().push(PerDiemEntry {
            effective_date,
            currency,
            amount_eur,
        });
    }

    if skipped > 0 {
        debug!(source, skipped, "Skipped per-diem rows");
    }

    Ok(PerDiemSchedule::new(year, rates))
}

/// Parses an amount written with either a `.` or a `,` decimal separator.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    Decimal::from_str(&cleaned).ok()
}

fn reference_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn read_headers<R: Read>(reader: &mut csv::Reader<R>, source: &str) -> EngineResult<StringRecord> {
    reader
        .headers()
        .cloned()
        .map_err(|e| EngineError::ReferenceParseError {
            path: source.to_string(),
            message: e.to_string(),
        })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

fn required_column(headers: &StringRecord, name: &str, source: &str) -> EngineResult<usize> {
    find_column(headers, name).ok_or_else(|| EngineError::ReferenceParseError {
        path: source.to_string(),
        message: format!("missing column '{}'", name),
    })
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or_default()
}

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}
