//! Configuration loading and management for the crew per-diem engine.
//!
//! This module loads the engine settings from YAML and the reference tables
//! (airport directory, per-diem schedules) from semicolon-delimited files.
//!
//! # Example
//!
//! ```no_run
//! use crew_per_diem::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Home bases: {:?}", config.settings().home_bases);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, SETTINGS_FILE, parse_amount, read_airports, read_per_diem};
pub use types::{
    AirportDirectory, CityOverride, EngineSettings, LocationOverrides, PerDiemColumns,
    PerDiemSchedule, YEAR_PLACEHOLDER,
};
