//! Per-diem rate lookup.
//!
//! Rates change during a year. The rate paid for a rotation is the one in
//! force on its departure date.

use chrono::NaiveDate;

use crate::config::PerDiemSchedule;
use crate::models::PerDiemEntry;

/// Returns the entry in force on `date`.
///
/// `entries` must be sorted by effective date, most recent first, as
/// [`PerDiemSchedule`] keeps them. The first entry that took effect on or
/// before `date` wins. Returns `None` when the list is empty or every entry
/// is later than `date`.
///
/// # Example
///
/// ```
/// use crew_per_diem::calculation::find_applicable_entry;
/// use crew_per_diem::models::PerDiemEntry;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let entries = vec![
///     PerDiemEntry {
///         effective_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
///         currency: None,
///         amount_eur: Decimal::new(13500, 2),
///     },
///     PerDiemEntry {
///         effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///         currency: None,
///         amount_eur: Decimal::new(12000, 2),
///     },
/// ];
///
/// let march = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// assert_eq!(find_applicable_entry(&entries, march).unwrap().amount_eur, Decimal::new(12000, 2));
/// ```
pub fn find_applicable_entry(entries: &[PerDiemEntry], date: NaiveDate) -> Option<&PerDiemEntry> {
    entries.iter().find(|entry| entry.effective_date <= date)
}

impl PerDiemSchedule {
    /// Returns the entry in force for a location on `date`.
    ///
    /// `None` when the location is unknown or has no entry effective yet.
    pub fn resolve(&self, location_code: &str, date: NaiveDate) -> Option<&PerDiemEntry> {
        find_applicable_entry(self.entries(location_code), date)
    }
}
