//! Reporting period model.
//!
//! A duty report only prints day-of-month numbers; the month and year they
//! belong to come from the document itself (usually its file name).

use std::fmt;

use serde::{Deserialize, Serialize};

/// The calendar month a duty report covers.
///
/// # Example
///
/// ```
/// use crew_per_diem::models::ReportingPeriod;
///
/// let period = ReportingPeriod::new(2024, 6).unwrap();
/// assert_eq!(period.to_string(), "2024-06");
/// assert!(ReportingPeriod::new(2024, 13).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// The four-digit year.
    pub year: i32,
    /// The month, 1 through 12.
    pub month: u32,
}

impl ReportingPeriod {
    /// Creates a reporting period, returning `None` when the month is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_every_month() {
        for month in 1..=12 {
            assert!(ReportingPeriod::new(2024, month).is_some());
        }
    }

    #[test]
    fn test_new_rejects_month_zero() {
        assert!(ReportingPeriod::new(2024, 0).is_none());
    }

    #[test]
    fn test_periods_order_chronologically() {
        let may = ReportingPeriod::new(2024, 5).unwrap();
        let june = ReportingPeriod::new(2024, 6).unwrap();
        let january_next = ReportingPeriod::new(2025, 1).unwrap();
        assert!(may < june);
        assert!(june < january_next);
    }
}
