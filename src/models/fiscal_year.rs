//! Fiscal year labels
//!
//! Labels are stored upper-cased and trimmed ("FY21") so that header cells,
//! settings and command-line input all compare equal.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A fiscal-year label such as `FY21`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FiscalYear(String);

impl FiscalYear {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_uppercase())
    }

    /// The fiscal year a purchase made on `date` is reported under
    ///
    /// Reporting lags the calendar by one year: anything run in 2022 is
    /// recorded as `FY21`.
    pub fn for_date(date: NaiveDate) -> Self {
        let year = (date.year() - 1).rem_euclid(100);
        Self(format!("FY{:02}", year))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for FiscalYear {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<&str> for FiscalYear {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<FiscalYear> for String {
    fn from(fy: FiscalYear) -> Self {
        fy.0
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_label() {
        assert_eq!(FiscalYear::new("  fy19 ").as_str(), "FY19");
        assert_eq!(FiscalYear::new("fy19"), FiscalYear::new("FY19"));
    }

    #[test]
    fn test_for_date_lags_calendar_year() {
        let date = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        assert_eq!(FiscalYear::for_date(date).as_str(), "FY21");

        let date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        assert_eq!(FiscalYear::for_date(date).as_str(), "FY09");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&FiscalYear::new("fy20")).unwrap();
        assert_eq!(json, "\"FY20\"");

        let parsed: FiscalYear = serde_json::from_str("\"fy18\"").unwrap();
        assert_eq!(parsed.as_str(), "FY18");
    }
}
