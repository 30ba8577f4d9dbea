use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Named look-back windows, always ending on the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Last1Month,
    Last3Months,
    Last6Months,
    Last1Year,
    Last2Years,
    Last3Years,
    Last5Years,
    /// From January 1st of the reference year
    YearToDate,
    /// From the earliest transaction
    Inception,
}

impl Period {
    pub const ALL: [Period; 9] = [
        Period::Last1Month,
        Period::Last3Months,
        Period::Last6Months,
        Period::Last1Year,
        Period::Last2Years,
        Period::Last3Years,
        Period::Last5Years,
        Period::YearToDate,
        Period::Inception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Last1Month => "LAST_1_MONTH",
            Period::Last3Months => "LAST_3_MONTHS",
            Period::Last6Months => "LAST_6_MONTHS",
            Period::Last1Year => "LAST_1_YEAR",
            Period::Last2Years => "LAST_2_YEARS",
            Period::Last3Years => "LAST_3_YEARS",
            Period::Last5Years => "LAST_5_YEARS",
            Period::YearToDate => "YTD",
            Period::Inception => "INCEPTION",
        }
    }

    /// Length of a fixed look-back in months; `None` for calendar-anchored periods.
    pub fn months(&self) -> Option<u32> {
        match self {
            Period::Last1Month => Some(1),
            Period::Last3Months => Some(3),
            Period::Last6Months => Some(6),
            Period::Last1Year => Some(12),
            Period::Last2Years => Some(24),
            Period::Last3Years => Some(36),
            Period::Last5Years => Some(60),
            Period::YearToDate | Period::Inception => None,
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_ascii_uppercase();
        let period = match token.as_str() {
            "LAST_1_MONTH" | "1M" => Period::Last1Month,
            "LAST_3_MONTHS" | "3M" => Period::Last3Months,
            "LAST_6_MONTHS" | "6M" => Period::Last6Months,
            "LAST_1_YEAR" | "1Y" => Period::Last1Year,
            "LAST_2_YEARS" | "2Y" => Period::Last2Years,
            "LAST_3_YEARS" | "3Y" => Period::Last3Years,
            "LAST_5_YEARS" | "5Y" => Period::Last5Years,
            "YTD" | "YEAR_TO_DATE" => Period::YearToDate,
            "INCEPTION" | "ALL" | "MAX" => Period::Inception,
            _ => return Err(Error::InvalidPeriod(format!("unrecognized token '{}'", s))),
        };
        Ok(period)
    }
}

impl TryFrom<String> for Period {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Explicit window. `start` must not be after `end`.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidPeriod(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Single-day window.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Calendar days from start to end (0 for a single-day window).
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
