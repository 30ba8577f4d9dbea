//! Portfolio valuation domain models.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::period::DateWindow;

/// Portfolio value on one grid day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub date: NaiveDate,
    /// Market value of holdings plus the cash sleeve. Never includes the day's flows.
    pub total_value: Decimal,
    /// Net external flow on this date, positive when money entered the portfolio.
    pub cash_flow: Decimal,
}

/// A held symbol that could not be priced on some grid days because it had no
/// close yet. It contributed zero on those days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityNote {
    pub symbol: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub days: u32,
}

impl fmt::Display for DataQualityNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No price for {} from {} to {} ({} valuation days); valued at zero",
            self.symbol, self.first_date, self.last_date, self.days
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSeries {
    pub window: DateWindow,
    pub points: Vec<ValuationPoint>,
    pub notes: Vec<DataQualityNote>,
}

impl ValuationSeries {
    pub fn start_value(&self) -> Decimal {
        self.points
            .first()
            .map(|p| p.total_value)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn end_value(&self) -> Decimal {
        self.points
            .last()
            .map(|p| p.total_value)
            .unwrap_or(Decimal::ZERO)
    }
}
