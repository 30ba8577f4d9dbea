use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily closing price of one symbol.
///
/// This is the only price shape the performance engine reads. Dates are trading
/// days; calendar gaps are expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// Full OHLCV daily bar as returned by upstream data suppliers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBar {
    pub date: NaiveDate,

    /// Opening price (optional, some suppliers only report the close)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing price (required)
    pub close: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl DailyBar {
    /// Create a bar that only carries a close.
    pub fn close_only(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}

impl From<DailyBar> for PriceBar {
    fn from(bar: DailyBar) -> Self {
        PriceBar::new(bar.date, bar.close)
    }
}

impl From<&DailyBar> for PriceBar {
    fn from(bar: &DailyBar) -> Self {
        PriceBar::new(bar.date, bar.close)
    }
}
