use std::collections::HashMap;

use chrono::NaiveDate;
use perfolio_market_data::{BarValidator, PriceBar};
use rust_decimal::Decimal;

use crate::portfolio::period::DateWindow;

/// Daily closes keyed by symbol, as handed to the engine.
pub type PriceHistory = HashMap<String, Vec<PriceBar>>;

/// Forward-fill lookups over validated price series.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    series: HashMap<String, Vec<PriceBar>>,
}

impl PriceTable {
    /// Sanitizes every series: positive closes only, ascending, one bar per date.
    pub fn new(history: &PriceHistory) -> Self {
        let validator = BarValidator::new();
        let series = history
            .iter()
            .map(|(symbol, bars)| {
                (
                    symbol.clone(),
                    validator.sanitize_closes(symbol, bars.clone()),
                )
            })
            .collect();
        Self { series }
    }

    /// Last close on or before `date`.
    pub fn close_on_or_before(&self, symbol: &str, date: NaiveDate) -> Option<Decimal> {
        let bars = self.series.get(symbol)?;
        let idx = bars.partition_point(|b| b.date <= date);
        idx.checked_sub(1).map(|i| bars[i].close)
    }

    /// Every bar date of every series that falls inside `window`.
    pub fn bar_dates_within(&self, window: DateWindow) -> impl Iterator<Item = NaiveDate> + '_ {
        self.series.values().flat_map(move |bars| {
            let from = bars.partition_point(|b| b.date < window.start);
            let to = bars.partition_point(|b| b.date <= window.end);
            bars[from..to].iter().map(|b| b.date)
        })
    }
}
