//! Provider backed by a map of pre-loaded series.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use super::traits::{check_range, PriceSeriesProvider};
use crate::errors::MarketDataError;
use crate::models::{PriceBar, Symbol};
use crate::validator::BarValidator;

const PROVIDER_ID: &str = "MEMORY";

/// In-memory price store.
///
/// Series are sanitized on insert (sorted, one bar per date, positive closes),
/// so lookups only need to slice by date.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPriceProvider {
    series: HashMap<Symbol, Vec<PriceBar>>,
}

impl InMemoryPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a provider from raw per-symbol series.
    pub fn from_series(series: HashMap<Symbol, Vec<PriceBar>>) -> Self {
        let mut provider = Self::new();
        for (symbol, bars) in series {
            provider.insert(symbol, bars);
        }
        provider
    }

    /// Replaces the series for `symbol`.
    pub fn insert(&mut self, symbol: impl Into<Symbol>, bars: Vec<PriceBar>) {
        let symbol = symbol.into();
        let clean = BarValidator::new().sanitize_closes(&symbol, bars);
        self.series.insert(symbol, clean);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_series(mut self, symbol: impl Into<Symbol>, bars: Vec<PriceBar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.series.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Merges `other` into this provider. Series in `other` replace existing ones.
    pub fn merge(&mut self, other: InMemoryPriceProvider) {
        self.series.extend(other.series);
    }
}

#[async_trait]
impl PriceSeriesProvider for InMemoryPriceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        check_range(start, end)?;
        let bars = self
            .series
            .get(symbol)
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        let from = bars.partition_point(|b| b.date < start);
        let to = bars.partition_point(|b| b.date <= end);
        debug!(
            "{}: {} bars for {} in [{}, {}]",
            PROVIDER_ID,
            to - from,
            symbol,
            start,
            end
        );
        Ok(bars[from..to].to_vec())
    }
}
