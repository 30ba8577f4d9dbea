//! JSON file price store.
//!
//! File layout is a single object keyed by symbol:
//!
//! ```json
//! {
//!   "AAPL": [{ "date": "2024-01-02", "close": 185.64 }],
//!   "SPY":  [{ "date": "2024-01-02", "open": 472.1, "high": 473.6, "low": 470.5, "close": 472.65 }]
//! }
//! ```
//!
//! OHLCV fields are optional; only `close` is used once the file is validated.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use super::in_memory::InMemoryPriceProvider;
use crate::errors::MarketDataError;
use crate::models::{DailyBar, Symbol};
use crate::validator::BarValidator;

/// Parses a price file body into an in-memory provider.
pub fn parse_price_file(body: &str) -> Result<InMemoryPriceProvider, MarketDataError> {
    let raw: HashMap<Symbol, Vec<DailyBar>> = serde_json::from_str(body)?;
    let validator = BarValidator::new();

    let mut provider = InMemoryPriceProvider::new();
    for (symbol, bars) in raw {
        let clean = validator.sanitize(&symbol, bars);
        provider.insert(symbol, clean);
    }
    Ok(provider)
}

/// Reads and parses a price file from disk.
pub fn load_price_file(path: impl AsRef<Path>) -> Result<InMemoryPriceProvider, MarketDataError> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path)?;
    let provider = parse_price_file(&body)?;
    info!(
        "Loaded {} price series from {}",
        provider.symbols().count(),
        path.display()
    );
    Ok(provider)
}
