//! Perfolio Market Data Crate
//!
//! Daily price series boundary for the performance engine.
//!
//! # Overview
//!
//! The engine only ever needs one thing from market data: the daily close of a
//! symbol over a date range. This crate defines that contract and the stores
//! that satisfy it.
//!
//! ```text
//! +--------------------+     +-----------------------+
//! | PerformanceService | --> | PriceSeriesProvider   |  (trait object)
//! +--------------------+     +-----------------------+
//!                                      |
//!                         +------------+------------+
//!                         v                         v
//!              +---------------------+   +----------------------+
//!              | TimeoutPriceProvider|   | InMemoryPriceProvider|
//!              +---------------------+   +----------------------+
//!                                                   ^
//!                                                   |
//!                                          JSON price file
//! ```
//!
//! # Core Types
//!
//! - [`PriceBar`] - One daily close
//! - [`DailyBar`] - Full OHLCV bar as found in price files
//! - [`PriceSeriesProvider`] - Async source of daily closes
//! - [`MarketDataError`] - Provider failures with a [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;
pub mod validator;

pub use errors::{MarketDataError, RetryClass};
pub use models::{DailyBar, PriceBar, Symbol};
pub use provider::{
    load_price_file, parse_price_file, InMemoryPriceProvider, PriceSeriesProvider,
    TimeoutPriceProvider,
};
pub use validator::{BarValidator, ValidatorConfig};
