//! Perfolio Core - performance engine, domain models and services.
//!
//! Turns a chronological list of transactions plus daily closes into a daily
//! valuation series and the usual return and risk statistics. Everything below
//! `portfolio` is pure computation over plain inputs; price fetching lives in
//! [`portfolio::performance::PerformanceService`], behind the
//! `PriceSeriesProvider` trait from `perfolio-market-data`.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod transactions;
pub mod utils;

// Re-export common types from portfolio and transactions modules
pub use portfolio::*;
pub use transactions::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
