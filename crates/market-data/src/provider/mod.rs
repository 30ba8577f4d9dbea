//! Price series provider abstractions and implementations.
//!
//! This module contains:
//! - The `PriceSeriesProvider` trait that all providers implement
//! - An in-memory provider, optionally loaded from a JSON price file
//! - A timeout wrapper that turns slow calls into retryable errors

mod file_store;
mod in_memory;
mod timeout;
mod traits;

pub use file_store::{load_price_file, parse_price_file};
pub use in_memory::InMemoryPriceProvider;
pub use timeout::TimeoutPriceProvider;
pub use traits::PriceSeriesProvider;
