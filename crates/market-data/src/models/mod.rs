//! Market data models
//!
//! - `bar` - Daily bar data structures (PriceBar, DailyBar)
//! - `types` - Type alias for ticker symbols

mod bar;
mod types;

pub use bar::{DailyBar, PriceBar};
pub use types::Symbol;
