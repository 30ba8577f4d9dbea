//! Daily valuation series reconstruction.

mod price_table;
mod valuation_builder;
mod valuation_model;


pub use price_table::{PriceHistory, PriceTable};
pub use valuation_builder::build;
pub use valuation_model::{DataQualityNote, ValuationPoint, ValuationSeries};
