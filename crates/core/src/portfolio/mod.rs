//! Portfolio performance pipeline.
//!
//! Period resolver -> cash-flow normalizer -> valuation builder -> metrics
//! calculator, with the benchmark comparator re-running the last three stages
//! against a substitute instrument.

pub mod benchmark;
pub mod cash_flow;
pub mod performance;
pub mod period;
pub mod valuation;

pub use benchmark::*;
pub use cash_flow::*;
pub use performance::*;
pub use period::*;
pub use valuation::*;
