//! Benchmark comparison - replays the portfolio's own cash-flow timing against
//! a single substitute instrument.

mod benchmark_comparator;
mod benchmark_model;


pub use benchmark_comparator::{compare, synthesize};
pub use benchmark_model::{BenchmarkComparison, BenchmarkReplay};
