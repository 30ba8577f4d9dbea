use serde::{Deserialize, Serialize};

use crate::portfolio::performance::PerformanceResult;
use crate::transactions::Transaction;

/// Portfolio and benchmark statistics over the same window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub benchmark_symbol: String,
    pub portfolio: PerformanceResult,
    pub benchmark: PerformanceResult,
}

/// Transactions that move the same money as the portfolio, but only ever
/// through the benchmark instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReplay {
    pub transactions: Vec<Transaction>,
    pub notes: Vec<String>,
}
