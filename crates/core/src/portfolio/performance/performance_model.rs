use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::period::Period;

/// Iteration contract of the XIRR solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Cap on Newton steps, and separately on bisection steps
    pub max_iterations: u32,
    /// Convergence tolerance on the rate
    pub tolerance: f64,
    /// Newton starting point
    pub initial_guess: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            initial_guess: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsOptions {
    /// Echoed into the result; `None` for explicit date ranges
    pub period: Option<Period>,
    /// Annual rate, as a plain ratio (0.04 = 4%)
    pub risk_free_rate: Decimal,
    pub solver: SolverConfig,
}

/// Performance statistics for one window. Ratios are plain (0.1 = 10%),
/// rounded to 6 decimal places. Undefined metrics are `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResult {
    pub period: Option<Period>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cagr: Option<Decimal>,
    pub xirr: Option<Decimal>,
    pub twr: Decimal,
    pub annualized_twr: Option<Decimal>,
    pub mwr: Option<Decimal>,
    pub volatility: Decimal,
    pub sharpe_ratio: Option<Decimal>,
    pub max_drawdown: Decimal,
    pub start_value: Decimal,
    pub end_value: Decimal,
    /// Net money that entered the portfolio after the first day
    pub net_cash_flow: Decimal,
    #[serde(default)]
    pub notes: Vec<String>,
}
