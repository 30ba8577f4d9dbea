use std::collections::HashMap;

use chrono::NaiveDate;
use perfolio_core::{Period, PerformanceRequest, Transaction};
use perfolio_market_data::PriceBar;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body shared by every performance endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequestBody {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub period: Option<Period>,
    pub reference_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub risk_free_rate: Option<Decimal>,
    /// Replaces the configured provider for this request
    pub prices: Option<HashMap<String, Vec<PriceBar>>>,
}

impl PerformanceRequestBody {
    /// Splits the body into the engine request and the optional price override.
    pub fn into_parts(self) -> (PerformanceRequest, Option<HashMap<String, Vec<PriceBar>>>) {
        let request = PerformanceRequest {
            transactions: self.transactions,
            period: self.period,
            reference_date: self.reference_date,
            start_date: self.start_date,
            end_date: self.end_date,
            risk_free_rate: self.risk_free_rate,
        };
        (request, self.prices)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRequestBody {
    pub benchmark_symbol: String,
    #[serde(flatten)]
    pub request: PerformanceRequestBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInfo {
    pub code: Period,
    pub label: &'static str,
}

impl From<Period> for PeriodInfo {
    fn from(period: Period) -> Self {
        let label = match period {
            Period::Last1Month => "1 month",
            Period::Last3Months => "3 months",
            Period::Last6Months => "6 months",
            Period::YearToDate => "Year to date",
            Period::Last1Year => "1 year",
            Period::Last2Years => "2 years",
            Period::Last3Years => "3 years",
            Period::Last5Years => "5 years",
            Period::Inception => "Since inception",
        };
        Self {
            code: period,
            label,
        }
    }
}
