//! Performance service.
//!
//! Fetches every price series a request needs through the injected
//! [`PriceSeriesProvider`], then runs the pure pipeline:
//! - window resolution (period token or explicit dates)
//! - valuation series over the window
//! - metrics, and optionally the same metrics for a benchmark replay

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join_all;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::metrics_calculator::compute;
use super::performance_model::{MetricsOptions, PerformanceResult, SolverConfig};
use crate::constants::PRICE_LOOKBACK_DAYS;
use crate::errors::{Result, ValidationError};
use crate::portfolio::benchmark::{self, BenchmarkComparison};
use crate::portfolio::cash_flow::normalize;
use crate::portfolio::period::{resolve, DateWindow, Period};
use crate::portfolio::valuation::{build, PriceHistory, ValuationSeries};
use crate::transactions::{Transaction, TransactionType};
use crate::utils::time_utils::valuation_date_today;
use perfolio_market_data::{PriceBar, PriceSeriesProvider};

/// One performance question: a transaction history and the window to look at.
///
/// The window is `start_date..=end_date` when both are set. Otherwise it is
/// `period` (inception by default) ending on `reference_date` (today in the
/// valuation timezone by default).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceRequest {
    pub transactions: Vec<Transaction>,
    pub period: Option<Period>,
    pub reference_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Overrides the service default
    pub risk_free_rate: Option<Decimal>,
}

impl PerformanceRequest {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            ..Self::default()
        }
    }

    pub fn with_period(mut self, period: Period, reference_date: NaiveDate) -> Self {
        self.period = Some(period);
        self.reference_date = Some(reference_date);
        self
    }

    pub fn with_range(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    /// Resolves the window, returning the period it came from (`None` for an
    /// explicit range).
    pub fn window(&self) -> Result<(Option<Period>, DateWindow)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Ok((None, DateWindow::custom(start, end)?)),
            (Some(_), None) => Err(ValidationError::MissingField("endDate".to_string()).into()),
            (None, Some(_)) => Err(ValidationError::MissingField("startDate".to_string()).into()),
            (None, None) => {
                let period = self.period.unwrap_or(Period::Inception);
                let reference = self.reference_date.unwrap_or_else(valuation_date_today);
                let window = resolve(period, reference, self.transactions.as_slice())?;
                Ok((Some(period), window))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceServiceConfig {
    pub risk_free_rate: Decimal,
    pub solver: SolverConfig,
    /// Attempts per symbol, counting the first one
    pub max_fetch_attempts: u32,
    /// Delay before the second attempt; doubles after each retry
    pub retry_base_delay: Duration,
}

impl Default for PerformanceServiceConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: Decimal::ZERO,
            solver: SolverConfig::default(),
            max_fetch_attempts: 3,
            retry_base_delay: Duration::from_millis(200),
        }
    }
}

#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Statistics of the portfolio over the requested window.
    async fn calculate_performance(&self, request: &PerformanceRequest)
        -> Result<PerformanceResult>;

    /// Portfolio statistics side by side with the same cash flows invested in
    /// `benchmark_symbol`.
    async fn compare_with_benchmark(
        &self,
        request: &PerformanceRequest,
        benchmark_symbol: &str,
    ) -> Result<BenchmarkComparison>;

    /// Daily value series behind the statistics.
    async fn valuation_series(&self, request: &PerformanceRequest) -> Result<ValuationSeries>;
}

pub struct PerformanceService {
    provider: Arc<dyn PriceSeriesProvider>,
    config: PerformanceServiceConfig,
}

impl PerformanceService {
    pub fn new(provider: Arc<dyn PriceSeriesProvider>) -> Self {
        Self::with_config(provider, PerformanceServiceConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn PriceSeriesProvider>,
        config: PerformanceServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &PerformanceServiceConfig {
        &self.config
    }

    fn options(&self, request: &PerformanceRequest, period: Option<Period>) -> MetricsOptions {
        MetricsOptions {
            period,
            risk_free_rate: request
                .risk_free_rate
                .unwrap_or(self.config.risk_free_rate),
            solver: self.config.solver,
        }
    }

    /// Price range needed for `transactions` over `window`: from the earlier
    /// of the first transaction and the window start, padded back so the first
    /// day can forward-fill across weekends and holidays.
    fn fetch_range(transactions: &[Transaction], window: DateWindow) -> (NaiveDate, NaiveDate) {
        let first = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map_or(window.start, |d| d.min(window.start));
        let start = first
            .checked_sub_signed(chrono::Duration::days(PRICE_LOOKBACK_DAYS))
            .unwrap_or(first);
        (start, window.end)
    }

    /// Symbols traded on or before the window end, in sorted order.
    fn traded_symbols(transactions: &[Transaction], window: DateWindow) -> Vec<String> {
        let symbols: BTreeSet<&str> = transactions
            .iter()
            .filter(|t| t.date <= window.end)
            .filter(|t| matches!(t.transaction_type, TransactionType::Buy | TransactionType::Sell))
            .filter_map(|t| t.symbol.as_deref())
            .filter(|s| !s.trim().is_empty())
            .collect();
        symbols.into_iter().map(str::to_string).collect()
    }

    async fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let mut attempt = 1u32;
        loop {
            match self.provider.get_daily_prices(symbol, start, end).await {
                Ok(bars) => {
                    debug!(
                        "{}: {} bars for {} in [{}, {}]",
                        self.provider.id(),
                        bars.len(),
                        symbol,
                        start,
                        end
                    );
                    return Ok(bars);
                }
                Err(e)
                    if e.retry_class().is_retryable()
                        && attempt < self.config.max_fetch_attempts =>
                {
                    let delay = self
                        .config
                        .retry_base_delay
                        .saturating_mul(2u32.saturating_pow(attempt - 1));
                    warn!(
                        "Fetching {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        symbol, attempt, self.config.max_fetch_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn fetch_history(
        &self,
        transactions: &[Transaction],
        window: DateWindow,
    ) -> Result<PriceHistory> {
        let (start, end) = Self::fetch_range(transactions, window);
        let symbols = Self::traded_symbols(transactions, window);

        let fetches = symbols.iter().map(|symbol| async move {
            let bars = self.fetch_with_retry(symbol, start, end).await?;
            Ok::<_, crate::errors::Error>((symbol.clone(), bars))
        });
        let series = try_join_all(fetches).await?;

        Ok(series.into_iter().collect())
    }

    fn evaluate(
        transactions: &[Transaction],
        history: &PriceHistory,
        window: DateWindow,
        options: &MetricsOptions,
    ) -> Result<PerformanceResult> {
        let flows = normalize(transactions)?;
        let series = build(transactions, history, window)?;
        compute(&series, &flows, options)
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    async fn calculate_performance(
        &self,
        request: &PerformanceRequest,
    ) -> Result<PerformanceResult> {
        let (period, window) = request.window()?;
        // invalid records fail before any fetch
        normalize(&request.transactions)?;

        let history = self.fetch_history(&request.transactions, window).await?;
        let options = self.options(request, period);
        let result = Self::evaluate(&request.transactions, &history, window, &options)?;

        info!(
            "Performance for [{}, {}]: twr={} xirr={:?}",
            window.start, window.end, result.twr, result.xirr
        );
        Ok(result)
    }

    async fn compare_with_benchmark(
        &self,
        request: &PerformanceRequest,
        benchmark_symbol: &str,
    ) -> Result<BenchmarkComparison> {
        let benchmark_symbol = benchmark_symbol.trim();
        if benchmark_symbol.is_empty() {
            return Err(ValidationError::MissingField("benchmarkSymbol".to_string()).into());
        }

        let (period, window) = request.window()?;
        normalize(&request.transactions)?;

        let (start, end) = Self::fetch_range(&request.transactions, window);
        let (history, benchmark_bars) = futures::try_join!(
            self.fetch_history(&request.transactions, window),
            self.fetch_with_retry(benchmark_symbol, start, end),
        )?;

        let options = self.options(request, period);
        let portfolio = Self::evaluate(&request.transactions, &history, window, &options)?;
        let benchmark = benchmark::compare(
            &request.transactions,
            benchmark_symbol,
            &benchmark_bars,
            window,
            &options,
        )?;

        info!(
            "Benchmark {} for [{}, {}]: portfolio twr={} benchmark twr={}",
            benchmark_symbol, window.start, window.end, portfolio.twr, benchmark.twr
        );
        Ok(BenchmarkComparison {
            benchmark_symbol: benchmark_symbol.to_string(),
            portfolio,
            benchmark,
        })
    }

    async fn valuation_series(&self, request: &PerformanceRequest) -> Result<ValuationSeries> {
        let (_, window) = request.window()?;
        normalize(&request.transactions)?;

        let history = self.fetch_history(&request.transactions, window).await?;
        build(&request.transactions, &history, window)
    }
}
