//! Daily bar validation.
//!
//! Validates bars from providers before they reach the engine:
//! - Close must be strictly positive
//! - OHLC invariants (high >= low, open/close between high/low) when present
//! - Reasonable value ranges
//! - Ascending, one bar per date

use log::warn;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{DailyBar, PriceBar};

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Hard failure - drop the bar.
    Hard,
    /// Soft warning - keep the bar but log.
    Soft,
}

#[derive(Clone, Debug)]
struct ValidationIssue {
    severity: ValidationSeverity,
    message: String,
}

/// Bar validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Whether to reject bars where high < low or open/close fall outside the range.
    pub reject_invalid_ohlc: bool,
    /// Maximum allowed price value (for sanity check).
    pub max_price: Option<Decimal>,
    /// Whether to warn on zero volume.
    pub warn_on_zero_volume: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            reject_invalid_ohlc: true,
            max_price: Some(Decimal::from(1_000_000_000i64)), // 1 billion as sanity check
            warn_on_zero_volume: false,
        }
    }
}

/// Daily bar validator.
#[derive(Clone, Debug, Default)]
pub struct BarValidator {
    config: ValidatorConfig,
}

impl BarValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single OHLCV bar.
    ///
    /// Returns Ok(()) if the bar is usable. Soft issues are logged, not returned.
    pub fn validate(&self, bar: &DailyBar) -> Result<(), MarketDataError> {
        let mut issues: Vec<ValidationIssue> = Vec::new();

        self.validate_close_price(bar, &mut issues);
        self.validate_ohlc_invariants(bar, &mut issues);
        self.validate_price_range(bar, &mut issues);
        self.validate_volume(bar, &mut issues);

        let errors: Vec<&str> = issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Hard)
            .map(|i| i.message.as_str())
            .collect();

        if !errors.is_empty() {
            return Err(MarketDataError::ValidationFailed {
                message: errors.join("; "),
            });
        }

        for issue in issues.iter().filter(|i| i.severity == ValidationSeverity::Soft) {
            warn!("Bar validation warning for {}: {}", bar.date, issue.message);
        }

        Ok(())
    }

    /// Validates, sorts and de-duplicates a symbol's bars.
    ///
    /// Invalid bars are dropped with a warning. When two bars share a date the
    /// later one in input order wins.
    pub fn sanitize(&self, symbol: &str, bars: Vec<DailyBar>) -> Vec<PriceBar> {
        let mut kept: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match self.validate(&bar) {
                Ok(()) => kept.push(PriceBar::from(&bar)),
                Err(e) => warn!("Dropping bar for {} on {}: {}", symbol, bar.date, e),
            }
        }
        normalize_series(kept)
    }

    /// Same as [`sanitize`](Self::sanitize) for close-only bars.
    pub fn sanitize_closes(&self, symbol: &str, bars: Vec<PriceBar>) -> Vec<PriceBar> {
        let daily = bars
            .into_iter()
            .map(|b| DailyBar::close_only(b.date, b.close))
            .collect();
        self.sanitize(symbol, daily)
    }

    fn validate_close_price(&self, bar: &DailyBar, issues: &mut Vec<ValidationIssue>) {
        if bar.close <= Decimal::ZERO {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("Non-positive close price: {}", bar.close),
            });
        }
    }

    fn validate_ohlc_invariants(&self, bar: &DailyBar, issues: &mut Vec<ValidationIssue>) {
        let (open, high, low) = match (bar.open, bar.high, bar.low) {
            (Some(o), Some(h), Some(l)) => (o, h, l),
            // Partial or missing OHLC: nothing to cross-check
            _ => return,
        };

        let severity = if self.config.reject_invalid_ohlc {
            ValidationSeverity::Hard
        } else {
            ValidationSeverity::Soft
        };

        if high < low {
            issues.push(ValidationIssue {
                severity,
                message: format!("High ({}) < Low ({})", high, low),
            });
        }
        if open < low || open > high {
            issues.push(ValidationIssue {
                severity,
                message: format!("Open ({}) outside [{}, {}]", open, low, high),
            });
        }
        if bar.close < low || bar.close > high {
            issues.push(ValidationIssue {
                severity,
                message: format!("Close ({}) outside [{}, {}]", bar.close, low, high),
            });
        }
    }

    fn validate_price_range(&self, bar: &DailyBar, issues: &mut Vec<ValidationIssue>) {
        if let Some(max_price) = self.config.max_price {
            if bar.close > max_price {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!("Close price {} exceeds maximum {}", bar.close, max_price),
                });
            }
        }
    }

    fn validate_volume(&self, bar: &DailyBar, issues: &mut Vec<ValidationIssue>) {
        match bar.volume {
            Some(v) if v < Decimal::ZERO => issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("Negative volume: {}", v),
            }),
            Some(v) if v.is_zero() && self.config.warn_on_zero_volume => {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Soft,
                    message: "Zero volume".to_string(),
                })
            }
            _ => {}
        }
    }
}

/// Sorts bars ascending by date and keeps the last bar seen for each date.
pub fn normalize_series(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    // stable: equal dates keep input order, so the last one is the latest supplied
    bars.sort_by_key(|b| b.date);
    let mut out: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}
