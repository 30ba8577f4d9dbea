use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::performance_model::{MetricsOptions, PerformanceResult};
use super::xirr::xirr;
use crate::constants::{DECIMAL_PRECISION, TRADING_DAYS_PER_YEAR};
use crate::errors::{Result, ValidationError};
use crate::portfolio::cash_flow::CashFlow;
use crate::portfolio::valuation::ValuationSeries;
use crate::utils::time_utils::year_fraction;

const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(15.874507866); // sqrt(252)

/// Computes every statistic for `series`.
///
/// The first point is the base: its value is the starting capital and flows
/// dated on that day are part of it. `cash_flows` are the flows from
/// [`normalize`](crate::portfolio::cash_flow::normalize); their external parts
/// dated after the first day and up to the last enter XIRR.
pub fn compute(
    series: &ValuationSeries,
    cash_flows: &[CashFlow],
    options: &MetricsOptions,
) -> Result<PerformanceResult> {
    let start_date = series
        .points
        .first()
        .map(|p| p.date)
        .unwrap_or(series.window.start);
    let end_date = series
        .points
        .last()
        .map(|p| p.date)
        .unwrap_or(series.window.end);
    let start_value = series.start_value();
    let end_value = series.end_value();
    let years = year_fraction(start_date, end_date);

    let mut notes: Vec<String> = series.notes.iter().map(|n| n.to_string()).collect();

    let returns = daily_returns(series)?;
    let twr = chained_growth(&returns)? - Decimal::ONE;

    let cagr = if start_value <= Decimal::ZERO {
        notes.push("CAGR undefined: start value is zero".to_string());
        None
    } else {
        let ratio = checked(end_value.checked_div(start_value), "CAGR ratio")?;
        annualize(ratio, years, "CAGR", &mut notes)
    };

    let annualized_twr = annualize(Decimal::ONE + twr, years, "annualized TWR", &mut notes);

    let mut xirr_flows = Vec::with_capacity(cash_flows.len() + 2);
    if start_value > Decimal::ZERO {
        xirr_flows.push((start_date, -start_value));
    }
    xirr_flows.extend(
        cash_flows
            .iter()
            .filter(|f| f.date > start_date && f.date <= end_date)
            .filter(|f| !f.external.is_zero())
            .map(|f| (f.date, f.external)),
    );
    xirr_flows.push((end_date, end_value));
    let xirr_rate = xirr(&xirr_flows, &options.solver)?;
    if xirr_rate.is_none() {
        notes.push(
            "XIRR undefined: no sign change in cash flows, no time span, or rate out of range"
                .to_string(),
        );
    }

    let volatility = annualized_volatility(&returns)?;

    let sharpe_ratio = match annualized_twr {
        Some(annual) if !volatility.is_zero() => {
            let excess = checked(annual.checked_sub(options.risk_free_rate), "Sharpe ratio")?;
            Some(checked(excess.checked_div(volatility), "Sharpe ratio")?)
        }
        _ => None,
    };

    let max_drawdown = max_drawdown(series)?;

    let mut net_cash_flow = Decimal::ZERO;
    for point in series.points.iter().skip(1) {
        net_cash_flow = checked(net_cash_flow.checked_add(point.cash_flow), "net cash flow")?;
    }

    debug!(
        "Computed metrics over {} returns from {} to {}",
        returns.len(),
        start_date,
        end_date
    );

    Ok(PerformanceResult {
        period: options.period,
        start_date,
        end_date,
        cagr: cagr.map(round),
        xirr: xirr_rate,
        twr: round(twr),
        annualized_twr: annualized_twr.map(round),
        mwr: xirr_rate,
        volatility: round(volatility),
        sharpe_ratio: sharpe_ratio.map(round),
        max_drawdown: round(max_drawdown),
        start_value: round(start_value),
        end_value: round(end_value),
        net_cash_flow: round(net_cash_flow),
        notes,
    })
}

/// Sub-period returns between consecutive points.
///
/// `r = (V - CF - V_prev) / V_prev` with `CF` the inflow on the later day.
/// When the portfolio was empty and money came in, the inflow is the
/// denominator. Sub-periods with neither are skipped.
pub fn daily_returns(series: &ValuationSeries) -> Result<Vec<Decimal>> {
    let mut returns = Vec::with_capacity(series.points.len());
    for pair in series.points.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let denominator = if prev.total_value > Decimal::ZERO {
            prev.total_value
        } else if curr.cash_flow > Decimal::ZERO {
            curr.cash_flow
        } else {
            continue;
        };
        let gain = checked(
            curr.total_value
                .checked_sub(curr.cash_flow)
                .and_then(|v| v.checked_sub(prev.total_value)),
            "daily return",
        )?;
        returns.push(checked(gain.checked_div(denominator), "daily return")?);
    }
    Ok(returns)
}

/// Flow-neutral growth of one unit over the chained returns.
fn chained_growth(returns: &[Decimal]) -> Result<Decimal> {
    let mut value = Decimal::ONE;
    for r in returns {
        value = checked(
            Decimal::ONE.checked_add(*r).and_then(|g| value.checked_mul(g)),
            "growth index",
        )?;
    }
    Ok(value)
}

/// `base^(1/years) - 1`, or `None` with a note when that is undefined.
fn annualize(
    base: Decimal,
    years: Decimal,
    label: &str,
    notes: &mut Vec<String>,
) -> Option<Decimal> {
    if years <= Decimal::ZERO {
        notes.push(format!("{} undefined: window has no length", label));
        return None;
    }
    if base <= Decimal::ZERO {
        // wiped out
        return Some(dec!(-1));
    }
    if base == Decimal::ONE {
        return Some(Decimal::ZERO);
    }
    let exponent = Decimal::ONE / years;
    match base.checked_powd(exponent) {
        Some(grown) => Some(grown - Decimal::ONE),
        None => {
            notes.push(format!("{} undefined: annualization overflowed", label));
            None
        }
    }
}

fn annualized_volatility(returns: &[Decimal]) -> Result<Decimal> {
    if returns.len() < 2 {
        return Ok(Decimal::ZERO);
    }

    let count = Decimal::from(returns.len());
    let mut total = Decimal::ZERO;
    for r in returns {
        total = checked(total.checked_add(*r), "volatility")?;
    }
    let mean = total / count;

    let mut sum_squared_diff = Decimal::ZERO;
    for r in returns {
        let squared = r
            .checked_sub(mean)
            .and_then(|diff| diff.checked_mul(diff));
        sum_squared_diff = checked(
            squared.and_then(|sq| sum_squared_diff.checked_add(sq)),
            "volatility",
        )?;
    }

    let variance = sum_squared_diff / (count - Decimal::ONE);
    if variance <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let daily_volatility = variance.sqrt().unwrap_or(Decimal::ZERO);

    let annualization_factor = Decimal::from(TRADING_DAYS_PER_YEAR)
        .sqrt()
        .unwrap_or(SQRT_TRADING_DAYS_APPROX);

    checked(daily_volatility.checked_mul(annualization_factor), "volatility")
}

/// Largest peak-to-trough decline of the portfolio value, as a positive
/// fraction of the running peak.
fn max_drawdown(series: &ValuationSeries) -> Result<Decimal> {
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;
    for value in series.points.iter().map(|p| p.total_value) {
        peak = peak.max(value);
        if peak > Decimal::ZERO {
            let drawdown = checked((peak - value).checked_div(peak), "drawdown")?;
            worst = worst.max(drawdown);
        }
    }
    Ok(worst.max(Decimal::ZERO))
}

fn round(value: Decimal) -> Decimal {
    value.round_dp(DECIMAL_PRECISION)
}

fn checked(value: Option<Decimal>, what: &str) -> Result<Decimal> {
    value.ok_or_else(|| {
        ValidationError::InvalidInput(format!("{} is too large to represent", what)).into()
    })
}
