//! Extended internal rate of return.
//!
//! Solves `sum(CF_i / (1 + r)^(t_i / 365)) = 0` for `r`, where `t_i` is the
//! number of days since the earliest flow. Newton-Raphson first, bisection if
//! Newton leaves the domain or runs out of iterations.

use chrono::NaiveDate;
use log::debug;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::performance_model::SolverConfig;
use crate::constants::{DECIMAL_PRECISION, XIRR_DAYS_PER_YEAR};
use crate::errors::{Error, Result};

/// Lowest rate tried by bisection. At -100% the discount factor is undefined.
const MIN_RATE: f64 = -0.999_999;

/// Bisection widens its upper bound up to here looking for a sign change.
const MAX_RATE: f64 = 1.0e15;

/// Annualized rate that zeroes the NPV of `flows`.
///
/// Returns `Ok(None)` when the rate is undefined: all flows share a sign, they
/// all fall on one date, or the rate lies outside `(-100%, MAX_RATE]`. Returns
/// `NoConvergence` when neither solver reaches `config.tolerance` within
/// `config.max_iterations`. The tolerance is absolute for rates up to 100% and
/// relative above that.
pub fn xirr(flows: &[(NaiveDate, Decimal)], config: &SolverConfig) -> Result<Option<Decimal>> {
    let flows: Vec<&(NaiveDate, Decimal)> = flows.iter().filter(|(_, a)| !a.is_zero()).collect();

    let has_inflow = flows.iter().any(|(_, a)| a.is_sign_positive());
    let has_outflow = flows.iter().any(|(_, a)| a.is_sign_negative());
    if !has_inflow || !has_outflow {
        return Ok(None);
    }

    let Some(first_date) = flows.iter().map(|(d, _)| *d).min() else {
        return Ok(None);
    };

    let mut series: Vec<(f64, f64)> = Vec::with_capacity(flows.len());
    for (date, amount) in flows {
        let amount = amount.to_f64().ok_or_else(|| {
            Error::Unexpected(format!("cash flow {} does not fit in f64", amount))
        })?;
        let years = (*date - first_date).num_days() as f64 / XIRR_DAYS_PER_YEAR;
        series.push((amount, years));
    }

    if series.iter().all(|(_, t)| *t == 0.0) {
        return Ok(None);
    }

    let rate = match newton(&series, config) {
        Some(rate) => rate,
        None => match bisect(&series, config)? {
            Some(rate) => rate,
            None => {
                debug!("XIRR root lies outside the searchable range");
                return Ok(None);
            }
        },
    };

    Ok(Decimal::from_f64(rate).map(|r| r.round_dp(DECIMAL_PRECISION)))
}

fn converged(step: f64, rate: f64, tolerance: f64) -> bool {
    step.abs() < tolerance * rate.abs().max(1.0)
}

fn npv(series: &[(f64, f64)], rate: f64) -> f64 {
    series
        .iter()
        .map(|(amount, years)| amount / (1.0 + rate).powf(*years))
        .sum()
}

fn npv_and_derivative(series: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut derivative = 0.0;
    for (amount, years) in series {
        let discount = (1.0 + rate).powf(*years);
        npv += amount / discount;
        derivative -= years * amount / (discount * (1.0 + rate));
    }
    (npv, derivative)
}

fn newton(series: &[(f64, f64)], config: &SolverConfig) -> Option<f64> {
    let mut rate = config.initial_guess;
    for iteration in 0..config.max_iterations {
        let (value, derivative) = npv_and_derivative(series, rate);
        if !value.is_finite() || !derivative.is_finite() || derivative == 0.0 {
            debug!("XIRR Newton stalled at iteration {}", iteration);
            return None;
        }

        let next = rate - value / derivative;
        if !next.is_finite() || next <= -1.0 {
            debug!("XIRR Newton left the domain at iteration {}", iteration);
            return None;
        }
        if converged(next - rate, next, config.tolerance) {
            return Some(next);
        }
        rate = next;
    }
    None
}

/// `Ok(None)` when no sign change exists between `MIN_RATE` and `MAX_RATE`.
fn bisect(series: &[(f64, f64)], config: &SolverConfig) -> Result<Option<f64>> {
    let no_convergence = Error::NoConvergence {
        iterations: config.max_iterations,
    };

    let mut lo = MIN_RATE;
    let mut hi = 1.0;
    let npv_lo = npv(series, lo);
    let mut npv_hi = npv(series, hi);
    if npv_lo.is_nan() {
        return Err(no_convergence);
    }
    while npv_lo.signum() == npv_hi.signum() {
        hi *= 2.0;
        if hi > MAX_RATE {
            return Ok(None);
        }
        npv_hi = npv(series, hi);
    }

    let lo_sign = npv_lo.signum();
    for _ in 0..config.max_iterations {
        let mid = (lo + hi) / 2.0;
        if converged((hi - lo) / 2.0, mid, config.tolerance) {
            return Ok(Some(mid));
        }
        let value = npv(series, mid);
        if value == 0.0 {
            return Ok(Some(mid));
        }
        if value.signum() == lo_sign {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(no_convergence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn close_to(actual: Decimal, expected: Decimal, tolerance: Decimal) -> bool {
        (actual - expected).abs() <= tolerance
    }

    #[test]
    fn test_single_year_ten_percent() {
        let flows = [
            (date(2023, 1, 1), dec!(-1000)),
            (date(2024, 1, 1), dec!(1100)),
        ];
        let rate = xirr(&flows, &SolverConfig::default()).unwrap().unwrap();
        assert!(close_to(rate, dec!(0.10), dec!(0.0001)), "rate = {}", rate);
    }

    #[test]
    fn test_irregular_flows() {
        // deposits spread over the year, solution is roughly 8%
        let flows = [
            (date(2024, 1, 1), dec!(-1000)),
            (date(2024, 4, 1), dec!(-500)),
            (date(2024, 9, 1), dec!(-250)),
            (date(2025, 1, 1), dec!(1870)),
        ];
        let rate = xirr(&flows, &SolverConfig::default()).unwrap().unwrap();
        let residual: f64 = flows
            .iter()
            .map(|(d, a)| {
                let years = (*d - date(2024, 1, 1)).num_days() as f64 / 365.0;
                a.to_f64().unwrap() / (1.0 + rate.to_f64().unwrap()).powf(years)
            })
            .sum();
        assert!(residual.abs() < 0.01, "residual = {}", residual);
        assert!(rate > dec!(0.05) && rate < dec!(0.12));
    }

    #[test]
    fn test_total_loss_is_close_to_minus_one() {
        let flows = [
            (date(2023, 1, 1), dec!(-1000)),
            (date(2024, 1, 1), dec!(1)),
        ];
        let rate = xirr(&flows, &SolverConfig::default()).unwrap().unwrap();
        assert!(close_to(rate, dec!(-0.999), dec!(0.001)), "rate = {}", rate);
    }

    #[test]
    fn test_no_sign_change_is_undefined() {
        let flows = [
            (date(2023, 1, 1), dec!(1000)),
            (date(2024, 1, 1), dec!(1100)),
        ];
        assert_eq!(xirr(&flows, &SolverConfig::default()).unwrap(), None);
        assert_eq!(xirr(&[], &SolverConfig::default()).unwrap(), None);
    }

    #[test]
    fn test_same_day_flows_are_undefined() {
        let flows = [
            (date(2023, 1, 1), dec!(-1000)),
            (date(2023, 1, 1), dec!(1100)),
        ];
        assert_eq!(xirr(&flows, &SolverConfig::default()).unwrap(), None);
    }

    #[test]
    fn test_iteration_cap_reports_no_convergence() {
        let flows = [
            (date(2023, 1, 1), dec!(-1000)),
            (date(2024, 6, 1), dec!(1737)),
        ];
        let config = SolverConfig {
            max_iterations: 1,
            tolerance: 1e-12,
            initial_guess: 0.1,
        };
        let err = xirr(&flows, &config).unwrap_err();
        assert!(matches!(err, Error::NoConvergence { iterations: 1 }));
    }

    #[test]
    fn test_bisection_fallback_from_bad_guess() {
        let flows = [
            (date(2023, 1, 1), dec!(-1000)),
            (date(2024, 1, 1), dec!(1100)),
        ];
        // Newton from 500% jumps below -100%
        let config = SolverConfig {
            initial_guess: 5.0,
            ..SolverConfig::default()
        };
        let rate = xirr(&flows, &config).unwrap().unwrap();
        assert!(close_to(rate, dec!(0.10), dec!(0.0001)), "rate = {}", rate);
    }

    #[test]
    fn test_rate_beyond_search_range_is_undefined() {
        // a thousandfold gain in one day
        let flows = [
            (date(2023, 1, 1), dec!(-10)),
            (date(2023, 1, 2), dec!(10000)),
        ];
        assert_eq!(xirr(&flows, &SolverConfig::default()).unwrap(), None);
    }
}
