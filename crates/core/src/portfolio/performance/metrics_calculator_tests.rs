use super::*;
use crate::errors::Error;
use crate::portfolio::cash_flow::normalize;
use crate::portfolio::period::DateWindow;
use crate::portfolio::valuation::{build, PriceHistory, ValuationPoint, ValuationSeries};
use crate::transactions::Transaction;
use chrono::{Duration, NaiveDate};
use perfolio_market_data::PriceBar;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day0() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn day(n: i64) -> NaiveDate {
    day0() + Duration::days(n)
}

fn prices(symbol: &str, closes: &[(i64, Decimal)]) -> PriceHistory {
    let mut history = PriceHistory::new();
    history.insert(
        symbol.to_string(),
        closes
            .iter()
            .map(|(n, c)| PriceBar::new(day(*n), *c))
            .collect(),
    );
    history
}

fn run(
    transactions: &[Transaction],
    history: &PriceHistory,
    window: DateWindow,
    options: &MetricsOptions,
) -> crate::errors::Result<PerformanceResult> {
    let series = build(transactions, history, window)?;
    let flows = normalize(transactions)?;
    compute(&series, &flows, options)
}

fn series(points: &[(i64, Decimal, Decimal)]) -> ValuationSeries {
    let points: Vec<ValuationPoint> = points
        .iter()
        .map(|(n, value, flow)| ValuationPoint {
            date: day(*n),
            total_value: *value,
            cash_flow: *flow,
        })
        .collect();
    ValuationSeries {
        window: DateWindow::custom(points[0].date, points[points.len() - 1].date).unwrap(),
        points,
        notes: Vec::new(),
    }
}

fn close_to(actual: Decimal, expected: Decimal, tolerance: Decimal) -> bool {
    (actual - expected).abs() <= tolerance
}

#[test]
fn test_constant_prices_without_flows() {
    let txns = vec![Transaction::buy("b", day(-30), "X", dec!(10), dec!(50))];
    let closes: Vec<(i64, Decimal)> = (-30..=90).map(|n| (n, dec!(50))).collect();
    let window = DateWindow::custom(day(0), day(90)).unwrap();

    let result = run(&txns, &prices("X", &closes), window, &MetricsOptions::default()).unwrap();
    assert_eq!(result.cagr, Some(dec!(0)));
    assert_eq!(result.volatility, dec!(0));
    assert_eq!(result.twr, dec!(0));
    assert_eq!(result.max_drawdown, dec!(0));
    assert_eq!(result.sharpe_ratio, None);
    assert_eq!(result.start_value, dec!(500));
    assert_eq!(result.end_value, dec!(500));
    assert_eq!(result.net_cash_flow, dec!(0));
}

#[test]
fn test_ten_percent_year_end_to_end() {
    let txns = vec![Transaction::buy("b", day(0), "X", dec!(10), dec!(100))];
    let closes: Vec<(i64, Decimal)> = (0..=365)
        .map(|n| (n, dec!(100) + Decimal::from(10 * n) / dec!(365)))
        .collect();
    let window = DateWindow::custom(day(0), day(365)).unwrap();

    let result = run(&txns, &prices("X", &closes), window, &MetricsOptions::default()).unwrap();
    assert_eq!(result.start_value, dec!(1000));
    assert_eq!(result.end_value, dec!(1100));
    assert!(close_to(result.twr, dec!(0.1), dec!(0.000001)), "{:?}", result);
    assert!(close_to(result.cagr.unwrap(), dec!(0.1), dec!(0.001)), "{:?}", result);
    assert!(close_to(result.xirr.unwrap(), dec!(0.1), dec!(0.0001)), "{:?}", result);
    assert_eq!(result.mwr, result.xirr);
    assert_eq!(result.max_drawdown, dec!(0));
    assert!(result.notes.is_empty(), "{:?}", result.notes);
}

#[test]
fn test_fluctuating_prices_have_volatility_and_bounded_drawdown() {
    let txns = vec![Transaction::buy("b", day(0), "X", dec!(10), dec!(100))];
    let closes: Vec<(i64, Decimal)> = (0..=365)
        .map(|n| {
            let trend = dec!(100) + Decimal::from(10 * n) / dec!(365);
            let wiggle = if n % 2 == 1 && n != 365 {
                dec!(-3)
            } else {
                dec!(0)
            };
            (n, trend + wiggle)
        })
        .collect();

    let mut peak = Decimal::ZERO;
    let mut largest_dip = Decimal::ZERO;
    for (_, close) in &closes {
        peak = peak.max(*close);
        largest_dip = largest_dip.max((peak - close) / peak);
    }

    let window = DateWindow::custom(day(0), day(365)).unwrap();
    let result = run(&txns, &prices("X", &closes), window, &MetricsOptions::default()).unwrap();
    assert!(result.volatility > dec!(0));
    assert!(result.max_drawdown > dec!(0));
    assert!(result.max_drawdown <= largest_dip + dec!(0.000001));
    assert!(close_to(result.twr, dec!(0.1), dec!(0.000001)));
}

#[test]
fn test_twr_ignores_deposit_and_matching_withdrawal() {
    let base = vec![Transaction::buy("b", day(0), "X", dec!(10), dec!(100))];
    let mut with_flows = base.clone();
    with_flows.push(Transaction::deposit("d", day(1), dec!(5000)));
    with_flows.push(Transaction::withdrawal("w", day(3), dec!(5000)));

    let history = prices(
        "X",
        &[
            (0, dec!(100)),
            (1, dec!(105)),
            (2, dec!(105)),
            (3, dec!(105)),
            (4, dec!(110)),
        ],
    );
    let window = DateWindow::custom(day(0), day(4)).unwrap();
    let options = MetricsOptions::default();

    let plain = run(&base, &history, window, &options).unwrap();
    let flowed = run(&with_flows, &history, window, &options).unwrap();
    assert_eq!(plain.twr, flowed.twr);
    assert_eq!(plain.twr, dec!(0.1));
    assert_eq!(flowed.net_cash_flow, dec!(0));
}

#[test]
fn test_cagr_undefined_for_zero_start_value() {
    let txns = vec![Transaction::deposit("d", day(10), dec!(1000))];
    let window = DateWindow::custom(day(0), day(20)).unwrap();
    let result = run(&txns, &PriceHistory::new(), window, &MetricsOptions::default()).unwrap();
    assert_eq!(result.cagr, None);
    assert!(result.notes.iter().any(|n| n.starts_with("CAGR undefined")));
    assert_eq!(result.start_value, dec!(0));
    assert_eq!(result.twr, dec!(0));
    assert_eq!(result.net_cash_flow, dec!(1000));
}

#[test]
fn test_empty_portfolio_sub_period_uses_inflow_as_base() {
    let s = series(&[(0, dec!(0), dec!(0)), (1, dec!(1100), dec!(1000))]);
    assert_eq!(daily_returns(&s).unwrap(), vec![dec!(0.1)]);

    let s = series(&[(0, dec!(0), dec!(0)), (1, dec!(0), dec!(0))]);
    assert!(daily_returns(&s).unwrap().is_empty());
}

#[test]
fn test_max_drawdown_from_peak() {
    let s = series(&[
        (0, dec!(100), dec!(100)),
        (100, dec!(120), dec!(0)),
        (200, dec!(90), dec!(0)),
        (300, dec!(130), dec!(0)),
    ]);
    let result = compute(&s, &[], &MetricsOptions::default()).unwrap();
    assert_eq!(result.max_drawdown, dec!(0.25));
    assert_eq!(result.twr, dec!(0.3));
}

#[test]
fn test_sharpe_uses_risk_free_rate() {
    let s = series(&[
        (0, dec!(100), dec!(100)),
        (30, dec!(102), dec!(0)),
        (60, dec!(101), dec!(0)),
        (90, dec!(104), dec!(0)),
    ]);
    let options = MetricsOptions {
        risk_free_rate: dec!(0.03),
        ..MetricsOptions::default()
    };
    let result = compute(&s, &[], &options).unwrap();
    let annual = result.annualized_twr.unwrap();
    let expected = (annual - dec!(0.03)) / result.volatility;
    assert!(close_to(result.sharpe_ratio.unwrap(), expected, dec!(0.001)));
}

#[test]
fn test_single_day_window_has_no_annualized_metrics() {
    let s = series(&[(0, dec!(100), dec!(100))]);
    let result = compute(&s, &[], &MetricsOptions::default()).unwrap();
    assert_eq!(result.cagr, None);
    assert_eq!(result.annualized_twr, None);
    assert_eq!(result.xirr, None);
    assert_eq!(result.twr, dec!(0));
}

#[test]
fn test_solver_cap_surfaces_no_convergence() {
    let s = series(&[(0, dec!(1000), dec!(1000)), (517, dec!(1737), dec!(0))]);
    let options = MetricsOptions {
        solver: SolverConfig {
            max_iterations: 1,
            tolerance: 1e-12,
            initial_guess: 0.1,
        },
        ..MetricsOptions::default()
    };
    let err = compute(&s, &[], &options).unwrap_err();
    assert!(matches!(err, Error::NoConvergence { .. }));
}

#[test]
fn test_result_serializes_camel_case_with_nulls() {
    let s = series(&[(0, dec!(0), dec!(0)), (10, dec!(0), dec!(0))]);
    let result = compute(&s, &[], &MetricsOptions::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["cagr"].is_null());
    assert!(json["sharpeRatio"].is_null());
    assert!(json.get("maxDrawdown").is_some());
    assert_eq!(json["startDate"], "2023-01-01");
}

fn linear_year() -> Vec<(i64, Decimal)> {
    (0..=365)
        .map(|n| (n, dec!(100) + Decimal::from(10 * n) / dec!(365)))
        .collect()
}

#[test]
fn test_deposit_funded_buy_matches_plain_buy() {
    let plain = vec![Transaction::buy("b", day(0), "X", dec!(10), dec!(100))];
    let funded = vec![
        Transaction::deposit("d", day(0), dec!(1000)),
        Transaction::buy("b", day(0), "X", dec!(10), dec!(100)),
    ];
    let history = prices("X", &linear_year());
    let window = DateWindow::custom(day(0), day(365)).unwrap();
    let options = MetricsOptions::default();

    let a = run(&plain, &history, window, &options).unwrap();
    let b = run(&funded, &history, window, &options).unwrap();
    assert_eq!(b.start_value, dec!(1000));
    assert_eq!(b.end_value, dec!(1100));
    assert_eq!(b.twr, a.twr);
    assert_eq!(b.cagr, a.cagr);
    assert_eq!(b.xirr, a.xirr);
    assert!(close_to(b.xirr.unwrap(), dec!(0.1), dec!(0.0001)), "{:?}", b);
}

#[test]
fn test_buy_after_deposit_is_not_a_flow() {
    let txns = vec![
        Transaction::deposit("d", day(0), dec!(1000)),
        Transaction::buy("b", day(1), "X", dec!(10), dec!(100)),
    ];
    let mut closes = vec![(1, dec!(100))];
    closes.extend((2..=365).map(|n| (n, dec!(100) + Decimal::from(10 * n) / dec!(365))));
    let window = DateWindow::custom(day(0), day(365)).unwrap();

    let result = run(&txns, &prices("X", &closes), window, &MetricsOptions::default()).unwrap();
    assert_eq!(result.start_value, dec!(1000));
    assert_eq!(result.end_value, dec!(1100));
    assert_eq!(result.net_cash_flow, dec!(0));
    assert!(close_to(result.twr, dec!(0.1), dec!(0.000001)), "{:?}", result);
    assert!(close_to(result.xirr.unwrap(), dec!(0.1), dec!(0.0001)), "{:?}", result);
}

#[test]
fn test_max_drawdown_follows_portfolio_value() {
    // the price falls 10% but a deposit the same day lifts the total
    let txns = vec![
        Transaction::buy("b", day(0), "X", dec!(10), dec!(100)),
        Transaction::deposit("d", day(1), dec!(1000)),
    ];
    let history = prices("X", &[(0, dec!(100)), (1, dec!(90)), (2, dec!(90))]);
    let window = DateWindow::custom(day(0), day(2)).unwrap();

    let series = build(&txns, &history, window).unwrap();
    let values: Vec<_> = series.points.iter().map(|p| p.total_value).collect();
    assert_eq!(values, vec![dec!(1000), dec!(1900), dec!(1900)]);

    let result = compute(&series, &normalize(&txns).unwrap(), &MetricsOptions::default()).unwrap();
    assert_eq!(result.max_drawdown, dec!(0));
    assert_eq!(result.twr, dec!(-0.1));
}

#[test]
fn test_huge_risk_free_rate_is_a_validation_error() {
    let s = series(&[
        (0, dec!(100), dec!(100)),
        (30, dec!(102), dec!(0)),
        (60, dec!(101), dec!(0)),
    ]);
    let options = MetricsOptions {
        risk_free_rate: Decimal::MIN,
        ..MetricsOptions::default()
    };
    let err = compute(&s, &[], &options).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
