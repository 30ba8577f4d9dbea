use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::price_table::{PriceHistory, PriceTable};
use super::valuation_model::{DataQualityNote, ValuationPoint, ValuationSeries};
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::cash_flow::{normalize, HoldingState};
use crate::portfolio::period::DateWindow;
use crate::transactions::{ordered, Transaction};

/// Reconstructs the daily value of the portfolio over `window`.
///
/// Grid days are the window start and end, every in-window bar date of any
/// supplied series, and every in-window transaction date. Transactions dated
/// before the window are replayed silently before the first point. On each grid
/// day the value is the forward-filled market value of every position plus the
/// uninvested cash sleeve. A point's `cash_flow` only counts money that crossed
/// the portfolio boundary: a buy paid from the sleeve is not a flow.
///
/// A held symbol with no close yet contributes zero and is reported in
/// `notes`. A held symbol with no close at all up to the window end fails with
/// `PriceUnavailable`.
pub fn build(
    transactions: &[Transaction],
    prices: &PriceHistory,
    window: DateWindow,
) -> Result<ValuationSeries> {
    // full validation, including records after the window
    normalize(transactions)?;

    let table = PriceTable::new(prices);
    let replay = ordered(transactions);

    let mut grid: BTreeSet<NaiveDate> = BTreeSet::new();
    grid.insert(window.start);
    grid.insert(window.end);
    grid.extend(table.bar_dates_within(window));
    grid.extend(
        replay
            .iter()
            .map(|t| t.date)
            .filter(|d| window.contains(*d)),
    );

    let mut state = HoldingState::new();
    let mut next = 0usize;
    let mut gaps: BTreeMap<String, DataQualityNote> = BTreeMap::new();
    let mut points = Vec::with_capacity(grid.len());

    for day in grid {
        let mut inflow = Decimal::ZERO;
        while next < replay.len() && replay[next].date <= day {
            let txn = replay[next];
            let settled = state.apply(txn)?;
            if txn.date >= window.start {
                inflow = inflow
                    .checked_sub(settled.external)
                    .ok_or_else(|| too_large("net cash flow", day))?;
            }
            next += 1;
        }

        let mut positions: Vec<(&str, Decimal)> = state.positions().collect();
        positions.sort_by(|a, b| a.0.cmp(b.0));

        let mut total_value = state.cash();
        for (symbol, quantity) in positions {
            match table.close_on_or_before(symbol, day) {
                Some(close) => {
                    total_value = quantity
                        .checked_mul(close)
                        .and_then(|market_value| total_value.checked_add(market_value))
                        .ok_or_else(|| too_large("portfolio value", day))?;
                }
                None => {
                    if table.close_on_or_before(symbol, window.end).is_none() {
                        return Err(Error::PriceUnavailable {
                            symbol: symbol.to_string(),
                            date: window.end,
                        });
                    }
                    record_gap(&mut gaps, symbol, day);
                }
            }
        }

        points.push(ValuationPoint {
            date: day,
            total_value,
            cash_flow: inflow,
        });
    }

    let notes: Vec<DataQualityNote> = gaps.into_values().collect();
    for note in &notes {
        warn!("{}", note);
    }
    debug!(
        "Built {} valuation points for [{}, {}]",
        points.len(),
        window.start,
        window.end
    );

    Ok(ValuationSeries {
        window,
        points,
        notes,
    })
}

fn too_large(what: &str, day: NaiveDate) -> Error {
    ValidationError::InvalidInput(format!("{} on {} is too large to represent", what, day)).into()
}

fn record_gap(gaps: &mut BTreeMap<String, DataQualityNote>, symbol: &str, day: NaiveDate) {
    gaps.entry(symbol.to_string())
        .and_modify(|note| {
            note.last_date = day;
            note.days += 1;
        })
        .or_insert_with(|| DataQualityNote {
            symbol: symbol.to_string(),
            first_date: day,
            last_date: day,
            days: 1,
        });
}
