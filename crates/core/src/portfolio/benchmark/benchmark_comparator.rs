use log::{debug, warn};
use rust_decimal::Decimal;

use super::benchmark_model::BenchmarkReplay;
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::cash_flow::{is_quantity_significant, normalize, HoldingState};
use crate::portfolio::performance::{compute, MetricsOptions, PerformanceResult};
use crate::portfolio::period::DateWindow;
use crate::portfolio::valuation::{build, PriceHistory, PriceTable};
use crate::transactions::{ordered, Transaction, TransactionType};
use perfolio_market_data::PriceBar;

/// Statistics the portfolio would have had if every trade had gone into
/// `benchmark_symbol` instead.
///
/// Buys spend their cash (including fees) on benchmark shares at the
/// forward-filled close; sells raise their net proceeds by selling benchmark
/// shares. Both settle against the same cash sleeve the portfolio has, so
/// deposits and withdrawals carry over. Dividends are dropped.
pub fn compare(
    transactions: &[Transaction],
    benchmark_symbol: &str,
    benchmark_prices: &[PriceBar],
    window: DateWindow,
    options: &MetricsOptions,
) -> Result<PerformanceResult> {
    let mut history = PriceHistory::new();
    history.insert(benchmark_symbol.to_string(), benchmark_prices.to_vec());

    let replay = synthesize(transactions, benchmark_symbol, &history)?;
    let series = build(&replay.transactions, &history, window)?;
    let flows = normalize(&replay.transactions)?;

    let mut result = compute(&series, &flows, options)?;
    result.notes.extend(replay.notes);
    Ok(result)
}

/// Rewrites `transactions` as trades in `benchmark_symbol`.
///
/// Fails with `PriceUnavailable` when a buy or sell date has no benchmark
/// close at or before it. A sale larger than the hypothetical holding sells
/// what is left, and a withdrawal larger than the hypothetical cash takes what
/// is left; both record a note.
pub fn synthesize(
    transactions: &[Transaction],
    benchmark_symbol: &str,
    history: &PriceHistory,
) -> Result<BenchmarkReplay> {
    // surfaces invalid records and oversells before anything is priced
    normalize(transactions)?;

    let table = PriceTable::new(history);
    let mut state = HoldingState::new();
    let mut synthetic = Vec::with_capacity(transactions.len());
    let mut notes = Vec::new();

    for txn in ordered(transactions) {
        let mapped = match txn.transaction_type {
            TransactionType::Buy => {
                let cash = txn
                    .cash_value()?
                    .checked_add(txn.fees)
                    .ok_or_else(|| txn.overflow("cash value plus fees"))?;
                let close = close_at(&table, benchmark_symbol, txn)?;
                let shares = shares_for(cash, close)?;
                Some(Transaction::buy(
                    txn.id.clone(),
                    txn.date,
                    benchmark_symbol,
                    shares,
                    close,
                ))
            }
            TransactionType::Sell => {
                let proceeds = txn
                    .cash_value()?
                    .checked_sub(txn.fees)
                    .ok_or_else(|| txn.overflow("cash value less fees"))?
                    .max(Decimal::ZERO);
                let close = close_at(&table, benchmark_symbol, txn)?;
                let held = state.quantity(benchmark_symbol);
                let mut shares = shares_for(proceeds, close)?;
                if shares > held {
                    if is_quantity_significant(&(shares - held)) {
                        notes.push(shortfall_note(format!(
                            "Benchmark {} holding could not cover sale {} on {}; sold the remaining {} shares",
                            benchmark_symbol,
                            txn.id,
                            txn.date,
                            held.round_dp(8)
                        )));
                    }
                    shares = held;
                }
                (!shares.is_zero()).then(|| {
                    Transaction::sell(txn.id.clone(), txn.date, benchmark_symbol, shares, close)
                })
            }
            TransactionType::Deposit => Some(txn.clone()),
            TransactionType::Withdrawal => {
                let requested = txn.cash_value()?;
                let available = state.cash();
                if requested > available {
                    if is_quantity_significant(&(requested - available)) {
                        notes.push(shortfall_note(format!(
                            "Benchmark cash could not cover withdrawal {} of {} on {}; withdrew the remaining {}",
                            txn.id,
                            requested,
                            txn.date,
                            available.round_dp(2)
                        )));
                    }
                    let mut capped = txn.clone();
                    capped.amount = Some(available);
                    (!available.is_zero()).then_some(capped)
                } else {
                    Some(txn.clone())
                }
            }
            TransactionType::Dividend => None,
        };

        if let Some(mapped) = mapped {
            state.apply(&mapped)?;
            synthetic.push(mapped);
        }
    }

    debug!(
        "Benchmark {} replay: {} of {} transactions kept",
        benchmark_symbol,
        synthetic.len(),
        transactions.len()
    );
    Ok(BenchmarkReplay {
        transactions: synthetic,
        notes,
    })
}

fn shares_for(cash: Decimal, close: Decimal) -> Result<Decimal> {
    cash.checked_div(close).ok_or_else(|| {
        ValidationError::InvalidInput("benchmark share count is too large to represent".into())
            .into()
    })
}

fn shortfall_note(note: String) -> String {
    warn!("{}", note);
    note
}

fn close_at(table: &PriceTable, symbol: &str, txn: &Transaction) -> Result<Decimal> {
    table
        .close_on_or_before(symbol, txn.date)
        .ok_or_else(|| Error::PriceUnavailable {
            symbol: symbol.to_string(),
            date: txn.date,
        })
}
