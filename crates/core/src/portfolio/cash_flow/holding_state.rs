use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::constants::QUANTITY_THRESHOLD;
use crate::transactions::{Transaction, TransactionError, TransactionType};

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold = Decimal::from_str(QUANTITY_THRESHOLD).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}

/// What one applied transaction moved, from the investor's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledFlow {
    /// Full trade-level flow of the record.
    pub flow: Decimal,
    /// Part of `flow` that crossed the portfolio boundary. A buy paid from the
    /// cash sleeve is internal; only what the sleeve could not cover is external.
    pub external: Decimal,
}

/// Shares held per symbol plus the uninvested cash sleeve.
///
/// The sleeve settles trades: buys are paid from it first, sale proceeds land
/// in it, withdrawals come out of it. It never goes negative.
///
/// Only mutated by [`apply`](Self::apply), one transaction at a time in replay
/// order. Owned by a single computation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingState {
    quantities: HashMap<String, Decimal>,
    cash: Decimal,
}

impl HoldingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, symbol: &str) -> Decimal {
        self.quantities.get(symbol).copied().unwrap_or(Decimal::ZERO)
    }

    /// Symbols with a non-dust position.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.quantities.iter().map(|(s, q)| (s.as_str(), *q))
    }

    /// Uninvested cash.
    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// Validates `txn`, applies it and returns the money it moved.
    ///
    /// A sell larger than the position fails with `Oversell` and a withdrawal
    /// larger than the sleeve fails with `InsufficientCash`, unless the excess
    /// is dust. Dust positions are dropped.
    pub fn apply(&mut self, txn: &Transaction) -> Result<SettledFlow, TransactionError> {
        txn.validate()?;
        let flow = txn.investor_flow()?;

        let external = match txn.transaction_type {
            TransactionType::Buy => {
                let symbol = txn.require_symbol()?;
                let total = self
                    .quantity(symbol)
                    .checked_add(txn.traded_quantity()?)
                    .ok_or_else(|| txn.overflow("position"))?;
                if is_quantity_significant(&total) {
                    self.quantities.insert(symbol.to_string(), total);
                }
                // flow is minus the cost including fees
                self.settle(txn, flow)?
            }
            TransactionType::Sell => {
                let symbol = txn.require_symbol()?;
                let requested = txn.traded_quantity()?;
                let held = self.quantity(symbol);
                let remaining = held - requested;
                if remaining.is_sign_negative() && is_quantity_significant(&remaining) {
                    return Err(TransactionError::Oversell {
                        id: txn.id.clone(),
                        symbol: symbol.to_string(),
                        date: txn.date,
                        requested,
                        held,
                    });
                }
                if is_quantity_significant(&remaining) {
                    self.quantities.insert(symbol.to_string(), remaining);
                } else {
                    self.quantities.remove(symbol);
                }
                self.settle(txn, flow)?
            }
            TransactionType::Deposit => {
                self.credit(txn, txn.cash_value()?)?;
                flow
            }
            TransactionType::Withdrawal => {
                let requested = txn.cash_value()?;
                let shortfall = requested - self.cash;
                if shortfall > Decimal::ZERO && is_quantity_significant(&shortfall) {
                    return Err(TransactionError::InsufficientCash {
                        id: txn.id.clone(),
                        date: txn.date,
                        requested,
                        available: self.cash,
                    });
                }
                self.cash = (self.cash - requested).max(Decimal::ZERO);
                flow
            }
            // paid straight out to the investor
            TransactionType::Dividend => flow,
        };

        Ok(SettledFlow { flow, external })
    }

    /// Books a trade's net proceeds (negative for a cost) against the sleeve
    /// and returns the external part: the cost the sleeve could not cover.
    fn settle(&mut self, txn: &Transaction, proceeds: Decimal) -> Result<Decimal, TransactionError> {
        if proceeds >= Decimal::ZERO {
            self.credit(txn, proceeds)?;
            return Ok(Decimal::ZERO);
        }
        let cost = -proceeds;
        let paid = cost.min(self.cash);
        self.cash -= paid;
        Ok(-(cost - paid))
    }

    fn credit(&mut self, txn: &Transaction, amount: Decimal) -> Result<(), TransactionError> {
        self.cash = self
            .cash
            .checked_add(amount)
            .ok_or_else(|| txn.overflow("cash balance"))?;
        Ok(())
    }
}
