use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transactions_constants::*;
use super::transactions_errors::TransactionError;

/// Transaction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
            TransactionType::Dividend => TRANSACTION_TYPE_DIVIDEND,
            TransactionType::Deposit => TRANSACTION_TYPE_DEPOSIT,
            TransactionType::Withdrawal => TRANSACTION_TYPE_WITHDRAWAL,
        }
    }

    /// True for records valued by `amount` rather than shares traded.
    pub fn is_cash_only(&self) -> bool {
        is_cash_transaction(self.as_str())
    }

    /// True when the investor pays money into the portfolio.
    pub fn is_contribution(&self) -> bool {
        matches!(self, TransactionType::Buy | TransactionType::Deposit)
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            TRANSACTION_TYPE_DIVIDEND => Ok(TransactionType::Dividend),
            TRANSACTION_TYPE_DEPOSIT => Ok(TransactionType::Deposit),
            TRANSACTION_TYPE_WITHDRAWAL => Ok(TransactionType::Withdrawal),
            _ => Err(TransactionError::UnknownType(s.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = TransactionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded portfolio event. Immutable once recorded.
///
/// Records are ordered by `(date, position in the supplied slice)`; there is
/// no separate sequence field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "type", alias = "transactionType")]
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Cash value of a cash-only record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub fees: Decimal,
}

impl Transaction {
    pub fn buy(
        id: impl Into<String>,
        date: NaiveDate,
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self::trade(id, date, TransactionType::Buy, symbol, quantity, price)
    }

    pub fn sell(
        id: impl Into<String>,
        date: NaiveDate,
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self::trade(id, date, TransactionType::Sell, symbol, quantity, price)
    }

    pub fn deposit(id: impl Into<String>, date: NaiveDate, amount: Decimal) -> Self {
        Self::cash(id, date, TransactionType::Deposit, None, amount)
    }

    pub fn withdrawal(id: impl Into<String>, date: NaiveDate, amount: Decimal) -> Self {
        Self::cash(id, date, TransactionType::Withdrawal, None, amount)
    }

    pub fn dividend(
        id: impl Into<String>,
        date: NaiveDate,
        symbol: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self::cash(
            id,
            date,
            TransactionType::Dividend,
            Some(symbol.into()),
            amount,
        )
    }

    pub fn with_fees(mut self, fees: Decimal) -> Self {
        self.fees = fees;
        self
    }

    fn trade(
        id: impl Into<String>,
        date: NaiveDate,
        transaction_type: TransactionType,
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            symbol: Some(symbol.into()),
            transaction_type,
            quantity: Some(quantity),
            price: Some(price),
            amount: None,
            fees: Decimal::ZERO,
        }
    }

    fn cash(
        id: impl Into<String>,
        date: NaiveDate,
        transaction_type: TransactionType,
        symbol: Option<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            symbol,
            transaction_type,
            quantity: None,
            price: None,
            amount: Some(amount),
            fees: Decimal::ZERO,
        }
    }

    /// Checks signs and required fields. Does not look at holdings.
    pub fn validate(&self) -> std::result::Result<(), TransactionError> {
        self.check_non_negative("fees", Some(self.fees))?;
        self.check_non_negative("quantity", self.quantity)?;
        self.check_non_negative("price", self.price)?;
        self.check_non_negative("amount", self.amount)?;

        if !self.transaction_type.is_cash_only() {
            self.require_symbol()?;
            self.require("quantity", self.quantity)?;
            self.require("price", self.price)?;
        }
        self.cash_value().map(|_| ())
    }

    /// Symbol of a trade. Trades without one are invalid.
    pub fn require_symbol(&self) -> std::result::Result<&str, TransactionError> {
        self.symbol
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| self.missing("symbol"))
    }

    /// Shares traded. Zero for cash-only records.
    pub fn traded_quantity(&self) -> std::result::Result<Decimal, TransactionError> {
        if self.transaction_type.is_cash_only() {
            return Ok(Decimal::ZERO);
        }
        self.require("quantity", self.quantity)
    }

    /// Gross cash value before fees.
    ///
    /// Trades are worth `quantity x price`. Cash-only records use `amount`,
    /// falling back to `quantity x price` when no amount was recorded.
    pub fn cash_value(&self) -> std::result::Result<Decimal, TransactionError> {
        if self.transaction_type.is_cash_only() {
            if let Some(amount) = self.amount {
                return Ok(amount);
            }
            return match (self.quantity, self.price) {
                (Some(q), Some(p)) => q
                    .checked_mul(p)
                    .ok_or_else(|| self.overflow("cash value")),
                _ => Err(self.missing("amount")),
            };
        }
        let quantity = self.require("quantity", self.quantity)?;
        let price = self.require("price", self.price)?;
        quantity
            .checked_mul(price)
            .ok_or_else(|| self.overflow("cash value"))
    }

    /// Signed flow from the investor's side: negative when money goes into the
    /// portfolio (buy, deposit), positive when it comes back (sell, withdrawal,
    /// dividend). Fees always cost the investor.
    pub fn investor_flow(&self) -> std::result::Result<Decimal, TransactionError> {
        let value = self.cash_value()?;
        if self.transaction_type.is_contribution() {
            value
                .checked_add(self.fees)
                .map(|cost| -cost)
                .ok_or_else(|| self.overflow("cash value plus fees"))
        } else {
            value
                .checked_sub(self.fees)
                .ok_or_else(|| self.overflow("cash value less fees"))
        }
    }

    pub(crate) fn overflow(&self, what: &'static str) -> TransactionError {
        TransactionError::Overflow {
            id: self.id.clone(),
            what,
        }
    }

    fn require(
        &self,
        field: &'static str,
        value: Option<Decimal>,
    ) -> std::result::Result<Decimal, TransactionError> {
        value.ok_or_else(|| self.missing(field))
    }

    fn missing(&self, field: &'static str) -> TransactionError {
        TransactionError::MissingField {
            id: self.id.clone(),
            field,
        }
    }

    fn check_non_negative(
        &self,
        field: &'static str,
        value: Option<Decimal>,
    ) -> std::result::Result<(), TransactionError> {
        match value {
            Some(v) if v.is_sign_negative() && !v.is_zero() => {
                Err(TransactionError::NegativeValue {
                    id: self.id.clone(),
                    field,
                    value: v,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Returns the transactions in replay order: by date, ties kept in input order.
pub fn ordered(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    // sort_by_key is stable
    sorted.sort_by_key(|t| t.date);
    sorted
}
