use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a transaction cannot be normalized.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransactionError {
    #[error("Transaction {id}: {field} must not be negative (got {value})")]
    NegativeValue {
        id: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("Transaction {id}: required field '{field}' is missing")]
    MissingField { id: String, field: &'static str },

    #[error(
        "Transaction {id}: selling {requested} {symbol} on {date} exceeds the {held} held"
    )]
    Oversell {
        id: String,
        symbol: String,
        date: NaiveDate,
        requested: Decimal,
        held: Decimal,
    },

    #[error(
        "Transaction {id}: withdrawing {requested} on {date} exceeds the {available} cash available"
    )]
    InsufficientCash {
        id: String,
        date: NaiveDate,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Transaction {id}: {what} is too large to represent")]
    Overflow { id: String, what: &'static str },

    #[error("Unknown transaction type: {0}")]
    UnknownType(String),
}
