//! Core error types for the performance engine.
//!
//! Price provider failures arrive as [`MarketDataError`] and are wrapped as-is so
//! callers can still inspect their retry class.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use perfolio_market_data::errors::MarketDataError;
use thiserror::Error;

use crate::transactions::TransactionError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(#[from] TransactionError),

    #[error("No price available for {symbol} on or before {date}")]
    PriceUnavailable { symbol: String, date: NaiveDate },

    #[error("Rate solver did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Flat classification of [`Error`] for callers that map errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidPeriod,
    InvalidTransaction,
    PriceUnavailable,
    NoConvergence,
    SymbolNotFound,
    ProviderUnavailable,
    Validation,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPeriod(_) => ErrorKind::InvalidPeriod,
            Error::InvalidTransaction(_) => ErrorKind::InvalidTransaction,
            Error::PriceUnavailable { .. } => ErrorKind::PriceUnavailable,
            Error::NoConvergence { .. } => ErrorKind::NoConvergence,
            Error::MarketData(e) => match e {
                MarketDataError::SymbolNotFound(_) => ErrorKind::SymbolNotFound,
                MarketDataError::ProviderUnavailable { .. } => ErrorKind::ProviderUnavailable,
                MarketDataError::InvalidRange { .. } => ErrorKind::Validation,
                _ => ErrorKind::Internal,
            },
            Error::Validation(_) => ErrorKind::Validation,
            Error::Unexpected(_) => ErrorKind::Internal,
        }
    }
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
