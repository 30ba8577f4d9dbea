//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for price series operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while fetching or loading daily price series.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which tells callers whether a second attempt can help.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol is unknown to the provider.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider could not serve the request (outage, timeout, rejected call).
    #[error("Provider unavailable: {provider} - {message}")]
    ProviderUnavailable {
        /// The provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The requested date range is empty or inverted.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Bar validation failed.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A price store could not be read from disk.
    #[error("Price store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A price store could not be parsed.
    #[error("Price store parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MarketDataError {
    /// Convenience constructor for [`MarketDataError::ProviderUnavailable`].
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// ```
    /// use perfolio_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::unavailable("FILE", "timed out");
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::ProviderUnavailable { .. } => RetryClass::WithBackoff,
            Self::SymbolNotFound(_)
            | Self::InvalidRange { .. }
            | Self::ValidationFailed { .. }
            | Self::Io(_)
            | Self::Parse(_) => RetryClass::Never,
        }
    }
}
