//! Price series provider trait definition.
//!
//! The performance engine never fetches prices itself. It asks a
//! `PriceSeriesProvider` for daily closes and works with whatever comes back.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::PriceBar;

/// Source of daily closing prices.
///
/// Implementations must return bars sorted ascending by date with at most one
/// bar per date, all within `[start, end]` inclusive. Gaps (weekends, holidays)
/// are expected; callers forward-fill.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use perfolio_market_data::provider::PriceSeriesProvider;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl PriceSeriesProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn get_daily_prices(
///         &self,
///         symbol: &str,
///         start: NaiveDate,
///         end: NaiveDate,
///     ) -> Result<Vec<PriceBar>, MarketDataError> {
///         // ... fetch closes
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch daily closes for `symbol` between `start` and `end` inclusive.
    ///
    /// An empty vector means the symbol is known but has no bars in the range.
    /// An unknown symbol is [`MarketDataError::SymbolNotFound`].
    async fn get_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError>;
}

/// Rejects inverted ranges before any provider work is done.
pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), MarketDataError> {
    if start > end {
        return Err(MarketDataError::InvalidRange { start, end });
    }
    Ok(())
}
