//! Deadline wrapper for providers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;

use super::traits::PriceSeriesProvider;
use crate::errors::MarketDataError;
use crate::models::PriceBar;

/// Bounds every call to the inner provider by a fixed deadline.
///
/// A call that exceeds the deadline becomes
/// [`MarketDataError::ProviderUnavailable`], which callers may retry.
pub struct TimeoutPriceProvider {
    inner: Arc<dyn PriceSeriesProvider>,
    timeout: Duration,
}

impl TimeoutPriceProvider {
    pub fn new(inner: Arc<dyn PriceSeriesProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl PriceSeriesProvider for TimeoutPriceProvider {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    async fn get_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        match tokio::time::timeout(self.timeout, self.inner.get_daily_prices(symbol, start, end))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{}: price request for {} timed out after {:?}",
                    self.inner.id(),
                    symbol,
                    self.timeout
                );
                Err(MarketDataError::unavailable(
                    self.inner.id(),
                    format!("request for {} timed out after {:?}", symbol, self.timeout),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RetryClass;
    use crate::provider::InMemoryPriceProvider;
    use rust_decimal_macros::dec;

    struct SlowProvider;

    #[async_trait]
    impl PriceSeriesProvider for SlowProvider {
        fn id(&self) -> &'static str {
            "SLOW"
        }

        async fn get_daily_prices(
            &self,
            _symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<PriceBar>, MarketDataError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out_as_retryable() {
        let provider = TimeoutPriceProvider::new(Arc::new(SlowProvider), Duration::from_secs(1));
        let err = provider
            .get_daily_prices("AAPL", day(1), day(2))
            .await
            .unwrap_err();
        assert_eq!(err.retry_class(), RetryClass::WithBackoff);
        assert!(err.to_string().contains("SLOW"));
    }

    #[tokio::test]
    async fn test_fast_provider_passes_through() {
        let inner = InMemoryPriceProvider::new()
            .with_series("AAPL", vec![PriceBar::new(day(1), dec!(10))]);
        let provider = TimeoutPriceProvider::new(Arc::new(inner), Duration::from_secs(1));
        let bars = provider
            .get_daily_prices("AAPL", day(1), day(2))
            .await
            .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(provider.id(), "MEMORY");
    }
}
