use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use perfolio_core::{PerformanceService, PerformanceServiceConfig, PerformanceServiceTrait};
use perfolio_market_data::{
    load_price_file, InMemoryPriceProvider, PriceBar, PriceSeriesProvider, TimeoutPriceProvider,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub performance_service: Arc<dyn PerformanceServiceTrait + Send + Sync>,
    pub service_config: PerformanceServiceConfig,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn PriceSeriesProvider>,
        service_config: PerformanceServiceConfig,
    ) -> Self {
        let performance_service = Arc::new(PerformanceService::with_config(
            provider,
            service_config.clone(),
        ));
        Self {
            performance_service,
            service_config,
        }
    }

    /// Service for one request: the shared one, or a throwaway one over the
    /// prices the caller sent along.
    pub fn service_for(
        &self,
        prices: Option<HashMap<String, Vec<PriceBar>>>,
    ) -> Arc<dyn PerformanceServiceTrait + Send + Sync> {
        match prices {
            Some(series) => {
                tracing::debug!("Using {} request-supplied price series", series.len());
                let provider = Arc::new(InMemoryPriceProvider::from_series(series));
                Arc::new(PerformanceService::with_config(
                    provider,
                    self.service_config.clone(),
                ))
            }
            None => self.performance_service.clone(),
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("PF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = match &config.prices_file {
        Some(path) => load_price_file(path)?,
        None => {
            tracing::warn!("PF_PRICES_FILE not set; only request-supplied prices are available");
            InMemoryPriceProvider::new()
        }
    };
    let provider: Arc<dyn PriceSeriesProvider> = Arc::new(TimeoutPriceProvider::new(
        Arc::new(store),
        config.provider_timeout,
    ));

    let service_config = PerformanceServiceConfig {
        risk_free_rate: config.risk_free_rate,
        ..PerformanceServiceConfig::default()
    };

    Ok(Arc::new(AppState::new(provider, service_config)))
}
