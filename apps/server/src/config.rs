use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use rust_decimal::Decimal;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 10_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// JSON price store loaded at startup; empty provider when unset
    pub prices_file: Option<PathBuf>,
    pub provider_timeout: Duration,
    pub risk_free_rate: Decimal,
}

impl Config {
    /// Reads `PF_*` variables. `.env` is loaded by the binary before this runs.
    pub fn from_env() -> Self {
        let listen_addr = parse_or("PF_LISTEN_ADDR", default_listen_addr);
        let cors_allow = std::env::var("PF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or("PF_REQUEST_TIMEOUT_MS", || DEFAULT_REQUEST_TIMEOUT_MS);
        let provider_timeout_ms: u64 =
            parse_or("PF_PROVIDER_TIMEOUT_MS", || DEFAULT_PROVIDER_TIMEOUT_MS);
        let prices_file = std::env::var("PF_PRICES_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let risk_free_rate = parse_or("PF_RISK_FREE_RATE", || Decimal::ZERO);
        Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            prices_file,
            provider_timeout: Duration::from_millis(provider_timeout_ms),
            risk_free_rate,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            prices_file: None,
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            risk_free_rate: Decimal::ZERO,
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Reads `key`, falling back to `default` with a warning when it does not parse.
fn parse_or<T, F>(key: &str, default: F) -> T
where
    T: FromStr,
    F: FnOnce() -> T,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {}={:?}; using the default", key, raw);
                default()
            }
        },
        Err(_) => default(),
    }
}
