use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for reported metrics and valuations
pub const DECIMAL_PRECISION: u32 = 6;

/// Quantity threshold for significant positions
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Trading days used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Day count used to turn calendar days into years for CAGR and annualized TWR
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Day count convention of the XIRR discount factor
pub const XIRR_DAYS_PER_YEAR: f64 = 365.0;

/// Calendar days fetched before the earliest needed date so the first
/// valuation day can forward-fill across weekends and holidays
pub const PRICE_LOOKBACK_DAYS: i64 = 10;
