/// Ticker symbol as supplied by the caller (e.g. "AAPL", "SPY")
pub type Symbol = String;
