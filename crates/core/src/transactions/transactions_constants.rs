/// Transaction types
///
/// Wire names of the supported transaction categories. Parsing is
/// case-insensitive; serialization always uses these upper-case forms.

/// Purchase of a security. Money enters the portfolio as shares.
pub const TRANSACTION_TYPE_BUY: &str = "BUY";

/// Disposal of a security. Proceeds are paid out to the investor.
pub const TRANSACTION_TYPE_SELL: &str = "SELL";

/// Cash dividend paid out to the investor.
pub const TRANSACTION_TYPE_DIVIDEND: &str = "DIVIDEND";

/// Incoming funds from the investor. Increases the cash sleeve.
pub const TRANSACTION_TYPE_DEPOSIT: &str = "DEPOSIT";

/// Outgoing funds to the investor. Decreases the cash sleeve.
pub const TRANSACTION_TYPE_WITHDRAWAL: &str = "WITHDRAWAL";

/// Cash-only transaction types (valued by `amount`, or quantity x price)
pub const CASH_TRANSACTION_TYPES: [&str; 3] = [
    TRANSACTION_TYPE_DIVIDEND,
    TRANSACTION_TYPE_DEPOSIT,
    TRANSACTION_TYPE_WITHDRAWAL,
];

/// Returns true if the transaction type moves cash without trading shares.
pub fn is_cash_transaction(transaction_type: &str) -> bool {
    CASH_TRANSACTION_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(transaction_type))
}
