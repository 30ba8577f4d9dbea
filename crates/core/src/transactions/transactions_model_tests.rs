use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_transaction_type_parses_case_insensitively() {
    assert_eq!("buy".parse::<TransactionType>().unwrap(), TransactionType::Buy);
    assert_eq!(
        " Withdrawal ".parse::<TransactionType>().unwrap(),
        TransactionType::Withdrawal
    );
    assert!(matches!(
        "SPLIT".parse::<TransactionType>(),
        Err(TransactionError::UnknownType(_))
    ));
}

#[test]
fn test_transaction_deserializes_from_camel_case_json() {
    let json = r#"{
        "id": "t1",
        "date": "2024-01-02",
        "symbol": "AAPL",
        "type": "buy",
        "quantity": 10,
        "price": 100.5,
        "fees": 1
    }"#;
    let txn: Transaction = serde_json::from_str(json).unwrap();
    assert_eq!(txn.transaction_type, TransactionType::Buy);
    assert_eq!(txn.quantity, Some(dec!(10)));
    assert_eq!(txn.price, Some(dec!(100.5)));
    assert_eq!(txn.fees, dec!(1));
    assert_eq!(txn.amount, None);

    let value = serde_json::to_value(&txn).unwrap();
    assert_eq!(value["type"], "BUY");
}

#[test]
fn test_cash_only_transaction_defaults() {
    let json = r#"{"date": "2024-01-02", "transactionType": "DEPOSIT", "amount": 500}"#;
    let txn: Transaction = serde_json::from_str(json).unwrap();
    assert_eq!(txn.id, "");
    assert_eq!(txn.fees, dec!(0));
    assert_eq!(txn.investor_flow().unwrap(), dec!(-500));
}

#[test]
fn test_investor_flow_signs_and_fees() {
    let d = date(2024, 1, 2);
    let buy = Transaction::buy("b", d, "X", dec!(10), dec!(100)).with_fees(dec!(5));
    assert_eq!(buy.investor_flow().unwrap(), dec!(-1005));

    let sell = Transaction::sell("s", d, "X", dec!(4), dec!(110)).with_fees(dec!(5));
    assert_eq!(sell.investor_flow().unwrap(), dec!(435));

    let dividend = Transaction::dividend("v", d, "X", dec!(12));
    assert_eq!(dividend.investor_flow().unwrap(), dec!(12));

    let withdrawal = Transaction::withdrawal("w", d, dec!(200));
    assert_eq!(withdrawal.investor_flow().unwrap(), dec!(200));
}

#[test]
fn test_cash_only_falls_back_to_quantity_times_price() {
    let mut dividend = Transaction::dividend("v", date(2024, 1, 2), "X", dec!(0));
    dividend.amount = None;
    dividend.quantity = Some(dec!(10));
    dividend.price = Some(dec!(0.5));
    assert_eq!(dividend.cash_value().unwrap(), dec!(5.0));

    dividend.quantity = None;
    assert!(matches!(
        dividend.cash_value(),
        Err(TransactionError::MissingField { field: "amount", .. })
    ));
}

#[test]
fn test_validate_rejects_negative_values() {
    let d = date(2024, 1, 2);
    let txn = Transaction::buy("b", d, "X", dec!(-1), dec!(100));
    assert!(matches!(
        txn.validate(),
        Err(TransactionError::NegativeValue { field: "quantity", .. })
    ));

    let txn = Transaction::deposit("d", d, dec!(100)).with_fees(dec!(-1));
    assert!(matches!(
        txn.validate(),
        Err(TransactionError::NegativeValue { field: "fees", .. })
    ));
}

#[test]
fn test_validate_requires_trade_fields() {
    let d = date(2024, 1, 2);
    let mut txn = Transaction::buy("b", d, "X", dec!(1), dec!(100));
    txn.symbol = None;
    assert!(matches!(
        txn.validate(),
        Err(TransactionError::MissingField { field: "symbol", .. })
    ));

    let mut txn = Transaction::sell("s", d, "X", dec!(1), dec!(100));
    txn.price = None;
    assert!(matches!(
        txn.validate(),
        Err(TransactionError::MissingField { field: "price", .. })
    ));
}

#[test]
fn test_ordered_is_stable_within_a_day() {
    let txns = vec![
        Transaction::deposit("late", date(2024, 1, 3), dec!(1)),
        Transaction::deposit("first", date(2024, 1, 2), dec!(1)),
        Transaction::deposit("second", date(2024, 1, 2), dec!(1)),
    ];
    let ids: Vec<&str> = ordered(&txns).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "late"]);
}

#[test]
fn test_oversized_cash_value_is_an_error() {
    let d = date(2024, 1, 2);
    let txn = Transaction::buy("b", d, "X", dec!(100000000000000000000), dec!(10000000000));
    assert!(matches!(
        txn.cash_value(),
        Err(TransactionError::Overflow { what: "cash value", .. })
    ));

    let max = Decimal::MAX;
    let txn = Transaction::deposit("d", d, max).with_fees(dec!(1));
    assert!(matches!(
        txn.investor_flow(),
        Err(TransactionError::Overflow { .. })
    ));
}
