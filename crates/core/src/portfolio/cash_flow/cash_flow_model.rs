use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::transactions::TransactionType;

/// A dated, signed money movement from the investor's perspective.
///
/// Negative amounts are money paid into the portfolio, positive amounts are
/// money returned to the investor. `amount` is the whole record; `external` is
/// the part that crossed the portfolio boundary once trades settled against
/// the cash sleeve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub external: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub transaction_type: TransactionType,
}

/// Groups flows that carry a symbol. Input order is kept within each group.
pub fn flows_by_symbol(flows: &[CashFlow]) -> HashMap<String, Vec<CashFlow>> {
    let mut grouped: HashMap<String, Vec<CashFlow>> = HashMap::new();
    for flow in flows {
        if let Some(symbol) = &flow.symbol {
            grouped.entry(symbol.clone()).or_default().push(flow.clone());
        }
    }
    grouped
}

/// Net external flow per date, ascending. Trades settled inside the cash
/// sleeve net out.
pub fn net_flows_by_date(flows: &[CashFlow]) -> Result<BTreeMap<NaiveDate, Decimal>> {
    let mut net: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for flow in flows {
        let total = net.entry(flow.date).or_insert(Decimal::ZERO);
        *total = total.checked_add(flow.external).ok_or_else(|| {
            ValidationError::InvalidInput(format!("net cash flow on {} overflows", flow.date))
        })?;
    }
    Ok(net)
}
