use log::debug;

use super::cash_flow_model::CashFlow;
use super::holding_state::HoldingState;
use crate::errors::Result;
use crate::transactions::{ordered, Transaction};

/// Converts transactions into signed investor-perspective cash flows.
///
/// Flows come out in replay order (date, then input order), never re-sorted by
/// amount. Every transaction is validated and replayed against running
/// holdings, so an oversell or an overdrawn withdrawal fails here even if a
/// later-dated record would cover it.
pub fn normalize(transactions: &[Transaction]) -> Result<Vec<CashFlow>> {
    let mut state = HoldingState::new();
    let mut flows = Vec::with_capacity(transactions.len());

    for txn in ordered(transactions) {
        let settled = state.apply(txn)?;
        flows.push(CashFlow {
            date: txn.date,
            amount: settled.flow,
            external: settled.external,
            symbol: txn.symbol.clone(),
            transaction_type: txn.transaction_type,
        });
    }

    debug!(
        "Normalized {} transactions into {} cash flows",
        transactions.len(),
        flows.len()
    );
    Ok(flows)
}
