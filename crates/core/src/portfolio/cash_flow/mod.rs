//! Cash-flow normalization and holdings replay.

mod cash_flow_model;
mod cash_flow_normalizer;
mod holding_state;


pub use cash_flow_model::{flows_by_symbol, net_flows_by_date, CashFlow};
pub use cash_flow_normalizer::normalize;
pub use holding_state::{is_quantity_significant, HoldingState, SettledFlow};
