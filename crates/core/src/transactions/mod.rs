//! Transactions module - the raw input records of the engine.

mod transactions_constants;
mod transactions_errors;
mod transactions_model;

#[cfg(test)]
mod transactions_model_tests;

pub use transactions_constants::*;
pub use transactions_errors::TransactionError;
pub use transactions_model::{ordered, Transaction, TransactionType};
