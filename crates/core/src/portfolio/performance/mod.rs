mod metrics_calculator;
pub mod performance_model;
pub mod performance_service;
mod xirr;

#[cfg(test)]
mod metrics_calculator_tests;


pub use metrics_calculator::{compute, daily_returns};
pub use performance_model::*;
pub use performance_service::*;
pub use xirr::xirr;
