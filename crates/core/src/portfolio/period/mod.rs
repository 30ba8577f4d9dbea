//! Period resolution - turns a period token into a concrete date window.

mod period_model;
mod period_resolver;


pub use period_model::{DateWindow, Period};
pub use period_resolver::{resolve, InceptionLookup};
