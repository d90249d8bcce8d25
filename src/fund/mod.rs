//! Retirement fund records and loading

mod data;
pub mod loader;

pub use data::{ActualDataEntry, Fund, ReturnRateBand};
pub use loader::{attach_actual_data, load_actual_data, load_actual_data_from_reader, load_funds, load_funds_from_reader};
