//! Retirement Projection - year-by-year projection engine for family retirement funds
//!
//! This library provides:
//! - Family-wide horizon resolution (latest retirement plus a buffer)
//! - Age-banded return rates with first-match-wins lookup
//! - Accumulation and retirement phases with sub-annual compounding
//! - Actual-data overlay for years with recorded results
//! - Record validation, JSON/CSV loading and projection export

pub mod error;
pub mod family;
pub mod fund;
pub mod projection;
pub mod rates;
pub mod runner;
pub mod validation;

// Re-export commonly used types
pub use error::{ExportError, LoadError, ProjectionError};
pub use family::FamilyMember;
pub use fund::{ActualDataEntry, Fund, ReturnRateBand};
pub use projection::{
    ProjectedFund, ProjectionConfig, ProjectionEngine, ProjectionYearEntry, RetirementStrategy,
};
pub use runner::ProjectionRunner;
