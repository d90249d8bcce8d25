//! Error types for projection and record loading

use thiserror::Error;

/// Errors raised while projecting a single fund
///
/// Every variant is local to one fund; the batch runner decides whether a
/// failure aborts the whole family or only the fund that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The fund points at a family member that is not in the supplied family
    #[error("fund {fund_id} references unknown family member {member_id}")]
    MissingFamilyMember { fund_id: String, member_id: String },

    /// Contribution frequency must be at least one event per year
    #[error("fund {fund_id} has contribution frequency {frequency}; it must be greater than 0")]
    InvalidFrequency { fund_id: String, frequency: i32 },

    /// A date field could not be parsed as YYYY-MM-DD
    #[error("unparseable {field} '{value}', expected YYYY-MM-DD")]
    UnparseableDate { field: &'static str, value: String },

    /// The fund's start date falls before its owner was born
    #[error("fund {fund_id} starts before its family member was born")]
    StartBeforeBirth { fund_id: String },

    /// A balance, contribution or rate left the representable decimal range
    #[error("fund {fund_id} overflowed the decimal range in {year}")]
    Overflow { fund_id: String, year: i32 },
}

/// Errors raised while reading family, fund, actual-data or config files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// An actual-data row names a fund that was not loaded
    #[error("actual data row for unknown fund {fund_id}")]
    UnknownFund { fund_id: String },
}

/// Errors raised while writing projected funds
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),
}
