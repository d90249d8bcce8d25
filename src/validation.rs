//! Record validation applied before projecting
//!
//! The engine only rejects what would break the arithmetic (bad dates, zero
//! frequency). These checks enforce the record rules of the stored family and
//! fund data and report the first violation found.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::error::ProjectionError;
use crate::family::FamilyMember;
use crate::fund::Fund;

pub const RETIREMENT_AGE_RANGE: RangeInclusive<i32> = 50..=80;
pub const LIFE_EXPECTANCY_RANGE: RangeInclusive<i32> = 50..=120;
pub const ACTUAL_YEAR_RANGE: RangeInclusive<i32> = 2000..=2100;
/// Daily contributions at most
pub const CONTRIBUTION_FREQUENCY_RANGE: RangeInclusive<i32> = 1..=365;

/// A record rule violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{record} {id}: name must be at least 1 character long")]
    EmptyName { record: &'static str, id: String },

    #[error("member {member_id}: date of birth is required")]
    MissingDateOfBirth { member_id: String },

    #[error(transparent)]
    Date(#[from] ProjectionError),

    #[error("member {member_id}: retirement age {value} must be between 50 and 80")]
    RetirementAgeOutOfRange { member_id: String, value: i32 },

    #[error("member {member_id}: life expectancy {value} must be between 50 and 120")]
    LifeExpectancyOutOfRange { member_id: String, value: i32 },

    #[error("member {member_id}: retirement withdrawal must be non-negative")]
    NegativeWithdrawal { member_id: String },

    #[error("member {member_id}: retirement inflation must be non-negative")]
    NegativeInflation { member_id: String },

    #[error("duplicate family member id {member_id}")]
    DuplicateMemberId { member_id: String },

    #[error("fund {fund_id}: initial investment must be non-negative")]
    NegativeInvestment { fund_id: String },

    #[error("fund {fund_id}: regular contribution must be non-negative")]
    NegativeContribution { fund_id: String },

    #[error("fund {fund_id}: contribution frequency {value} must be between 1 and 365")]
    InvalidFrequency { fund_id: String, value: i32 },

    #[error("fund {fund_id}: return rate band {from_age}..={to_age} is inverted")]
    InvertedBand { fund_id: String, from_age: i32, to_age: i32 },

    #[error("fund {fund_id}: actual data year {year} must be between 2000 and 2100")]
    ActualYearOutOfRange { fund_id: String, year: i32 },

    #[error("fund {fund_id}: actual balance for {year} must be non-negative")]
    NegativeActualBalance { fund_id: String, year: i32 },

    #[error("fund {fund_id}: more than one actual data entry for {year}")]
    DuplicateActualYear { fund_id: String, year: i32 },
}

fn check_name(record: &'static str, id: &str, name: Option<&str>) -> Result<(), ValidationError> {
    match name {
        Some(name) if name.is_empty() => Err(ValidationError::EmptyName {
            record,
            id: id.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validate a single family member
pub fn validate_member(member: &FamilyMember) -> Result<(), ValidationError> {
    check_name("member", &member.id, member.name.as_deref())?;

    if member.date_of_birth.trim().is_empty() {
        return Err(ValidationError::MissingDateOfBirth {
            member_id: member.id.clone(),
        });
    }
    member.birth_date()?;

    if let Some(life_expectancy) = member.life_expectancy {
        if !LIFE_EXPECTANCY_RANGE.contains(&life_expectancy) {
            return Err(ValidationError::LifeExpectancyOutOfRange {
                member_id: member.id.clone(),
                value: life_expectancy,
            });
        }
    }

    if !RETIREMENT_AGE_RANGE.contains(&member.retirement_age) {
        return Err(ValidationError::RetirementAgeOutOfRange {
            member_id: member.id.clone(),
            value: member.retirement_age,
        });
    }

    if member.retirement_withdrawal < Decimal::ZERO {
        return Err(ValidationError::NegativeWithdrawal {
            member_id: member.id.clone(),
        });
    }
    if member.retirement_inflation < Decimal::ZERO {
        return Err(ValidationError::NegativeInflation {
            member_id: member.id.clone(),
        });
    }

    Ok(())
}

/// Validate every member and check identifiers are unique
pub fn validate_family(members: &[FamilyMember]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for member in members {
        validate_member(member)?;
        if !seen.insert(member.id.as_str()) {
            return Err(ValidationError::DuplicateMemberId {
                member_id: member.id.clone(),
            });
        }
    }
    Ok(())
}

/// Validate a single fund
pub fn validate_fund(fund: &Fund) -> Result<(), ValidationError> {
    let fund_id = || fund.id.clone();

    check_name("fund", &fund.id, fund.name.as_deref())?;

    if fund.initial_investment < Decimal::ZERO {
        return Err(ValidationError::NegativeInvestment { fund_id: fund_id() });
    }
    if fund.regular_contribution < Decimal::ZERO {
        return Err(ValidationError::NegativeContribution { fund_id: fund_id() });
    }
    if !CONTRIBUTION_FREQUENCY_RANGE.contains(&fund.contribution_frequency) {
        return Err(ValidationError::InvalidFrequency {
            fund_id: fund_id(),
            value: fund.contribution_frequency,
        });
    }
    fund.start()?;

    for band in &fund.return_rate_params {
        if band.from_age > band.to_age {
            return Err(ValidationError::InvertedBand {
                fund_id: fund_id(),
                from_age: band.from_age,
                to_age: band.to_age,
            });
        }
    }

    let mut years = HashSet::new();
    for entry in &fund.actual_data {
        if !ACTUAL_YEAR_RANGE.contains(&entry.year) {
            return Err(ValidationError::ActualYearOutOfRange {
                fund_id: fund_id(),
                year: entry.year,
            });
        }
        if entry.actual_balance < Decimal::ZERO {
            return Err(ValidationError::NegativeActualBalance {
                fund_id: fund_id(),
                year: entry.year,
            });
        }
        if !years.insert(entry.year) {
            return Err(ValidationError::DuplicateActualYear {
                fund_id: fund_id(),
                year: entry.year,
            });
        }
    }

    Ok(())
}

/// Validate every fund
pub fn validate_funds(funds: &[Fund]) -> Result<(), ValidationError> {
    funds.iter().try_for_each(validate_fund)
}
