//! Family member records and the age arithmetic the projection relies on

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Date format used by every date field in family and fund records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a YYYY-MM-DD date, naming the offending field on failure
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ProjectionError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ProjectionError::UnparseableDate {
            field,
            value: value.to_string(),
        }
    })
}

/// Age in whole years as elapsed days / 365, floored.
///
/// Leap days and exact birthdays are ignored; projections depend on this
/// exact rule, so do not replace it with calendar arithmetic.
pub fn age_on(date_of_birth: NaiveDate, as_of: NaiveDate) -> i32 {
    let days = (as_of - date_of_birth).num_days();
    days.div_euclid(365) as i32
}

/// A single family member as supplied by the family-info collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    /// Identifier, unique within the family
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Date of birth as YYYY-MM-DD
    #[serde(alias = "date-of-birth", alias = "dateOfBirth")]
    pub date_of_birth: String,

    /// Age at which the member stops contributing
    #[serde(alias = "retirement-age", alias = "retirementAge")]
    pub retirement_age: i32,

    /// Terminal age, used only by the life-expectancy horizon
    #[serde(
        default,
        alias = "life-expectancy",
        alias = "lifeExpectancy",
        skip_serializing_if = "Option::is_none"
    )]
    pub life_expectancy: Option<i32>,

    /// First-year retirement withdrawal rate, in percent of the opening balance
    #[serde(default, alias = "retirement-withdrawal", alias = "retirementWithdrawal")]
    pub retirement_withdrawal: Decimal,

    /// Annual growth of the withdrawal rate, in percent
    #[serde(default, alias = "retirement-inflation", alias = "retirementInflation")]
    pub retirement_inflation: Decimal,
}

impl FamilyMember {
    /// Create a member with no withdrawals and no life expectancy
    pub fn new(id: impl Into<String>, date_of_birth: impl Into<String>, retirement_age: i32) -> Self {
        Self {
            id: id.into(),
            name: None,
            date_of_birth: date_of_birth.into(),
            retirement_age,
            life_expectancy: None,
            retirement_withdrawal: Decimal::ZERO,
            retirement_inflation: Decimal::ZERO,
        }
    }

    /// Set withdrawal and inflation percentages
    pub fn with_withdrawal(mut self, withdrawal_pct: Decimal, inflation_pct: Decimal) -> Self {
        self.retirement_withdrawal = withdrawal_pct;
        self.retirement_inflation = inflation_pct;
        self
    }

    pub fn with_life_expectancy(mut self, life_expectancy: i32) -> Self {
        self.life_expectancy = Some(life_expectancy);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn birth_date(&self) -> Result<NaiveDate, ProjectionError> {
        parse_date("date_of_birth", &self.date_of_birth)
    }

    /// Age on the valuation date
    pub fn age_on(&self, as_of: NaiveDate) -> Result<i32, ProjectionError> {
        Ok(age_on(self.birth_date()?, as_of))
    }

    /// Calendar year in which the member reaches retirement age
    pub fn retirement_year(&self, as_of: NaiveDate) -> Result<i32, ProjectionError> {
        let age = self.age_on(as_of)?;
        Ok(as_of.year() + (self.retirement_age - age))
    }

    /// Withdrawal rate as a fraction
    pub fn withdrawal_rate(&self) -> Decimal {
        self.retirement_withdrawal * dec!(0.01)
    }

    /// Withdrawal-rate inflation as a fraction
    pub fn inflation_rate(&self) -> Decimal {
        self.retirement_inflation * dec!(0.01)
    }
}

/// Find a member by identifier; the first match wins
pub fn find_member<'a>(members: &'a [FamilyMember], id: &str) -> Option<&'a FamilyMember> {
    members.iter().find(|m| m.id == id)
}
