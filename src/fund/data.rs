//! Retirement fund records matching the stored fund format

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::family::parse_date;

/// Annual return rate applied to an inclusive age interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRateBand {
    #[serde(alias = "from-age", alias = "fromAge")]
    pub from_age: i32,

    #[serde(alias = "to-age", alias = "toAge")]
    pub to_age: i32,

    /// Annual return in percent
    #[serde(alias = "return-rate", alias = "returnRate")]
    pub return_rate: Decimal,
}

impl ReturnRateBand {
    pub fn new(from_age: i32, to_age: i32, return_rate: Decimal) -> Self {
        Self { from_age, to_age, return_rate }
    }

    /// Check whether an age falls inside the band (both ends inclusive)
    pub fn contains(&self, age: i32) -> bool {
        self.from_age <= age && age <= self.to_age
    }

    /// Return rate as a fraction
    pub fn rate(&self) -> Decimal {
        self.return_rate * dec!(0.01)
    }
}

/// A realized outcome for one calendar year of a fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualDataEntry {
    pub year: i32,

    #[serde(alias = "actual-balance", alias = "actualBalance")]
    pub actual_balance: Decimal,

    #[serde(alias = "actual-contributions", alias = "actualContributions")]
    pub actual_contributions: Decimal,

    #[serde(alias = "actual-growth", alias = "actualGrowth")]
    pub actual_growth: Decimal,
}

impl ActualDataEntry {
    pub fn new(year: i32, balance: Decimal, contributions: Decimal, growth: Decimal) -> Self {
        Self {
            year,
            actual_balance: balance,
            actual_contributions: contributions,
            actual_growth: growth,
        }
    }
}

/// A retirement fund owned by one family member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    /// Unique fund identifier
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Owning family member
    #[serde(alias = "family-member-id", alias = "familyMemberId")]
    pub family_member_id: String,

    /// Balance at the start of the first projected year
    #[serde(alias = "initial-investment", alias = "initialInvestment")]
    pub initial_investment: Decimal,

    /// Amount deposited at each contribution event
    #[serde(alias = "regular-contribution", alias = "regularContribution")]
    pub regular_contribution: Decimal,

    /// Contribution and compounding events per year
    #[serde(alias = "contribution-frequency", alias = "contributionFrequency")]
    pub contribution_frequency: i32,

    /// First projected date as YYYY-MM-DD; the valuation date when absent
    #[serde(
        default,
        alias = "start-date",
        alias = "startDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<String>,

    /// Ordered age bands; the first band containing an age wins
    #[serde(default, alias = "return-rate-params", alias = "returnRateParams")]
    pub return_rate_params: Vec<ReturnRateBand>,

    /// Recorded results that replace simulated figures
    #[serde(default, alias = "actual-data", alias = "actualData")]
    pub actual_data: Vec<ActualDataEntry>,
}

impl Fund {
    /// Create a fund with no bands, no actual data and no start date
    pub fn new(
        id: impl Into<String>,
        family_member_id: impl Into<String>,
        initial_investment: Decimal,
        regular_contribution: Decimal,
        contribution_frequency: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            family_member_id: family_member_id.into(),
            initial_investment,
            regular_contribution,
            contribution_frequency,
            start_date: None,
            return_rate_params: Vec::new(),
            actual_data: Vec::new(),
        }
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn with_bands(mut self, bands: Vec<ReturnRateBand>) -> Self {
        self.return_rate_params = bands;
        self
    }

    pub fn with_actual_data(mut self, actual_data: Vec<ActualDataEntry>) -> Self {
        self.actual_data = actual_data;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parsed start date, if one was recorded
    pub fn start(&self) -> Result<Option<NaiveDate>, ProjectionError> {
        self.start_date
            .as_deref()
            .map(|s| parse_date("start_date", s))
            .transpose()
    }

    /// First projected calendar year
    pub fn start_year(&self, as_of: NaiveDate) -> Result<i32, ProjectionError> {
        Ok(self.start()?.unwrap_or(as_of).year())
    }

    /// Contribution frequency, rejected when it would divide by zero
    pub fn checked_frequency(&self) -> Result<u32, ProjectionError> {
        if self.contribution_frequency <= 0 {
            return Err(ProjectionError::InvalidFrequency {
                fund_id: self.id.clone(),
                frequency: self.contribution_frequency,
            });
        }
        Ok(self.contribution_frequency as u32)
    }

    /// Total contributions over a full accumulation year; `None` on overflow
    pub fn annual_contribution(&self) -> Option<Decimal> {
        self.regular_contribution
            .checked_mul(Decimal::from(self.contribution_frequency))
    }

    /// Recorded result for a calendar year; the first entry for that year wins
    pub fn actual_for_year(&self, year: i32) -> Option<&ActualDataEntry> {
        self.actual_data.iter().find(|entry| entry.year == year)
    }
}
