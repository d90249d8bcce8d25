//! Projection output structures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fund::Fund;

/// Round a monetary amount to cents for output
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// Phase of a projected year relative to the owner's retirement age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Accumulation,
    Retirement,
}

/// Full-precision figures for one simulated year, before output rounding
#[derive(Debug, Clone, PartialEq)]
pub struct YearFlows {
    pub year: i32,
    pub age: i32,
    pub phase: Phase,
    pub annual_return_rate: Decimal,
    pub begin_amount: Decimal,
    pub contribution: Decimal,
    pub withdrawal: Decimal,
    pub end_amount: Decimal,
    pub is_actual_balance: bool,
    pub recorded_growth: Option<Decimal>,
}

impl YearFlows {
    /// Growth as the residual of the other flows
    pub fn growth(&self) -> Decimal {
        self.end_amount - self.begin_amount - self.contribution + self.withdrawal
    }

    /// Round to cents and freeze into an output entry.
    ///
    /// Growth is recomputed from the rounded figures so that
    /// begin + contribution - withdrawal + growth == end holds exactly.
    pub fn to_entry(&self) -> ProjectionYearEntry {
        let begin_amount = round_money(self.begin_amount);
        let contribution = round_money(self.contribution);
        let withdrawal = round_money(self.withdrawal);
        let end_amount = round_money(self.end_amount);

        ProjectionYearEntry {
            year: self.year,
            age: self.age,
            phase: self.phase,
            annual_return_rate: self.annual_return_rate,
            begin_amount,
            contribution,
            withdrawal,
            growth: end_amount - begin_amount - contribution + withdrawal,
            end_amount,
            is_actual_balance: self.is_actual_balance,
            recorded_growth: self.recorded_growth.map(round_money),
        }
    }
}

/// One projected calendar year of a fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYearEntry {
    pub year: i32,
    pub age: i32,
    pub phase: Phase,

    /// Annual return rate as a fraction
    pub annual_return_rate: Decimal,

    pub begin_amount: Decimal,
    pub contribution: Decimal,
    pub withdrawal: Decimal,

    /// Always `end_amount - begin_amount - contribution + withdrawal`, even in
    /// years overlaid with actual data. The recorded `actual_growth` is not
    /// copied here; it is reported in `recorded_growth`.
    pub growth: Decimal,

    pub end_amount: Decimal,

    /// Whether the year's figures come from recorded actual data
    pub is_actual_balance: bool,

    /// Growth as recorded in the actual data, when overlaid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_growth: Option<Decimal>,
}

/// A fund together with its year-by-year projection
///
/// The input fund is carried unchanged; the projection is attached alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedFund {
    #[serde(flatten)]
    pub fund: Fund,

    pub retirement_projection: Vec<ProjectionYearEntry>,
}

impl ProjectedFund {
    pub fn new(fund: Fund, retirement_projection: Vec<ProjectionYearEntry>) -> Self {
        Self {
            fund,
            retirement_projection,
        }
    }

    /// Fund with an empty projection
    pub fn empty(fund: Fund) -> Self {
        Self::new(fund, Vec::new())
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let rows = &self.retirement_projection;
        let total_contributions = saturating_total(rows, |r| r.contribution);
        let total_withdrawals = saturating_total(rows, |r| r.withdrawal);
        let total_growth = saturating_total(rows, |r| r.growth);

        let balance_at_retirement = rows
            .iter()
            .find(|r| r.phase == Phase::Retirement)
            .map(|r| r.begin_amount);
        let final_balance = rows.last().map(|r| r.end_amount).unwrap_or(Decimal::ZERO);

        ProjectionSummary {
            fund_id: self.fund.id.clone(),
            years: rows.len() as u32,
            total_contributions,
            total_withdrawals,
            total_growth,
            balance_at_retirement,
            final_balance,
            actual_years: rows.iter().filter(|r| r.is_actual_balance).count() as u32,
        }
    }
}

fn saturating_total<F>(rows: &[ProjectionYearEntry], field: F) -> Decimal
where
    F: Fn(&ProjectionYearEntry) -> Decimal,
{
    rows.iter()
        .fold(Decimal::ZERO, |sum, row| sum.saturating_add(field(row)))
}

/// Summary statistics for a fund projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub fund_id: String,
    pub years: u32,
    pub total_contributions: Decimal,
    pub total_withdrawals: Decimal,
    pub total_growth: Decimal,

    /// Opening balance of the first retirement-phase year
    pub balance_at_retirement: Option<Decimal>,

    pub final_balance: Decimal,

    /// Number of years taken from recorded actual data
    pub actual_years: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flows(begin: Decimal, contribution: Decimal, withdrawal: Decimal, end: Decimal) -> YearFlows {
        YearFlows {
            year: 2026,
            age: 40,
            phase: Phase::Accumulation,
            annual_return_rate: dec!(0.07),
            begin_amount: begin,
            contribution,
            withdrawal,
            end_amount: end,
            is_actual_balance: false,
            recorded_growth: None,
        }
    }

    #[test]
    fn test_round_money_pads_to_cents() {
        assert_eq!(round_money(dec!(10000)).to_string(), "10000.00");
        assert_eq!(round_money(dec!(1.005)).to_string(), "1.00");
        assert_eq!(round_money(dec!(1.0051)).to_string(), "1.01");
    }

    #[test]
    fn test_entry_identity_survives_rounding() {
        // Each component rounds down while the end rounds up
        let entry = flows(dec!(1.004), dec!(1.004), dec!(0), dec!(2.008)).to_entry();
        assert_eq!(entry.begin_amount, dec!(1.00));
        assert_eq!(entry.contribution, dec!(1.00));
        assert_eq!(entry.end_amount, dec!(2.01));
        assert_eq!(entry.growth, dec!(0.01));
        assert_eq!(
            entry.begin_amount + entry.contribution - entry.withdrawal + entry.growth,
            entry.end_amount
        );
    }

    #[test]
    fn test_growth_residual_with_withdrawal() {
        let year = flows(dec!(1000), dec!(0), dec!(40), dec!(1027.2));
        assert_eq!(year.growth(), dec!(67.2));
        assert_eq!(year.to_entry().growth, dec!(67.20));
    }

    #[test]
    fn test_summary() {
        let fund = Fund::new("f1", "m1", dec!(100), dec!(0), 1);
        let mut retired = flows(dec!(110), dec!(0), dec!(10), dec!(105));
        retired.phase = Phase::Retirement;
        retired.year = 2027;
        retired.age = 41;
        let projected = ProjectedFund::new(
            fund,
            vec![flows(dec!(100), dec!(5), dec!(0), dec!(110)).to_entry(), retired.to_entry()],
        );

        let summary = projected.summary();
        assert_eq!(summary.years, 2);
        assert_eq!(summary.total_contributions, dec!(5));
        assert_eq!(summary.total_withdrawals, dec!(10));
        assert_eq!(summary.total_growth, dec!(10));
        assert_eq!(summary.balance_at_retirement, Some(dec!(110)));
        assert_eq!(summary.final_balance, dec!(105));
        assert_eq!(summary.actual_years, 0);
    }

    #[test]
    fn test_empty_summary() {
        let projected = ProjectedFund::empty(Fund::new("f1", "m1", dec!(100), dec!(0), 1));
        let summary = projected.summary();
        assert_eq!(summary.years, 0);
        assert_eq!(summary.final_balance, Decimal::ZERO);
        assert_eq!(summary.balance_at_retirement, None);
    }
}
