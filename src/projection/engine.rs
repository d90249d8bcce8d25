//! Core projection engine for yearly retirement fund projections

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cashflows::{Phase, ProjectedFund, ProjectionYearEntry, YearFlows};
use super::horizon::{Horizon, DEFAULT_HORIZON_BUFFER_YEARS};
use super::overlay::apply_actual_data;
use super::state::ProjectionState;
use crate::error::{LoadError, ProjectionError};
use crate::family::{find_member, FamilyMember};
use crate::fund::Fund;
use crate::rates::{ReturnRateSchedule, DEFAULT_RETURN_RATE};

/// Terminal age for members without a recorded life expectancy
pub const DEFAULT_TERMINAL_AGE: i32 = 90;

/// What happens to a fund once its owner reaches retirement age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementStrategy {
    /// Balance freezes; no contributions, growth or withdrawals
    Flatline,
    /// Withdraw a share of the opening balance each year, compound the rest,
    /// and grow the withdrawal share by the member's inflation rate
    #[default]
    Withdrawal,
}

/// Handling of funds whose family member is not in the family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMemberPolicy {
    /// Project the fund as an empty sequence
    #[default]
    Empty,
    /// Report `ProjectionError::MissingFamilyMember`
    Error,
}

/// How far each fund is projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HorizonPolicy {
    /// Every fund runs to the family's latest retirement year plus the buffer
    #[default]
    RetirementBuffer,
    /// Each fund runs to its owner's life expectancy
    LifeExpectancy {
        #[serde(default = "default_terminal_age")]
        default_terminal_age: i32,
    },
}

fn default_terminal_age() -> i32 {
    DEFAULT_TERMINAL_AGE
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Years simulated after the family's latest retirement
    pub horizon_buffer_years: i32,

    /// Return rate (fraction) for ages outside every band
    pub default_return_rate: Decimal,

    pub retirement_strategy: RetirementStrategy,

    pub missing_member_policy: MissingMemberPolicy,

    pub horizon: HorizonPolicy,

    /// Valuation date; today's local date when absent
    pub as_of: Option<NaiveDate>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_buffer_years: DEFAULT_HORIZON_BUFFER_YEARS,
            default_return_rate: DEFAULT_RETURN_RATE,
            retirement_strategy: RetirementStrategy::default(),
            missing_member_policy: MissingMemberPolicy::default(),
            horizon: HorizonPolicy::default(),
            as_of: None,
        }
    }
}

impl ProjectionConfig {
    /// Load a config from JSON; omitted fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Apply `frequency` deposit-then-grow sub-periods to a balance.
///
/// Returns `None` once the balance no longer fits in a `Decimal`.
fn compound(
    balance: Decimal,
    deposit: Decimal,
    annual_rate: Decimal,
    frequency: u32,
) -> Option<Decimal> {
    let growth_factor = Decimal::ONE.checked_add(annual_rate / Decimal::from(frequency))?;
    (0..frequency).try_fold(balance, |balance, _| {
        balance.checked_add(deposit)?.checked_mul(growth_factor)
    })
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
    as_of: NaiveDate,
}

impl ProjectionEngine {
    /// Create an engine; the valuation date comes from the config or today
    pub fn new(config: ProjectionConfig) -> Self {
        let as_of = config.as_of.unwrap_or_else(|| Local::now().date_naive());
        Self { config, as_of }
    }

    /// Create an engine pinned to an explicit valuation date
    pub fn with_as_of(config: ProjectionConfig, as_of: NaiveDate) -> Self {
        Self { config, as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Resolve the family-wide horizon once per request
    pub fn resolve_horizon(&self, members: &[FamilyMember]) -> Result<Horizon, ProjectionError> {
        Horizon::resolve(members, self.as_of, self.config.horizon_buffer_years)
    }

    /// Project one fund, attaching the result to a copy of the fund
    pub fn project_fund(
        &self,
        fund: &Fund,
        members: &[FamilyMember],
        horizon: &Horizon,
    ) -> Result<ProjectedFund, ProjectionError> {
        fund.checked_frequency()?;

        let Some(member) = find_member(members, &fund.family_member_id) else {
            return match self.config.missing_member_policy {
                MissingMemberPolicy::Empty => {
                    log::warn!(
                        "fund {} references unknown family member {}; projection left empty",
                        fund.id,
                        fund.family_member_id
                    );
                    Ok(ProjectedFund::empty(fund.clone()))
                }
                MissingMemberPolicy::Error => Err(ProjectionError::MissingFamilyMember {
                    fund_id: fund.id.clone(),
                    member_id: fund.family_member_id.clone(),
                }),
            };
        };

        let entries = self.project_for_member(fund, member, horizon)?;
        Ok(ProjectedFund::new(fund.clone(), entries))
    }

    /// Year-by-year entries for a fund owned by `member`
    pub fn project_for_member(
        &self,
        fund: &Fund,
        member: &FamilyMember,
        horizon: &Horizon,
    ) -> Result<Vec<ProjectionYearEntry>, ProjectionError> {
        let frequency = fund.checked_frequency()?;
        let age = member.age_on(self.as_of)?;
        let current_year = self.as_of.year();
        let start_year = fund.start_year(self.as_of)?;
        let start_age = age - (current_year - start_year);
        if start_age < 0 {
            return Err(ProjectionError::StartBeforeBirth {
                fund_id: fund.id.clone(),
            });
        }

        let end_age = self.end_age(member, age, horizon);
        let rates = ReturnRateSchedule::new(&fund.return_rate_params, self.config.default_return_rate);
        let mut state = ProjectionState::from_fund(fund, member, start_year, start_age);
        let mut entries = Vec::with_capacity((end_age - start_age + 1).max(0) as usize);

        log::debug!(
            "fund {}: projecting ages {}..={} from {}",
            fund.id,
            start_age,
            end_age,
            start_year
        );

        while state.age <= end_age {
            let annual_return_rate = rates.rate_for_age(state.age);
            let mut year = self.simulate_year(fund, member, &state, annual_return_rate, frequency)?;

            // Recorded results must land before the balance is carried forward
            // and before next year's withdrawal rate is set.
            apply_actual_data(fund, &mut year);
            entries.push(year.to_entry());

            if year.phase == Phase::Retirement
                && self.config.retirement_strategy == RetirementStrategy::Withdrawal
                && state.inflate_withdrawal_rate().is_none()
            {
                return Err(overflow(fund, state.year));
            }
            state.advance_year(year.end_amount);
        }

        Ok(entries)
    }

    /// Last simulated age for a member who is `age` on the valuation date
    fn end_age(&self, member: &FamilyMember, age: i32, horizon: &Horizon) -> i32 {
        match self.config.horizon {
            HorizonPolicy::RetirementBuffer => horizon.end_age(age, self.as_of),
            HorizonPolicy::LifeExpectancy { default_terminal_age } => {
                member.life_expectancy.unwrap_or(default_terminal_age)
            }
        }
    }

    /// Simulate one year from the state's opening balance
    fn simulate_year(
        &self,
        fund: &Fund,
        member: &FamilyMember,
        state: &ProjectionState,
        annual_return_rate: Decimal,
        frequency: u32,
    ) -> Result<YearFlows, ProjectionError> {
        let begin_amount = state.balance;
        let mut year = YearFlows {
            year: state.year,
            age: state.age,
            phase: Phase::Accumulation,
            annual_return_rate,
            begin_amount,
            contribution: Decimal::ZERO,
            withdrawal: Decimal::ZERO,
            end_amount: begin_amount,
            is_actual_balance: false,
            recorded_growth: None,
        };

        if state.age < member.retirement_age {
            let contribution = fund
                .annual_contribution()
                .ok_or_else(|| overflow(fund, state.year))?;
            let deposit = contribution / Decimal::from(frequency);
            year.contribution = contribution;
            year.end_amount = compound(begin_amount, deposit, annual_return_rate, frequency)
                .ok_or_else(|| overflow(fund, state.year))?;
            return Ok(year);
        }

        year.phase = Phase::Retirement;
        if self.config.retirement_strategy == RetirementStrategy::Withdrawal {
            let withdrawal = begin_amount
                .checked_mul(state.withdrawal_rate)
                .ok_or_else(|| overflow(fund, state.year))?
                .min(begin_amount)
                .max(Decimal::ZERO);
            year.withdrawal = withdrawal;
            year.end_amount = compound(
                begin_amount - withdrawal,
                Decimal::ZERO,
                annual_return_rate,
                frequency,
            )
            .ok_or_else(|| overflow(fund, state.year))?;
        }

        Ok(year)
    }
}

fn overflow(fund: &Fund, year: i32) -> ProjectionError {
    ProjectionError::Overflow {
        fund_id: fund.id.clone(),
        year,
    }
}
