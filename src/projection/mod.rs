//! Projection engine for single funds and whole families

mod aggregate;
mod cashflows;
mod engine;
pub mod export;
mod horizon;
mod overlay;
mod state;

pub use aggregate::{aggregate_by_year, AggregatedYear};
pub use cashflows::{round_money, Phase, ProjectedFund, ProjectionSummary, ProjectionYearEntry, YearFlows};
pub use engine::{
    HorizonPolicy, MissingMemberPolicy, ProjectionConfig, ProjectionEngine, RetirementStrategy,
    DEFAULT_TERMINAL_AGE,
};
pub use horizon::{latest_retirement_year, Horizon, DEFAULT_HORIZON_BUFFER_YEARS};
pub use overlay::apply_actual_data;
pub use state::ProjectionState;
