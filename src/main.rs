//! Retirement Projection CLI
//!
//! Loads family and fund records, projects every fund and writes the
//! year-by-year results.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use retirement_projection::family::{load_family, DATE_FORMAT};
use retirement_projection::fund::{attach_actual_data, load_actual_data, load_funds};
use retirement_projection::projection::{
    aggregate_by_year, export, MissingMemberPolicy, ProjectedFund, ProjectionConfig,
    ProjectionEngine, RetirementStrategy,
};
use retirement_projection::validation::{validate_family, validate_funds};
use retirement_projection::ProjectionRunner;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Flatline,
    Withdrawal,
}

impl From<StrategyArg> for RetirementStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Flatline => RetirementStrategy::Flatline,
            StrategyArg::Withdrawal => RetirementStrategy::Withdrawal,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "retirement-projection", version, about = "Project retirement fund balances year by year")]
struct Cli {
    /// Family members JSON
    #[arg(long)]
    family: PathBuf,

    /// Retirement funds JSON
    #[arg(long)]
    funds: PathBuf,

    /// Actual data CSV (fund_id,year,actual_balance,actual_contributions,actual_growth)
    #[arg(long)]
    actuals: Option<PathBuf>,

    /// Projection config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Valuation date (YYYY-MM-DD); overrides the config
    #[arg(long, value_parser = parse_as_of)]
    as_of: Option<NaiveDate>,

    /// Retirement-phase strategy; overrides the config
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Fail the whole run on the first fund error, including unknown members
    #[arg(long)]
    strict: bool,

    /// Skip record validation
    #[arg(long)]
    no_validate: bool,

    /// Write year-by-year rows as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write projected funds as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn parse_as_of(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| format!("{value}: {e}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ProjectionConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ProjectionConfig::default(),
    };
    if let Some(as_of) = cli.as_of {
        config.as_of = Some(as_of);
    }
    if let Some(strategy) = cli.strategy {
        config.retirement_strategy = strategy.into();
    }
    if cli.strict {
        config.missing_member_policy = MissingMemberPolicy::Error;
    }

    let members = load_family(&cli.family)
        .with_context(|| format!("loading family {}", cli.family.display()))?;
    let mut funds = load_funds(&cli.funds)
        .with_context(|| format!("loading funds {}", cli.funds.display()))?;
    if let Some(path) = &cli.actuals {
        let rows = load_actual_data(path)
            .with_context(|| format!("loading actual data {}", path.display()))?;
        funds = attach_actual_data(funds, rows)?;
    }

    if !cli.no_validate {
        validate_family(&members).context("invalid family record")?;
        validate_funds(&funds).context("invalid fund record")?;
    }

    let engine = ProjectionEngine::new(config);
    println!("Retirement Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("Valuation date: {}", engine.as_of());
    println!(
        "Members: {}, Funds: {}, Strategy: {:?}\n",
        members.len(),
        funds.len(),
        engine.config().retirement_strategy
    );

    let runner = ProjectionRunner::with_engine(engine);
    let projected: Vec<ProjectedFund> = if cli.strict {
        runner.try_project_all(&members, &funds)?
    } else {
        let mut projected = Vec::with_capacity(funds.len());
        let mut failures = 0;
        for result in runner.project_all(&members, &funds) {
            match result {
                Ok(fund) => projected.push(fund),
                Err(err) => {
                    eprintln!("skipped: {err}");
                    failures += 1;
                }
            }
        }
        if projected.is_empty() && failures > 0 {
            bail!("every fund failed to project");
        }
        projected
    };

    println!(
        "{:<16} {:>6} {:>16} {:>16} {:>16} {:>16}",
        "Fund", "Years", "Contributions", "Withdrawals", "At Retirement", "Final"
    );
    println!("{}", "-".repeat(92));
    for fund in &projected {
        let summary = fund.summary();
        let at_retirement = summary
            .balance_at_retirement
            .map(|b| format!("{b:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:>6} {:>16.2} {:>16.2} {:>16} {:>16.2}",
            summary.fund_id,
            summary.years,
            summary.total_contributions,
            summary.total_withdrawals,
            at_retirement,
            summary.final_balance
        );
    }

    if let Some(last) = aggregate_by_year(&projected).last() {
        println!(
            "\nFamily total in {}: {:.2} across {} funds",
            last.year, last.end_amount, last.fund_count
        );
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::write_csv(BufWriter::new(file), &projected)?;
        println!("\nYear-by-year rows written to: {}", path.display());
    }
    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::write_json(BufWriter::new(file), &projected)?;
        println!("Projected funds written to: {}", path.display());
    }

    Ok(())
}
