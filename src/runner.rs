//! Batch runner projecting every fund of a family
//!
//! The horizon is resolved once for the family; funds are then projected in
//! parallel since no fund reads another's state. Output order always matches
//! input order.

use rayon::prelude::*;

use crate::error::ProjectionError;
use crate::family::FamilyMember;
use crate::fund::Fund;
use crate::projection::{ProjectedFund, ProjectionConfig, ProjectionEngine};

/// Projects a family's funds with one engine
///
/// # Example
/// ```ignore
/// let runner = ProjectionRunner::new(ProjectionConfig::default());
/// for result in runner.project_all(&members, &funds) {
///     match result {
///         Ok(projected) => println!("{}: {} years", projected.fund.id, projected.retirement_projection.len()),
///         Err(err) => eprintln!("{err}"),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProjectionRunner {
    engine: ProjectionEngine,
}

impl ProjectionRunner {
    /// Create runner from a config; the valuation date is fixed now
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Create runner around a pre-built engine
    pub fn with_engine(engine: ProjectionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Project every fund, keeping failures local to the fund that raised them
    pub fn project_all(
        &self,
        members: &[FamilyMember],
        funds: &[Fund],
    ) -> Vec<Result<ProjectedFund, ProjectionError>> {
        let horizon = match self.engine.resolve_horizon(members) {
            Ok(horizon) => horizon,
            Err(err) => {
                log::warn!("cannot resolve family horizon: {err}");
                return funds.iter().map(|_| Err(err.clone())).collect();
            }
        };

        let results: Vec<_> = funds
            .par_iter()
            .map(|fund| self.engine.project_fund(fund, members, &horizon))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            log::warn!("projection failed: {err}");
        }
        log::info!(
            "projected {} funds through {} ({} failed)",
            funds.len(),
            horizon.end_year,
            failed
        );

        results
    }

    /// Project every fund, aborting on the first failure
    pub fn try_project_all(
        &self,
        members: &[FamilyMember],
        funds: &[Fund],
    ) -> Result<Vec<ProjectedFund>, ProjectionError> {
        let horizon = self.engine.resolve_horizon(members)?;
        funds
            .par_iter()
            .map(|fund| self.engine.project_fund(fund, members, &horizon))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fund::ReturnRateBand;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn runner() -> ProjectionRunner {
        let as_of = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        ProjectionRunner::with_engine(ProjectionEngine::with_as_of(ProjectionConfig::default(), as_of))
    }

    fn family() -> Vec<FamilyMember> {
        vec![
            FamilyMember::new("m1", "1996-03-01", 65).with_withdrawal(dec!(4), dec!(2)),
            FamilyMember::new("m2", "1976-03-01", 60).with_withdrawal(dec!(5), dec!(0)),
        ]
    }

    fn fund(id: &str, member_id: &str) -> Fund {
        Fund::new(id, member_id, dec!(10000), dec!(100), 12)
            .with_bands(vec![ReturnRateBand::new(0, 120, dec!(6))])
    }

    #[test]
    fn test_empty_family_single_fund() {
        let runner = runner();
        let horizon = runner.engine().resolve_horizon(&[]).unwrap();
        assert_eq!(horizon.latest_retirement_year, 2026);

        let results = runner.project_all(&[], &[fund("f1", "m1")]);
        assert_eq!(results.len(), 1);
        assert!(results[0].as_ref().unwrap().retirement_projection.is_empty());
    }

    #[test]
    fn test_shared_horizon_across_members() {
        let results = runner().project_all(&family(), &[fund("f1", "m1"), fund("f2", "m2")]);
        let f1 = results[0].as_ref().unwrap();
        let f2 = results[1].as_ref().unwrap();

        // m1 retires last, in 2061; both funds stop in 2066
        assert_eq!(f1.retirement_projection.last().unwrap().year, 2066);
        assert_eq!(f2.retirement_projection.last().unwrap().year, 2066);
        assert_eq!(f2.retirement_projection.last().unwrap().age, 90);
    }

    #[test]
    fn test_failures_stay_local() {
        let funds = vec![
            fund("f1", "m1"),
            fund("ghost", "nobody"),
            Fund::new("bad", "m2", dec!(100), dec!(10), 0),
            fund("f2", "m2"),
        ];
        let results = runner().project_all(&family(), &funds);

        assert_eq!(results.len(), 4);
        assert!(!results[0].as_ref().unwrap().retirement_projection.is_empty());
        assert!(results[1].as_ref().unwrap().retirement_projection.is_empty());
        assert!(matches!(results[2], Err(ProjectionError::InvalidFrequency { .. })));
        assert_eq!(results[3].as_ref().unwrap().fund.id, "f2");
    }

    #[test]
    fn test_overflow_stays_local() {
        let hot = Fund::new("hot", "m1", dec!(1000000), dec!(100), 12)
            .with_bands(vec![ReturnRateBand::new(0, 120, dec!(200))]);
        let funds = vec![fund("ok", "m1"), hot, fund("also_ok", "m2")];
        let results = runner().project_all(&family(), &funds);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().retirement_projection.len(), 41);
        assert!(matches!(
            &results[1],
            Err(ProjectionError::Overflow { fund_id, .. }) if fund_id == "hot"
        ));
        assert_eq!(results[2].as_ref().unwrap().fund.id, "also_ok");
    }

    #[test]
    fn test_try_project_all_aborts() {
        let funds = vec![fund("f1", "m1"), Fund::new("bad", "m2", dec!(100), dec!(10), 0)];
        let err = runner().try_project_all(&family(), &funds).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::InvalidFrequency {
                fund_id: "bad".to_string(),
                frequency: 0,
            }
        );
    }

    #[test]
    fn test_bad_member_date_fails_every_fund() {
        let members = vec![FamilyMember::new("m1", "1996/03/01", 65)];
        let results = runner().project_all(&members, &[fund("f1", "m1"), fund("f2", "m1")]);
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(ProjectionError::UnparseableDate { .. }))));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let runner = runner();
        let members = family();
        let funds: Vec<Fund> = (0..16)
            .map(|i| fund(&format!("f{i}"), if i % 2 == 0 { "m1" } else { "m2" }))
            .collect();

        let parallel = runner.try_project_all(&members, &funds).unwrap();
        let horizon = runner.engine().resolve_horizon(&members).unwrap();
        let sequential: Vec<_> = funds
            .iter()
            .map(|f| runner.engine().project_fund(f, &members, &horizon).unwrap())
            .collect();

        assert_eq!(parallel, sequential);
    }
}
