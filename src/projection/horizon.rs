//! Family-wide simulation horizon

use chrono::{Datelike, NaiveDate};

use crate::error::ProjectionError;
use crate::family::FamilyMember;

/// Years simulated after the family's last retirement
pub const DEFAULT_HORIZON_BUFFER_YEARS: i32 = 5;

/// Last simulated calendar year, shared by every fund in a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Calendar year in which the last family member retires
    pub latest_retirement_year: i32,

    /// Last simulated year (latest retirement year plus the buffer)
    pub end_year: i32,
}

impl Horizon {
    /// Resolve the horizon for a whole family.
    ///
    /// An empty family resolves to the valuation year, so a lone fund still
    /// projects through the buffer years.
    pub fn resolve(
        members: &[FamilyMember],
        as_of: NaiveDate,
        buffer_years: i32,
    ) -> Result<Self, ProjectionError> {
        let latest_retirement_year = latest_retirement_year(members, as_of)?;
        Ok(Self {
            latest_retirement_year,
            end_year: latest_retirement_year + buffer_years,
        })
    }

    /// Last simulated age for someone who is `age` on the valuation date
    pub fn end_age(&self, age: i32, as_of: NaiveDate) -> i32 {
        age + (self.end_year - as_of.year())
    }
}

/// Latest retirement calendar year across the family
pub fn latest_retirement_year(
    members: &[FamilyMember],
    as_of: NaiveDate,
) -> Result<i32, ProjectionError> {
    let mut latest: Option<i32> = None;
    for member in members {
        let year = member.retirement_year(as_of)?;
        latest = Some(latest.map_or(year, |l| l.max(year)));
    }
    Ok(latest.unwrap_or_else(|| as_of.year()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn test_empty_family_is_current_year() {
        let horizon = Horizon::resolve(&[], as_of(), DEFAULT_HORIZON_BUFFER_YEARS).unwrap();
        assert_eq!(horizon.latest_retirement_year, 2026);
        assert_eq!(horizon.end_year, 2031);
    }

    #[test]
    fn test_latest_member_sets_horizon() {
        let members = vec![
            // age 50 on the valuation date, retires 2041
            FamilyMember::new("a", "1976-03-01", 65),
            // age 30, retires 2056
            FamilyMember::new("b", "1996-03-01", 60),
        ];
        let horizon = Horizon::resolve(&members, as_of(), DEFAULT_HORIZON_BUFFER_YEARS).unwrap();
        assert_eq!(horizon.latest_retirement_year, 2056);
        assert_eq!(horizon.end_year, 2061);
        assert_eq!(horizon.end_age(50, as_of()), 85);
    }

    #[test]
    fn test_already_retired_family_can_end_in_the_past() {
        let members = vec![FamilyMember::new("a", "1946-03-01", 60)];
        let horizon = Horizon::resolve(&members, as_of(), DEFAULT_HORIZON_BUFFER_YEARS).unwrap();
        assert_eq!(horizon.latest_retirement_year, 2006);
        assert_eq!(horizon.end_year, 2011);
    }

    #[test]
    fn test_bad_birth_date_is_reported() {
        let members = vec![FamilyMember::new("a", "not-a-date", 60)];
        assert!(matches!(
            Horizon::resolve(&members, as_of(), DEFAULT_HORIZON_BUFFER_YEARS),
            Err(ProjectionError::UnparseableDate { .. })
        ));
    }
}
