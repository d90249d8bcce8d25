//! Family-level totals across projected funds

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cashflows::ProjectedFund;

/// Totals for one calendar year across every fund that projects it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedYear {
    pub year: i32,
    pub fund_count: u32,
    pub begin_amount: Decimal,
    pub contribution: Decimal,
    pub withdrawal: Decimal,
    pub growth: Decimal,
    pub end_amount: Decimal,
}

/// Sum projected entries by calendar year, ascending.
///
/// Totals saturate at `Decimal::MAX`.
pub fn aggregate_by_year(funds: &[ProjectedFund]) -> Vec<AggregatedYear> {
    let mut by_year: BTreeMap<i32, AggregatedYear> = BTreeMap::new();

    for fund in funds {
        for row in &fund.retirement_projection {
            let agg = by_year.entry(row.year).or_insert_with(|| AggregatedYear {
                year: row.year,
                ..Default::default()
            });
            agg.fund_count += 1;
            agg.begin_amount = agg.begin_amount.saturating_add(row.begin_amount);
            agg.contribution = agg.contribution.saturating_add(row.contribution);
            agg.withdrawal = agg.withdrawal.saturating_add(row.withdrawal);
            agg.growth = agg.growth.saturating_add(row.growth);
            agg.end_amount = agg.end_amount.saturating_add(row.end_amount);
        }
    }

    by_year.into_values().collect()
}
