//! Actual-data overlay: recorded results replace simulated figures

use crate::fund::Fund;

use super::cashflows::YearFlows;

/// Replace a simulated year with the fund's recorded result for that year.
///
/// Only the closing balance and contribution are replaced; begin amount, age
/// and withdrawal keep their simulated values and growth becomes the
/// residual. The recorded growth is kept on the entry for reference. Returns
/// whether an actual entry was applied. The caller must carry
/// `year.end_amount` forward after this call, never the simulated balance.
pub fn apply_actual_data(fund: &Fund, year: &mut YearFlows) -> bool {
    let Some(actual) = fund.actual_for_year(year.year) else {
        return false;
    };

    log::debug!(
        "fund {}: year {} overlaid with actual balance {}",
        fund.id,
        year.year,
        actual.actual_balance
    );

    year.end_amount = actual.actual_balance;
    year.contribution = actual.actual_contributions;
    year.recorded_growth = Some(actual.actual_growth);
    year.is_actual_balance = true;
    true
}
