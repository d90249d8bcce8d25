//! Running state for a single fund projection

use rust_decimal::Decimal;

use crate::family::FamilyMember;
use crate::fund::Fund;

/// State of a fund at the start of a projected year
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Calendar year being projected
    pub year: i32,

    /// Owner's age during the year
    pub age: i32,

    /// Opening balance, kept at full precision
    pub balance: Decimal,

    /// Withdrawal rate for the next retirement year, as a fraction
    pub withdrawal_rate: Decimal,

    /// Annual growth of the withdrawal rate, as a fraction
    inflation_rate: Decimal,
}

impl ProjectionState {
    /// Initialize state at the fund's first projected year
    pub fn from_fund(fund: &Fund, member: &FamilyMember, start_year: i32, start_age: i32) -> Self {
        Self {
            year: start_year,
            age: start_age,
            balance: fund.initial_investment,
            withdrawal_rate: member.withdrawal_rate(),
            inflation_rate: member.inflation_rate(),
        }
    }

    /// Close the current year and carry its closing balance forward
    pub fn advance_year(&mut self, closing_balance: Decimal) {
        self.balance = closing_balance;
        self.year += 1;
        self.age += 1;
    }

    /// Compound the withdrawal rate by one year of inflation.
    ///
    /// Returns the new rate, or `None` (leaving the rate unchanged) when it no
    /// longer fits in a `Decimal`.
    pub fn inflate_withdrawal_rate(&mut self) -> Option<Decimal> {
        let rate = Decimal::ONE
            .checked_add(self.inflation_rate)
            .and_then(|factor| self.withdrawal_rate.checked_mul(factor))?;
        self.withdrawal_rate = rate;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_fund_and_advance() {
        let fund = Fund::new("f1", "m1", dec!(2500), dec!(10), 12);
        let member = FamilyMember::new("m1", "1980-01-01", 65).with_withdrawal(dec!(4), dec!(3));
        let mut state = ProjectionState::from_fund(&fund, &member, 2026, 46);

        assert_eq!(state.balance, dec!(2500));
        assert_eq!(state.withdrawal_rate, dec!(0.04));

        state.advance_year(dec!(2700.125));
        assert_eq!(state.year, 2027);
        assert_eq!(state.age, 47);
        assert_eq!(state.balance, dec!(2700.125));
    }

    #[test]
    fn test_withdrawal_rate_compounds() {
        let fund = Fund::new("f1", "m1", dec!(0), dec!(0), 1);
        let member = FamilyMember::new("m1", "1960-01-01", 60).with_withdrawal(dec!(4), dec!(10));
        let mut state = ProjectionState::from_fund(&fund, &member, 2026, 66);

        assert_eq!(state.inflate_withdrawal_rate(), Some(dec!(0.044)));
        assert_eq!(state.withdrawal_rate, dec!(0.044));
        state.inflate_withdrawal_rate();
        assert_eq!(state.withdrawal_rate, dec!(0.0484));
    }

    #[test]
    fn test_withdrawal_rate_overflow_leaves_rate() {
        let fund = Fund::new("f1", "m1", dec!(0), dec!(0), 1);
        let member = FamilyMember::new("m1", "1960-01-01", 60);
        let mut state = ProjectionState::from_fund(&fund, &member, 2026, 66);
        state.withdrawal_rate = Decimal::MAX;
        state.inflation_rate = dec!(1);

        assert_eq!(state.inflate_withdrawal_rate(), None);
        assert_eq!(state.withdrawal_rate, Decimal::MAX);
    }
}
