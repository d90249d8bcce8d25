//! Age-banded return rate lookup

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fund::ReturnRateBand;

/// Rate used when no band covers an age (7%)
pub const DEFAULT_RETURN_RATE: Decimal = dec!(0.07);

/// Ordered return rate bands with a fallback rate
#[derive(Debug, Clone, Copy)]
pub struct ReturnRateSchedule<'a> {
    bands: &'a [ReturnRateBand],
    default_rate: Decimal,
}

impl<'a> ReturnRateSchedule<'a> {
    pub fn new(bands: &'a [ReturnRateBand], default_rate: Decimal) -> Self {
        Self { bands, default_rate }
    }

    /// Annual return rate (as a fraction) for an age.
    ///
    /// Bands are scanned in list order and the first one containing the age
    /// wins, even when a later band also covers it.
    pub fn rate_for_age(&self, age: i32) -> Decimal {
        self.bands
            .iter()
            .find(|band| band.contains(age))
            .map(ReturnRateBand::rate)
            .unwrap_or(self.default_rate)
    }
}

/// Annual return rate for an age using the standard 7% fallback
pub fn return_rate_for_age(age: i32, bands: &[ReturnRateBand]) -> Decimal {
    ReturnRateSchedule::new(bands, DEFAULT_RETURN_RATE).rate_for_age(age)
}
