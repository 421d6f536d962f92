//! Conversions between decimal amounts and the processor's minor units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{AppError, AppResult};

/// Decimal places of the minor currency unit (cents)
const MINOR_UNIT_SCALE: u32 = 2;

/// Convert a decimal amount to integer minor units, rounding half away from zero.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::validation(format!("Amount {} is out of range", amount)))
}

/// Convert integer minor units back to a decimal amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}
