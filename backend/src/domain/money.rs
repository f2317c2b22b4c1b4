//! Exact money handling.
//!
//! Amounts travel as `Decimal` with at most two fractional digits and are
//! stored as whole cents so that SQL aggregation stays exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::errors::{LedgerError, LedgerResult};

/// Largest magnitude a single stored amount may have (99,999,999.99)
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert an amount to cents, returning `None` when it has more than two
/// fractional digits or does not fit in an `i64`.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    let scaled = amount.checked_mul(Decimal::new(100, 0))?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_i64()
}

/// Validate an amount's precision and magnitude and convert it to cents.
pub fn checked_cents(field: &'static str, amount: Decimal) -> LedgerResult<i64> {
    if amount.abs() > max_amount() {
        return Err(LedgerError::validation(
            field,
            format!("must not exceed {}", max_amount()),
        ));
    }
    to_cents(amount)
        .ok_or_else(|| LedgerError::validation(field, "must have at most two decimal places"))
}

/// Amounts charged to a category must be strictly positive.
pub fn positive_cents(field: &'static str, amount: Decimal) -> LedgerResult<i64> {
    let cents = checked_cents(field, amount)?;
    if cents <= 0 {
        return Err(LedgerError::validation(field, "must be greater than zero"));
    }
    Ok(cents)
}

pub fn non_negative_cents(field: &'static str, amount: Decimal) -> LedgerResult<i64> {
    let cents = checked_cents(field, amount)?;
    if cents < 0 {
        return Err(LedgerError::validation(field, "must not be negative"));
    }
    Ok(cents)
}
