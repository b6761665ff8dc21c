//! Fixed-point money helpers.
//!
//! Amounts are `Decimal` in business code and are normalized to two decimal
//! places. Columns hold whole cents as integers, so nothing passes through a
//! floating-point value on its way to or from `SQLite`.

use crate::errors::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

/// Number of decimal places kept for every amount.
pub const SCALE: u32 = 2;

/// Largest amount accepted, in cents (`99999999.99`, a `DECIMAL(10, 2)`).
pub const MAX_CENTS: i64 = 9_999_999_999;

/// Rounds half away from zero to two places and pins the scale, so `50`
/// becomes `50.00`.
#[must_use]
pub fn round(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

/// Rounds `value` and rejects negatives and amounts above [`MAX_CENTS`],
/// naming `field` in the error.
pub fn non_negative(field: &str, value: Decimal) -> Result<Decimal> {
    if value < Decimal::ZERO {
        return Err(Error::validation(format!("{field} cannot be negative")));
    }
    let rounded = round(value);
    if rounded > from_cents(MAX_CENTS) {
        return Err(Error::validation(format!(
            "{field} cannot exceed {}",
            from_cents(MAX_CENTS)
        )));
    }
    Ok(rounded)
}

/// Validates an amount like [`non_negative`] and converts it to whole cents.
pub fn to_cents(field: &str, value: Decimal) -> Result<i64> {
    let rounded = non_negative(field, value)?;
    // scale is pinned to 2, so the mantissa is the amount in cents
    i64::try_from(rounded.mantissa())
        .map_err(|_| Error::validation(format!("{field} is out of range")))
}

/// Turns a stored cent count back into a two-place amount.
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, SCALE)
}

/// Serde helper: writes an amount as a two-place string (`"50.00"`).
pub fn serialize<S>(value: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&round(*value).to_string())
}

/// Serde helper for cent columns: writes `1050` as `"10.50"`.
pub fn serialize_cents<S>(cents: &i64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&from_cents(*cents).to_string())
}
