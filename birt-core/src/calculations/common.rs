//! Shared helpers for the calculators.
//!
//! No rounding happens anywhere in this crate: amounts keep full decimal
//! precision end to end, and presentation layers round when they format.

use rust_decimal::Decimal;

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use birt_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a value at zero from below. Taxable bases and post-credit taxes
/// can never go negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use birt_core::calculations::common::floor_zero;
///
/// assert_eq!(floor_zero(dec!(-25.00)), dec!(0));
/// assert_eq!(floor_zero(dec!(25.00)), dec!(25.00));
/// ```
pub fn floor_zero(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
