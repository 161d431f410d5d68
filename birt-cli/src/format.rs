//! Presentation-side number formatting.
//!
//! The engine keeps full precision; every rounding decision lives here,
//! at the moment a number is turned into text.

use rust_decimal::{Decimal, RoundingStrategy};

/// Whole-dollar currency with thousands grouping: `$1,234`.
pub fn currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded < Decimal::ZERO {
        format!("-${}", grouped(rounded.abs()))
    } else {
        format!("${}", grouped(rounded))
    }
}

/// Compact currency used inside formulas: `$150K` from one thousand up,
/// plain currency below.
pub fn compact_currency(amount: Decimal) -> String {
    if amount >= Decimal::ONE_THOUSAND {
        let thousands = (amount / Decimal::ONE_THOUSAND)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("${thousands}K")
    } else {
        currency(amount)
    }
}

/// Percent display for statutory rates. Rates under 1% get a third
/// decimal place so the gross-receipts mills stay visible.
pub fn percent(rate: Decimal) -> String {
    let scaled = rate * Decimal::ONE_HUNDRED;
    if rate < Decimal::new(1, 2) {
        let rounded = scaled.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.3}%")
    } else {
        let rounded = scaled.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}%")
    }
}

fn grouped(value: Decimal) -> String {
    let digits = value.to_string();
    let mut groups = Vec::new();
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // currency tests
    // =========================================================================

    #[test]
    fn currency_rounds_to_whole_dollars() {
        assert_eq!(currency(dec!(1234.49)), "$1,234");
        assert_eq!(currency(dec!(1234.50)), "$1,235");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(dec!(0)), "$0");
        assert_eq!(currency(dec!(999)), "$999");
        assert_eq!(currency(dec!(1000)), "$1,000");
        assert_eq!(currency(dec!(1900000)), "$1,900,000");
    }

    #[test]
    fn currency_keeps_the_sign_outside_the_symbol() {
        assert_eq!(currency(dec!(-5760)), "-$5,760");
        assert_eq!(currency(dec!(-1234.5)), "-$1,235");
    }

    // =========================================================================
    // compact_currency tests
    // =========================================================================

    #[test]
    fn compact_currency_abbreviates_thousands() {
        assert_eq!(compact_currency(dec!(100000)), "$100K");
        assert_eq!(compact_currency(dec!(2000000)), "$2000K");
        assert_eq!(compact_currency(dec!(1500)), "$2K");
    }

    #[test]
    fn compact_currency_keeps_small_amounts_exact() {
        assert_eq!(compact_currency(dec!(999)), "$999");
        assert_eq!(compact_currency(dec!(0)), "$0");
    }

    // =========================================================================
    // percent tests
    // =========================================================================

    #[test]
    fn percent_uses_two_places_at_or_above_one_percent() {
        assert_eq!(percent(dec!(0.0581)), "5.81%");
        assert_eq!(percent(dec!(0.6)), "60.00%");
        assert_eq!(percent(dec!(0.01)), "1.00%");
    }

    #[test]
    fn percent_uses_three_places_below_one_percent() {
        assert_eq!(percent(dec!(0.001415)), "0.142%");
        assert_eq!(percent(dec!(0.00139)), "0.139%");
    }
}
