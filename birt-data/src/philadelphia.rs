//! The Philadelphia BIRT/NPT schedule for 2020..2027.
//!
//! Rates follow the enacted reduction path; the gross-receipts exemption
//! holds at $100,000 through tax year 2024 and is removed starting 2025.

use std::collections::BTreeMap;

use birt_core::{PolicySchedule, RateSet};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Share of the BIRT net-income tax credited against NPT.
pub const BIRT_CREDIT_RATE: Decimal = dec!(0.6);

/// Share of the prior year's NPT due as an estimated prepayment.
pub const NPT_ESTIMATED_RATE: Decimal = dec!(0.5);

/// Builds the 2020..2027 Philadelphia schedule.
pub fn schedule() -> PolicySchedule {
    let rates = BTreeMap::from([
        (
            2020,
            RateSet {
                birt_net_income: dec!(0.0599),
                birt_gross_receipts: dec!(0.001415),
                npt: dec!(0.0379),
            },
        ),
        (
            2021,
            RateSet {
                birt_net_income: dec!(0.0599),
                birt_gross_receipts: dec!(0.001415),
                npt: dec!(0.0379),
            },
        ),
        (
            2022,
            RateSet {
                birt_net_income: dec!(0.0599),
                birt_gross_receipts: dec!(0.001415),
                npt: dec!(0.0379),
            },
        ),
        (
            2023,
            RateSet {
                birt_net_income: dec!(0.0581),
                birt_gross_receipts: dec!(0.001415),
                npt: dec!(0.0375),
            },
        ),
        (
            2024,
            RateSet {
                birt_net_income: dec!(0.0581),
                birt_gross_receipts: dec!(0.001415),
                npt: dec!(0.0375),
            },
        ),
        (
            2025,
            RateSet {
                birt_net_income: dec!(0.0571),
                birt_gross_receipts: dec!(0.00141),
                npt: dec!(0.0374),
            },
        ),
        (
            2026,
            RateSet {
                birt_net_income: dec!(0.0565),
                birt_gross_receipts: dec!(0.001395),
                npt: dec!(0.03735),
            },
        ),
        (
            2027,
            RateSet {
                birt_net_income: dec!(0.056),
                birt_gross_receipts: dec!(0.00139),
                npt: dec!(0.0373),
            },
        ),
    ]);

    let exemptions = (2020..=2027)
        .map(|year| {
            let amount = if year < 2025 { dec!(100000) } else { dec!(0) };
            (year, amount)
        })
        .collect();

    PolicySchedule {
        rates,
        exemptions,
        birt_credit_rate: BIRT_CREDIT_RATE,
        npt_estimated_rate: NPT_ESTIMATED_RATE,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn schedule_spans_2020_through_2027() {
        let schedule = schedule();

        assert_eq!(schedule.first_year(), Ok(2020));
        assert_eq!(schedule.last_year(), Ok(2027));
    }

    #[test]
    fn exemption_phases_out_in_2025() {
        let schedule = schedule();

        assert_eq!(schedule.phase_out_year(), Ok(2025));
        assert_eq!(schedule.final_exemption(), Ok(dec!(100000)));
        assert_eq!(schedule.exemption(2024), Ok(dec!(100000)));
        assert_eq!(schedule.exemption(2025), Ok(dec!(0)));
    }

    #[test]
    fn rate_path_declines_across_the_window() {
        let schedule = schedule();

        let first = schedule.rate_set(2020).unwrap();
        let last = schedule.rate_set(2027).unwrap();
        assert_eq!(first.birt_net_income, dec!(0.0599));
        assert_eq!(last.birt_net_income, dec!(0.056));
        assert_eq!(first.npt, dec!(0.0379));
        assert_eq!(last.npt, dec!(0.0373));
    }

    #[test]
    fn statutory_prepayment_rates_match_the_regime() {
        let schedule = schedule();

        assert_eq!(schedule.birt_credit_rate, dec!(0.6));
        assert_eq!(schedule.npt_estimated_rate, dec!(0.5));
    }
}
