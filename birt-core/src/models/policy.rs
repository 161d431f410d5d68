//! Per-year policy configuration: tax rates, exemption schedule, and the
//! two statutory rates that tie BIRT and NPT together.
//!
//! The engine never hard-codes a calendar range. Everything it needs to
//! know about the regime is derived from an injected [`PolicySchedule`],
//! so the same calculators run against synthetic policy years in tests.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when the schedule cannot answer a lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The requested year has no rate set configured.
    #[error("no rate set configured for tax year {0}")]
    MissingRates(i32),

    /// The requested year has no exemption configured.
    #[error("no exemption configured for tax year {0}")]
    MissingExemption(i32),

    /// The schedule contains no years at all.
    #[error("policy schedule has no years configured")]
    EmptySchedule,

    /// The exemption never reaches zero, so there is no phase-out to analyze.
    #[error("exemption schedule never phases out")]
    NoPhaseOut,
}

/// The three statutory rates in force for one tax year.
///
/// BIRT taxes gross receipts and net income at separate rates; NPT taxes
/// net income at a single flat rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    pub birt_net_income: Decimal,
    pub birt_gross_receipts: Decimal,
    pub npt: Decimal,
}

/// The full tax regime the engine runs against.
///
/// Invariant (supplied by the caller, validated by the data loader): once a
/// year's exemption reaches zero, every later year's exemption is zero.
/// The grace-year rules assume a single phase-out transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySchedule {
    pub rates: BTreeMap<i32, RateSet>,
    pub exemptions: BTreeMap<i32, Decimal>,
    /// Share of the BIRT net-income tax credited against NPT.
    pub birt_credit_rate: Decimal,
    /// Share of the prior year's NPT due as an estimated prepayment.
    pub npt_estimated_rate: Decimal,
}

impl PolicySchedule {
    pub fn rate_set(&self, year: i32) -> Result<&RateSet, PolicyError> {
        self.rates.get(&year).ok_or(PolicyError::MissingRates(year))
    }

    pub fn exemption(&self, year: i32) -> Result<Decimal, PolicyError> {
        self.exemptions
            .get(&year)
            .copied()
            .ok_or(PolicyError::MissingExemption(year))
    }

    /// Exemption lookup for years that may legitimately fall outside the
    /// schedule. The grace rules treat an unknown year as "condition not
    /// met" rather than an error.
    pub fn exemption_if_known(&self, year: i32) -> Option<Decimal> {
        self.exemptions.get(&year).copied()
    }

    /// Earliest configured tax year.
    pub fn first_year(&self) -> Result<i32, PolicyError> {
        self.rates
            .keys()
            .next()
            .copied()
            .ok_or(PolicyError::EmptySchedule)
    }

    /// Latest configured tax year.
    pub fn last_year(&self) -> Result<i32, PolicyError> {
        self.rates
            .keys()
            .next_back()
            .copied()
            .ok_or(PolicyError::EmptySchedule)
    }

    /// The first year the exemption is zero after at least one nonzero
    /// year, i.e. the year the phase-out lands.
    pub fn phase_out_year(&self) -> Result<i32, PolicyError> {
        let mut saw_nonzero = false;
        for (&year, &exemption) in &self.exemptions {
            if exemption.is_zero() {
                if saw_nonzero {
                    return Ok(year);
                }
            } else {
                saw_nonzero = true;
            }
        }
        Err(PolicyError::NoPhaseOut)
    }

    /// The exemption in force the year before the phase-out lands.
    ///
    /// This amount doubles as the receipts boundary separating small
    /// filers in shock-year selection: a filer at or under it files its
    /// first post-exemption return a year later than everyone else.
    pub fn final_exemption(&self) -> Result<Decimal, PolicyError> {
        let transition = self.phase_out_year()?;
        self.exemption(transition - 1)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn flat_rates() -> RateSet {
        RateSet {
            birt_net_income: dec!(0.06),
            birt_gross_receipts: dec!(0.001),
            npt: dec!(0.04),
        }
    }

    fn schedule_with_exemptions(exemptions: &[(i32, Decimal)]) -> PolicySchedule {
        PolicySchedule {
            rates: exemptions.iter().map(|&(y, _)| (y, flat_rates())).collect(),
            exemptions: exemptions.iter().copied().collect(),
            birt_credit_rate: dec!(0.6),
            npt_estimated_rate: dec!(0.5),
        }
    }

    // =========================================================================
    // lookup tests
    // =========================================================================

    #[test]
    fn rate_set_returns_error_for_unknown_year() {
        let schedule = schedule_with_exemptions(&[(2024, dec!(100000))]);

        let result = schedule.rate_set(1999);

        assert_eq!(result, Err(PolicyError::MissingRates(1999)));
    }

    #[test]
    fn exemption_returns_error_for_unknown_year() {
        let schedule = schedule_with_exemptions(&[(2024, dec!(100000))]);

        let result = schedule.exemption(1999);

        assert_eq!(result, Err(PolicyError::MissingExemption(1999)));
    }

    #[test]
    fn exemption_if_known_returns_none_outside_schedule() {
        let schedule = schedule_with_exemptions(&[(2024, dec!(100000))]);

        assert_eq!(schedule.exemption_if_known(2024), Some(dec!(100000)));
        assert_eq!(schedule.exemption_if_known(1999), None);
    }

    #[test]
    fn year_span_covers_configured_years() {
        let schedule = schedule_with_exemptions(&[
            (2022, dec!(50000)),
            (2023, dec!(50000)),
            (2024, dec!(0)),
        ]);

        assert_eq!(schedule.first_year(), Ok(2022));
        assert_eq!(schedule.last_year(), Ok(2024));
    }

    #[test]
    fn empty_schedule_has_no_span() {
        let schedule = schedule_with_exemptions(&[]);

        assert_eq!(schedule.first_year(), Err(PolicyError::EmptySchedule));
        assert_eq!(schedule.last_year(), Err(PolicyError::EmptySchedule));
    }

    // =========================================================================
    // phase-out derivation tests
    // =========================================================================

    #[test]
    fn phase_out_year_is_first_zero_after_nonzero() {
        let schedule = schedule_with_exemptions(&[
            (2022, dec!(50000)),
            (2023, dec!(50000)),
            (2024, dec!(0)),
            (2025, dec!(0)),
        ]);

        assert_eq!(schedule.phase_out_year(), Ok(2024));
    }

    #[test]
    fn phase_out_year_absent_when_exemption_never_reaches_zero() {
        let schedule = schedule_with_exemptions(&[(2023, dec!(50000)), (2024, dec!(50000))]);

        assert_eq!(schedule.phase_out_year(), Err(PolicyError::NoPhaseOut));
    }

    #[test]
    fn phase_out_year_absent_when_exemption_was_never_in_force() {
        let schedule = schedule_with_exemptions(&[(2023, dec!(0)), (2024, dec!(0))]);

        assert_eq!(schedule.phase_out_year(), Err(PolicyError::NoPhaseOut));
    }

    #[test]
    fn final_exemption_is_the_level_before_phase_out() {
        let schedule = schedule_with_exemptions(&[
            (2022, dec!(75000)),
            (2023, dec!(50000)),
            (2024, dec!(0)),
        ]);

        assert_eq!(schedule.final_exemption(), Ok(dec!(50000)));
    }
}
