//! Cash actually remitted at one filing date.
//!
//! Liability accrues for an income year, but the dollars move a year
//! later: the return filed in April of year Y reports year Y−1, pays that
//! liability, prepays estimates toward year Y, and takes credit for the
//! estimates already paid with the previous return.
//!
//! # Filing Composition
//!
//! | Component  | Description |
//! |------------|-------------|
//! | tax due    | year Y−1's total liability |
//! | est. BIRT  | 100% of year Y−1's BIRT, unless a grace rule waives it |
//! | est. NPT   | a fixed share (50% here) of year Y−1's post-credit NPT, never waived |
//! | adjustment | minus the estimates paid with the year Y−1 return |
//!
//! # Grace Rules
//!
//! The BIRT estimate is waived in exactly two situations, the first taking
//! precedence:
//!
//! 1. *First filing*: year Y−1 was the business's first year and it owed
//!    BIRT for that year. No estimate history exists to base a prepayment
//!    on.
//! 2. *Exemption removal*: year Y−1 is the year the exemption disappeared
//!    (zero, where Y−2 was nonzero) and the business never owed BIRT while
//!    the exemption was in force. The filer is new to BIRT through no
//!    action of its own and gets one year before estimates begin.
//!
//! Only the second rule sets the [`CashFlow::grace_year`] flag; a first
//! filing is not reported as a grace year even though its estimate is
//! also zero.
//!
//! A filing year for which no prior-year liability is recorded, or whose
//! prior-year record shows the business did not exist, produces an
//! all-zero cash flow. Not yet being a taxpayer is an expected state, not
//! an error.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{CashFlow, PolicySchedule, TaxLiability};

/// Outcome of the BIRT estimate waiver rules for one income year.
struct BirtEstimateWaiver {
    waived: bool,
    /// Set only by the exemption-removal rule, never by a first filing.
    exemption_removal: bool,
}

/// Calculator for one filing year's cash burden.
#[derive(Debug, Clone)]
pub struct CashFlowWorksheet<'a> {
    policy: &'a PolicySchedule,
}

impl<'a> CashFlowWorksheet<'a> {
    pub fn new(policy: &'a PolicySchedule) -> Self {
        Self { policy }
    }

    /// Computes the cash remitted with the return filed in `filing_year`.
    ///
    /// `liabilities` must cover the income years the filing draws on
    /// (`filing_year − 1` and, for the true-up, `filing_year − 2`); years
    /// missing from the map are treated as years the business did not
    /// exist. The result depends only on liabilities up to
    /// `filing_year − 1`, never on later ones.
    pub fn calculate(
        &self,
        liabilities: &BTreeMap<i32, TaxLiability>,
        filing_year: i32,
        start_year: i32,
    ) -> CashFlow {
        let Some(reported) = liabilities.get(&(filing_year - 1)) else {
            return CashFlow::zero(filing_year);
        };
        if !reported.business_existed {
            return CashFlow::zero(filing_year);
        }

        let tax_due = reported.total_tax;

        let waiver = self.birt_estimate_waiver(liabilities, filing_year - 1, start_year);
        let est_birt = if waiver.waived {
            Decimal::ZERO
        } else {
            reported.birt_total
        };
        let est_npt = reported.npt_after_credit * self.policy.npt_estimated_rate;

        // Credit back whatever the previous filing prepaid, re-deriving
        // its estimates under the same waiver rules shifted one year.
        let adjustment = match liabilities.get(&(filing_year - 2)) {
            Some(prior) if prior.business_existed => {
                let prior_waiver =
                    self.birt_estimate_waiver(liabilities, filing_year - 2, start_year);
                let prior_est_birt = if prior_waiver.waived {
                    Decimal::ZERO
                } else {
                    prior.birt_total
                };
                let prior_est_npt = prior.npt_after_credit * self.policy.npt_estimated_rate;
                -(prior_est_birt + prior_est_npt)
            }
            _ => Decimal::ZERO,
        };

        let total_cash_burden = tax_due + est_birt + est_npt + adjustment;

        CashFlow {
            year: filing_year,
            tax_due,
            est_birt,
            est_npt,
            adjustment,
            total_cash_burden,
            grace_year: waiver.exemption_removal,
        }
    }

    /// Evaluates the two waiver rules for the filing that reports
    /// `income_year`. Exemption lookups outside the schedule mean the
    /// condition is simply not met; a start year outside `liabilities`
    /// means no first-year BIRT is on record.
    fn birt_estimate_waiver(
        &self,
        liabilities: &BTreeMap<i32, TaxLiability>,
        income_year: i32,
        start_year: i32,
    ) -> BirtEstimateWaiver {
        let owed_birt_in_first_year = liabilities
            .get(&start_year)
            .is_some_and(|first| first.birt_total > Decimal::ZERO);

        let first_filing = income_year == start_year && owed_birt_in_first_year;

        let exemption_just_removed = match (
            self.policy.exemption_if_known(income_year),
            self.policy.exemption_if_known(income_year - 1),
        ) {
            (Some(current), Some(previous)) => {
                current.is_zero() && previous > Decimal::ZERO
            }
            _ => false,
        };
        let owed_birt_under_exemption = owed_birt_in_first_year
            && self
                .policy
                .exemption_if_known(start_year)
                .is_some_and(|exemption| exemption > Decimal::ZERO);

        let exemption_removal =
            exemption_just_removed && !owed_birt_under_exemption && !first_filing;

        BirtEstimateWaiver {
            waived: first_filing || exemption_removal,
            exemption_removal,
        }
    }
}
