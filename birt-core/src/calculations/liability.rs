//! BIRT and NPT liability for a single income year.
//!
//! This module implements the combined liability worksheet: the Business
//! Income & Receipts Tax (gross-receipts and net-income components, after
//! the exemption and the statutory deduction) plus the Net Profits Tax
//! (flat rate on net income, reduced by a credit tied to the BIRT
//! net-income component).
//!
//! # Worksheet Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable gross receipts: max(0, gross receipts − exemption) |
//! | 2    | Statutory deduction: income/receipts ratio (capped at 1) × the smaller of receipts and exemption |
//! | 3    | BIRT net-income base: max(0, net income − deduction) |
//! | 4    | NPT base: full net income (no exemption in any year) |
//! | 5    | BIRT: receipts base × GR rate + income base × NI rate |
//! | 6    | NPT before credit: NPT base × NPT rate |
//! | 7    | BIRT credit: BIRT net-income tax × credit rate |
//! | 8    | NPT after credit: max(0, NPT − credit) |
//! | 9    | Total: BIRT + NPT after credit |
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use rust_decimal_macros::dec;
//! use birt_core::{LiabilityWorksheet, PolicySchedule, RateSet};
//!
//! let schedule = PolicySchedule {
//!     rates: BTreeMap::from([(
//!         2024,
//!         RateSet {
//!             birt_net_income: dec!(0.0581),
//!             birt_gross_receipts: dec!(0.001415),
//!             npt: dec!(0.0375),
//!         },
//!     )]),
//!     exemptions: BTreeMap::from([(2024, dec!(100000))]),
//!     birt_credit_rate: dec!(0.6),
//!     npt_estimated_rate: dec!(0.5),
//! };
//!
//! let worksheet = LiabilityWorksheet::new(&schedule);
//! let liability = worksheet
//!     .calculate(dec!(500000), dec!(2000000), 2024, true)
//!     .unwrap();
//!
//! assert_eq!(liability.taxable_gross_receipts, dec!(1900000));
//! assert_eq!(liability.statutory_deduction, dec!(25000));
//! assert_eq!(liability.taxable_net_income_birt, dec!(475000));
//! assert_eq!(liability.total_tax, dec!(32477.50));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::floor_zero;
use crate::models::{PolicyError, PolicySchedule, TaxLiability};

/// Errors that can occur when assessing a year's liability.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiabilityError {
    /// Net income below zero is not modeled by this regime.
    #[error("net income must be non-negative, got {0}")]
    NegativeNetIncome(Decimal),

    /// Gross receipts below zero are not modeled by this regime.
    #[error("gross receipts must be non-negative, got {0}")]
    NegativeGrossReceipts(Decimal),

    /// The requested year is not covered by the policy schedule.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Calculator for one income year's BIRT + NPT liability.
#[derive(Debug, Clone)]
pub struct LiabilityWorksheet<'a> {
    policy: &'a PolicySchedule,
}

impl<'a> LiabilityWorksheet<'a> {
    pub fn new(policy: &'a PolicySchedule) -> Self {
        Self { policy }
    }

    /// Assesses the liability for `year`.
    ///
    /// A business that did not yet exist that year owes nothing: the
    /// result is a zero record that still carries the year's rates and
    /// exemption so downstream display has them.
    ///
    /// # Errors
    ///
    /// Returns [`LiabilityError`] if either input is negative or the year
    /// is absent from the rate or exemption table.
    pub fn calculate(
        &self,
        net_income: Decimal,
        gross_receipts: Decimal,
        year: i32,
        business_existed: bool,
    ) -> Result<TaxLiability, LiabilityError> {
        if net_income < Decimal::ZERO {
            return Err(LiabilityError::NegativeNetIncome(net_income));
        }
        if gross_receipts < Decimal::ZERO {
            return Err(LiabilityError::NegativeGrossReceipts(gross_receipts));
        }

        let rates = *self.policy.rate_set(year)?;
        let exemption = self.policy.exemption(year)?;

        if !business_existed {
            return Ok(TaxLiability::dormant(
                year,
                net_income,
                gross_receipts,
                exemption,
                rates,
            ));
        }

        let taxable_gross_receipts = floor_zero(gross_receipts - exemption);
        let statutory_deduction = Self::statutory_deduction(net_income, gross_receipts, exemption);
        let taxable_net_income_birt = floor_zero(net_income - statutory_deduction);
        let taxable_net_income_npt = net_income;

        let birt_gross_receipts_tax = taxable_gross_receipts * rates.birt_gross_receipts;
        let birt_net_income_tax = taxable_net_income_birt * rates.birt_net_income;
        let birt_total = birt_gross_receipts_tax + birt_net_income_tax;

        let npt_before_credit = taxable_net_income_npt * rates.npt;
        let birt_credit = birt_net_income_tax * self.policy.birt_credit_rate;
        let npt_after_credit = floor_zero(npt_before_credit - birt_credit);

        let total_tax = birt_total + npt_after_credit;

        Ok(TaxLiability {
            year,
            business_existed: true,
            net_income,
            gross_receipts,
            exemption,
            rates,
            taxable_gross_receipts,
            statutory_deduction,
            taxable_net_income_birt,
            taxable_net_income_npt,
            birt_gross_receipts_tax,
            birt_net_income_tax,
            birt_total,
            npt_before_credit,
            birt_credit,
            npt_after_credit,
            total_tax,
        })
    }

    /// Proportional allowance against the BIRT net-income base, capped at
    /// the exemption amount. Zero once the exemption is gone, and zero for
    /// a business with no receipts (the ratio is undefined there).
    ///
    /// The income/receipts ratio is capped at 1, and the base it scales is
    /// the receipts themselves only while receipts stay strictly under the
    /// exemption; at or above it, the exemption amount is the base.
    fn statutory_deduction(
        net_income: Decimal,
        gross_receipts: Decimal,
        exemption: Decimal,
    ) -> Decimal {
        if exemption.is_zero() || gross_receipts.is_zero() {
            return Decimal::ZERO;
        }

        let ratio = (net_income / gross_receipts).min(Decimal::ONE);
        if gross_receipts < exemption {
            ratio * gross_receipts
        } else {
            ratio * exemption
        }
    }
}
