use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RateSet;

/// One income year's assessed liability, carrying every intermediate the
/// filing worksheet produces. Downstream consumers (cash-flow rules, the
/// explanation renderer, tests) read the intermediates directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLiability {
    pub year: i32,
    pub business_existed: bool,

    // Inputs and the policy in force, echoed for downstream display
    pub net_income: Decimal,
    pub gross_receipts: Decimal,
    pub exemption: Decimal,
    pub rates: RateSet,

    // Taxable bases
    pub taxable_gross_receipts: Decimal,
    pub statutory_deduction: Decimal,
    pub taxable_net_income_birt: Decimal,
    pub taxable_net_income_npt: Decimal,

    // BIRT components
    pub birt_gross_receipts_tax: Decimal,
    pub birt_net_income_tax: Decimal,
    pub birt_total: Decimal,

    // NPT and the BIRT credit against it
    pub npt_before_credit: Decimal,
    pub birt_credit: Decimal,
    pub npt_after_credit: Decimal,

    pub total_tax: Decimal,
}

impl TaxLiability {
    /// Record for a year before the business existed: the inputs and that
    /// year's policy are echoed, every base and tax is zero.
    pub fn dormant(
        year: i32,
        net_income: Decimal,
        gross_receipts: Decimal,
        exemption: Decimal,
        rates: RateSet,
    ) -> Self {
        Self {
            year,
            business_existed: false,
            net_income,
            gross_receipts,
            exemption,
            rates,
            taxable_gross_receipts: Decimal::ZERO,
            statutory_deduction: Decimal::ZERO,
            taxable_net_income_birt: Decimal::ZERO,
            taxable_net_income_npt: Decimal::ZERO,
            birt_gross_receipts_tax: Decimal::ZERO,
            birt_net_income_tax: Decimal::ZERO,
            birt_total: Decimal::ZERO,
            npt_before_credit: Decimal::ZERO,
            birt_credit: Decimal::ZERO,
            npt_after_credit: Decimal::ZERO,
            total_tax: Decimal::ZERO,
        }
    }
}
