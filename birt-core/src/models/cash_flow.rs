use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dollars actually remitted at one filing date: the prior income year's
/// liability, estimated prepayments toward the current year, and the
/// true-up credit for estimates already paid at the previous filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    /// The filing year (payment lands in April of this year).
    pub year: i32,
    /// Prior income year's total liability, now due.
    pub tax_due: Decimal,
    /// Estimated BIRT prepayment (100% of prior-year BIRT unless waived).
    pub est_birt: Decimal,
    /// Estimated NPT prepayment (a fixed share of prior-year NPT).
    pub est_npt: Decimal,
    /// Credit for estimates paid at the previous filing; zero or negative.
    pub adjustment: Decimal,
    pub total_cash_burden: Decimal,
    /// True when the exemption-removal grace waived the BIRT estimate.
    /// A first-year filer's waiver does not set this flag.
    pub grace_year: bool,
}

impl CashFlow {
    /// Filing year with nothing due: the business was not yet a taxpayer.
    pub fn zero(year: i32) -> Self {
        Self {
            year,
            tax_due: Decimal::ZERO,
            est_birt: Decimal::ZERO,
            est_npt: Decimal::ZERO,
            adjustment: Decimal::ZERO,
            total_cash_burden: Decimal::ZERO,
            grace_year: false,
        }
    }
}
