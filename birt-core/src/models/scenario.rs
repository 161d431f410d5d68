use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CashFlow, TaxLiability};

/// The business profile a projection runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub net_income: Decimal,
    pub gross_receipts: Decimal,
    /// Year the business began operating.
    pub start_year: i32,
}

/// Which of the two shock candidates was larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockType {
    /// Year-over-year change in total cash remitted.
    Cash,
    /// Year-over-year change in the estimated BIRT prepayment alone,
    /// the money held by the city as working capital.
    WorkingCapital,
}

impl fmt::Display for ShockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::WorkingCapital => write!(f, "working capital"),
        }
    }
}

/// Reduced view of a projection for consumers that only need the shock
/// analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockSummary {
    pub shock_year: i32,
    pub shock_amount: Decimal,
    pub shock_type: ShockType,
    pub cash_shock: Decimal,
    pub working_cash_shock: Decimal,
}

/// Everything a full projection produces: the per-year maps plus the
/// shock analysis and the pure-liability baseline comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub net_income: Decimal,
    pub gross_receipts: Decimal,
    pub start_year: i32,

    pub liabilities: BTreeMap<i32, TaxLiability>,
    pub cash_flows: BTreeMap<i32, CashFlow>,

    /// Liability delta across the phase-out transition, ignoring cash-flow
    /// timing entirely.
    pub annual_tax_increase: Decimal,

    pub shock_year: i32,
    pub cash_shock: Decimal,
    pub working_cash_shock: Decimal,
    pub shock_amount: Decimal,
    pub shock_type: ShockType,

    /// The shock-year filing and the one before it, as compared.
    pub shock_cash: CashFlow,
    pub prior_shock_cash: CashFlow,
}

impl ScenarioResult {
    pub fn shock_summary(&self) -> ShockSummary {
        ShockSummary {
            shock_year: self.shock_year,
            shock_amount: self.shock_amount,
            shock_type: self.shock_type,
            cash_shock: self.cash_shock,
            working_cash_shock: self.working_cash_shock,
        }
    }
}
