//! Per-year table views of a projection.

use birt_core::{CashFlow, TaxLiability};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::format;

#[derive(Debug, Clone, Tabled)]
pub struct LiabilityRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Taxable GR")]
    taxable_gross_receipts: String,
    #[tabled(rename = "Deduction")]
    statutory_deduction: String,
    #[tabled(rename = "BIRT")]
    birt_total: String,
    #[tabled(rename = "NPT")]
    npt_after_credit: String,
    #[tabled(rename = "Total")]
    total_tax: String,
}

impl From<&TaxLiability> for LiabilityRow {
    fn from(liability: &TaxLiability) -> Self {
        if !liability.business_existed {
            return LiabilityRow {
                year: liability.year,
                taxable_gross_receipts: "—".to_string(),
                statutory_deduction: "—".to_string(),
                birt_total: "—".to_string(),
                npt_after_credit: "—".to_string(),
                total_tax: "—".to_string(),
            };
        }
        LiabilityRow {
            year: liability.year,
            taxable_gross_receipts: format::currency(liability.taxable_gross_receipts),
            statutory_deduction: format::currency(liability.statutory_deduction),
            birt_total: format::currency(liability.birt_total),
            npt_after_credit: format::currency(liability.npt_after_credit),
            total_tax: format::currency(liability.total_tax),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct CashFlowRow {
    #[tabled(rename = "Filed")]
    year: i32,
    #[tabled(rename = "Tax due")]
    tax_due: String,
    #[tabled(rename = "Est. BIRT")]
    est_birt: String,
    #[tabled(rename = "Est. NPT")]
    est_npt: String,
    #[tabled(rename = "Adjustment")]
    adjustment: String,
    #[tabled(rename = "Total cash")]
    total_cash_burden: String,
    #[tabled(rename = "Grace")]
    grace: String,
}

impl From<&CashFlow> for CashFlowRow {
    fn from(cash: &CashFlow) -> Self {
        CashFlowRow {
            year: cash.year,
            tax_due: format::currency(cash.tax_due),
            est_birt: format::currency(cash.est_birt),
            est_npt: format::currency(cash.est_npt),
            adjustment: format::currency(cash.adjustment),
            total_cash_burden: format::currency(cash.total_cash_burden),
            grace: if cash.grace_year {
                "yes".to_string()
            } else {
                String::new()
            },
        }
    }
}

pub fn liability_table<'a>(liabilities: impl IntoIterator<Item = &'a TaxLiability>) -> String {
    let rows: Vec<LiabilityRow> = liabilities.into_iter().map(LiabilityRow::from).collect();
    render(rows)
}

pub fn cash_flow_table<'a>(cash_flows: impl IntoIterator<Item = &'a CashFlow>) -> String {
    let rows: Vec<CashFlowRow> = cash_flows.into_iter().map(CashFlowRow::from).collect();
    render(rows)
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}
