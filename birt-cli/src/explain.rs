//! Step-by-step walkthrough of the projection arithmetic.
//!
//! Builds the explanation as structured sections so it can be rendered as
//! terminal text, a standalone HTML page, or JSON without recomputing
//! anything.

use birt_core::{
    CashFlow, LiabilityWorksheet, PolicySchedule, ScenarioError, ScenarioResult, ShockType,
    TaxLiability,
};
use serde::Serialize;

use crate::format;

#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub label: String,
    pub formula: String,
    pub value: String,
}

impl Step {
    fn new(
        label: impl Into<String>,
        formula: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            formula: formula.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub steps: Vec<Step>,
}

/// Builds the full walkthrough: both liability years across the
/// transition, the annual tax increase, the two filings the shock
/// comparison draws on, and the comparison itself.
pub fn walkthrough(
    policy: &PolicySchedule,
    result: &ScenarioResult,
) -> Result<Vec<Section>, ScenarioError> {
    let transition = policy.phase_out_year()?;
    let baseline_year = transition - 1;

    // The liability walkthrough is independent of the start year: it
    // contrasts an operating business's bill in the last exemption year
    // with the first year without one.
    let worksheet = LiabilityWorksheet::new(policy);
    let with_exemption =
        worksheet.calculate(result.net_income, result.gross_receipts, baseline_year, true)?;
    let without_exemption =
        worksheet.calculate(result.net_income, result.gross_receipts, transition, true)?;

    Ok(vec![
        liability_section(policy, &with_exemption),
        liability_section(policy, &without_exemption),
        increase_section(&with_exemption, &without_exemption),
        cash_section(policy, &result.prior_shock_cash, false),
        cash_section(policy, &result.shock_cash, true),
        shock_section(result),
    ])
}

fn liability_section(
    policy: &PolicySchedule,
    liability: &TaxLiability,
) -> Section {
    let net = format::compact_currency(liability.net_income);
    let gross = format::compact_currency(liability.gross_receipts);
    let exemption = format::compact_currency(liability.exemption);

    let title = if liability.exemption.is_zero() {
        format!("{} tax liability (without exemption)", liability.year)
    } else {
        format!(
            "{} tax liability (with {} exemption)",
            liability.year, exemption
        )
    };

    let deduction_formula = if liability.exemption.is_zero() {
        "no exemption".to_string()
    } else if liability.gross_receipts < liability.exemption {
        format!("({net} / {gross}) × {gross}")
    } else {
        format!("({net} / {gross}) × {exemption}")
    };

    let steps = vec![
        Step::new(
            "Taxable GR",
            format!("max(0, {gross} - {exemption})"),
            format::currency(liability.taxable_gross_receipts),
        ),
        Step::new(
            "Statutory deduction",
            deduction_formula,
            format::currency(liability.statutory_deduction),
        ),
        Step::new(
            "Taxable NI (BIRT)",
            format!(
                "max(0, {net} - {})",
                format::currency(liability.statutory_deduction)
            ),
            format::currency(liability.taxable_net_income_birt),
        ),
        Step::new(
            "Taxable NI (NPT)",
            format!("{net} (full)"),
            format::currency(liability.taxable_net_income_npt),
        ),
        Step::new(
            "BIRT on receipts",
            format!(
                "{} × {}",
                format::currency(liability.taxable_gross_receipts),
                format::percent(liability.rates.birt_gross_receipts)
            ),
            format::currency(liability.birt_gross_receipts_tax),
        ),
        Step::new(
            "BIRT on income",
            format!(
                "{} × {}",
                format::currency(liability.taxable_net_income_birt),
                format::percent(liability.rates.birt_net_income)
            ),
            format::currency(liability.birt_net_income_tax),
        ),
        Step::new(
            "Total BIRT",
            format!(
                "{} + {}",
                format::currency(liability.birt_gross_receipts_tax),
                format::currency(liability.birt_net_income_tax)
            ),
            format::currency(liability.birt_total),
        ),
        Step::new(
            "NPT before credit",
            format!("{net} × {}", format::percent(liability.rates.npt)),
            format::currency(liability.npt_before_credit),
        ),
        Step::new(
            "BIRT credit",
            format!(
                "{} × {}",
                format::currency(liability.birt_net_income_tax),
                format::percent(policy.birt_credit_rate)
            ),
            format::currency(liability.birt_credit),
        ),
        Step::new(
            "NPT after credit",
            format!(
                "max(0, {} - {})",
                format::currency(liability.npt_before_credit),
                format::currency(liability.birt_credit)
            ),
            format::currency(liability.npt_after_credit),
        ),
        Step::new(
            format!("Total tax {}", liability.year),
            format!(
                "{} + {}",
                format::currency(liability.birt_total),
                format::currency(liability.npt_after_credit)
            ),
            format::currency(liability.total_tax),
        ),
    ];

    Section {
        title,
        note: None,
        steps,
    }
}

fn increase_section(
    with_exemption: &TaxLiability,
    without_exemption: &TaxLiability,
) -> Section {
    let increase = without_exemption.total_tax - with_exemption.total_tax;
    Section {
        title: "Annual tax increase".to_string(),
        note: None,
        steps: vec![Step::new(
            "Increase",
            format!(
                "{} - {}",
                format::currency(without_exemption.total_tax),
                format::currency(with_exemption.total_tax)
            ),
            format::currency(increase),
        )],
    }
}

fn cash_section(
    policy: &PolicySchedule,
    cash: &CashFlow,
    is_shock_year: bool,
) -> Section {
    let income_year = cash.year - 1;
    let title = if is_shock_year {
        format!("April {} cash burden (shock year)", cash.year)
    } else {
        format!("April {} cash burden", cash.year)
    };

    let birt_formula = if cash.grace_year {
        format!("100% of {income_year} BIRT (grace year, waived)")
    } else {
        format!("100% of {income_year} BIRT")
    };

    let steps = vec![
        Step::new(
            format!("Tax due (from {income_year})"),
            format!("tax liability {income_year}"),
            format::currency(cash.tax_due),
        ),
        Step::new("+ Estimated BIRT", birt_formula, format::currency(cash.est_birt)),
        Step::new(
            "+ Estimated NPT",
            format!(
                "{} of {income_year} NPT",
                format::percent(policy.npt_estimated_rate)
            ),
            format::currency(cash.est_npt),
        ),
        Step::new(
            "- Adjustment",
            "estimates paid with the prior return",
            format::currency(cash.adjustment),
        ),
        Step::new(
            format!("Total cash {}", cash.year),
            format!(
                "{} + {} + {} + {}",
                format::currency(cash.tax_due),
                format::currency(cash.est_birt),
                format::currency(cash.est_npt),
                format::currency(cash.adjustment)
            ),
            format::currency(cash.total_cash_burden),
        ),
    ];

    Section {
        title,
        note: Some(
            "Cash burden is what is actually remitted in April: the prior year's tax \
             plus estimated payments, minus the estimates already paid."
                .to_string(),
        ),
        steps,
    }
}

fn shock_section(result: &ScenarioResult) -> Section {
    let cash_marker = if result.shock_type == ShockType::Cash {
        " ✓"
    } else {
        ""
    };
    let working_marker = if result.shock_type == ShockType::WorkingCapital {
        " ✓"
    } else {
        ""
    };

    Section {
        title: format!("Shock-year comparison ({})", result.shock_year),
        note: None,
        steps: vec![
            Step::new(
                "Cash shock",
                format!(
                    "{} - {}",
                    format::currency(result.shock_cash.total_cash_burden),
                    format::currency(result.prior_shock_cash.total_cash_burden)
                ),
                format!("{}{cash_marker}", format::currency(result.cash_shock)),
            ),
            Step::new(
                "Working-capital shock",
                format!(
                    "{} - {}",
                    format::currency(result.shock_cash.est_birt),
                    format::currency(result.prior_shock_cash.est_birt)
                ),
                format!(
                    "{}{working_marker}",
                    format::currency(result.working_cash_shock)
                ),
            ),
            Step::new(
                "Shock-year impact",
                format!("larger of the two ({} shock)", result.shock_type),
                format::currency(result.shock_amount),
            ),
        ],
    }
}

/// Renders sections as aligned terminal text.
pub fn render_text(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!("== {} ==\n", section.title));
        if let Some(note) = &section.note {
            out.push_str(&format!("{note}\n"));
        }
        for step in &section.steps {
            out.push_str(&format!(
                "  {:<24} {:<44} {:>14}\n",
                step.label, step.formula, step.value
            ));
        }
        out.push('\n');
    }
    out
}

/// Renders sections as a self-contained HTML page.
pub fn render_html(sections: &[Section]) -> String {
    let mut body = String::new();
    for section in sections {
        body.push_str(&format!("    <h3>{}</h3>\n", section.title));
        if let Some(note) = &section.note {
            body.push_str(&format!("    <p class=\"note\">{note}</p>\n"));
        }
        body.push_str("    <table>\n");
        for step in &section.steps {
            body.push_str(&format!(
                "      <tr><td class=\"label\">{}</td><td class=\"formula\">{}</td>\
                 <td class=\"value\">{}</td></tr>\n",
                step.label, step.formula, step.value
            ));
        }
        body.push_str("    </table>\n");
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>BIRT/NPT Phase-Out Walkthrough</title>
    <style>
body {{ font-family: system-ui, sans-serif; max-width: 56rem; margin: 2rem auto; color: #0f172a; }}
h3 {{ border-bottom: 1px solid #cbd5e1; padding-bottom: 0.25rem; }}
table {{ width: 100%; border-collapse: collapse; margin-bottom: 1rem; }}
td {{ padding: 0.25rem 0.5rem; }}
td.formula {{ color: #64748b; }}
td.value {{ text-align: right; font-variant-numeric: tabular-nums; }}
p.note {{ color: #64748b; font-size: 0.9rem; }}
    </style>
</head>
<body>
{body}</body>
</html>
"##
    )
}
