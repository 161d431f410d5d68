//! Multi-year projection across the exemption phase-out.
//!
//! Builds the liability map for every year in the analysis window, runs
//! the filing-year cash flows over it, and compares the two candidate
//! shock measures for the year the phase-out hits the filer's wallet:
//! the change in total cash remitted, and the change in the estimated
//! BIRT prepayment alone (the working-capital effect). The larger of the
//! two is reported as the shock amount.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{CashFlowWorksheet, LiabilityError, LiabilityWorksheet};
use crate::models::{
    CashFlow, PolicyError, PolicySchedule, ScenarioInput, ScenarioResult, ShockSummary, ShockType,
};

/// Errors that can occur while projecting a scenario.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error(transparent)]
    Liability(#[from] LiabilityError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The window excludes a year the shock analysis needs.
    #[error("analysis window does not cover tax year {0}")]
    WindowTooNarrow(i32),
}

/// The span of income years a projection records. Filings start one year
/// after the first liability year, since the first recorded year has no
/// prior-year return to draw on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioWindow {
    first_liability_year: i32,
    last_year: i32,
}

impl ScenarioWindow {
    /// The standard window: everything after the schedule's first year.
    pub fn standard(policy: &PolicySchedule) -> Result<Self, PolicyError> {
        Ok(Self {
            first_liability_year: policy.first_year()? + 1,
            last_year: policy.last_year()?,
        })
    }

    /// The full configured span, first year included. The detailed
    /// explanation uses this so even the earliest filing can be walked
    /// through; it also puts the first year's liability on record, which
    /// can change the grace determination for a business started then.
    pub fn extended(policy: &PolicySchedule) -> Result<Self, PolicyError> {
        Ok(Self {
            first_liability_year: policy.first_year()?,
            last_year: policy.last_year()?,
        })
    }

    pub fn liability_years(&self) -> RangeInclusive<i32> {
        self.first_liability_year..=self.last_year
    }

    pub fn filing_years(&self) -> RangeInclusive<i32> {
        (self.first_liability_year + 1)..=self.last_year
    }
}

/// Orchestrates the per-year calculators across an analysis window.
#[derive(Debug, Clone)]
pub struct ScenarioProjector<'a> {
    policy: &'a PolicySchedule,
}

impl<'a> ScenarioProjector<'a> {
    pub fn new(policy: &'a PolicySchedule) -> Self {
        Self { policy }
    }

    /// Projects the profile over the standard window.
    pub fn project(&self, input: &ScenarioInput) -> Result<ScenarioResult, ScenarioError> {
        let window = ScenarioWindow::standard(self.policy)?;
        self.project_in(input, &window)
    }

    /// Projects the profile over an explicit window.
    pub fn project_in(
        &self,
        input: &ScenarioInput,
        window: &ScenarioWindow,
    ) -> Result<ScenarioResult, ScenarioError> {
        debug!(
            net_income = %input.net_income,
            gross_receipts = %input.gross_receipts,
            start_year = input.start_year,
            "projecting phase-out scenario"
        );
        if input.start_year < window.first_liability_year {
            warn!(
                start_year = input.start_year,
                first_recorded_year = window.first_liability_year,
                "business predates the recorded window; its first filings are not modeled"
            );
        }

        let liability_worksheet = LiabilityWorksheet::new(self.policy);
        let mut liabilities = BTreeMap::new();
        for year in window.liability_years() {
            let business_existed = year >= input.start_year;
            let liability = liability_worksheet.calculate(
                input.net_income,
                input.gross_receipts,
                year,
                business_existed,
            )?;
            liabilities.insert(year, liability);
        }

        let cash_worksheet = CashFlowWorksheet::new(self.policy);
        let mut cash_flows = BTreeMap::new();
        for year in window.filing_years() {
            let cash = cash_worksheet.calculate(&liabilities, year, input.start_year);
            cash_flows.insert(year, cash);
        }

        let transition = self.policy.phase_out_year()?;
        let small_filer_boundary = self.policy.final_exemption()?;

        // Small filers fall under the filing threshold the first
        // post-exemption year and feel the cliff one filing later.
        let shock_year = if input.gross_receipts <= small_filer_boundary {
            transition + 2
        } else {
            transition + 1
        };

        let shock_cash = cash_flows
            .get(&shock_year)
            .cloned()
            .unwrap_or_else(|| CashFlow::zero(shock_year));
        let prior_shock_cash = cash_flows
            .get(&(shock_year - 1))
            .cloned()
            .unwrap_or_else(|| CashFlow::zero(shock_year - 1));

        let cash_shock = shock_cash.total_cash_burden - prior_shock_cash.total_cash_burden;
        let working_cash_shock = shock_cash.est_birt - prior_shock_cash.est_birt;
        let (shock_amount, shock_type) = if cash_shock >= working_cash_shock {
            (cash_shock, ShockType::Cash)
        } else {
            (working_cash_shock, ShockType::WorkingCapital)
        };

        let annual_tax_increase = {
            let with_exemption = liabilities
                .get(&(transition - 1))
                .ok_or(ScenarioError::WindowTooNarrow(transition - 1))?;
            let without_exemption = liabilities
                .get(&transition)
                .ok_or(ScenarioError::WindowTooNarrow(transition))?;
            without_exemption.total_tax - with_exemption.total_tax
        };

        Ok(ScenarioResult {
            net_income: input.net_income,
            gross_receipts: input.gross_receipts,
            start_year: input.start_year,
            liabilities,
            cash_flows,
            annual_tax_increase,
            shock_year,
            cash_shock,
            working_cash_shock,
            shock_amount,
            shock_type,
            shock_cash,
            prior_shock_cash,
        })
    }

    /// Just the shock analysis, for consumers that don't need the per-year
    /// maps.
    pub fn shock_summary(&self, input: &ScenarioInput) -> Result<ShockSummary, ScenarioError> {
        Ok(self.project(input)?.shock_summary())
    }
}
