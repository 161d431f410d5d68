//! Worksheet-style calculators for the exemption phase-out projection:
//! per-year liability, filing-year cash flow, and the multi-year scenario
//! that ties them together.

pub mod cash_flow;
pub mod common;
pub mod liability;
pub mod scenario;

pub use cash_flow::CashFlowWorksheet;
pub use liability::{LiabilityError, LiabilityWorksheet};
pub use scenario::{ScenarioError, ScenarioProjector, ScenarioWindow};
