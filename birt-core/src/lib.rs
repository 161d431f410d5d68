pub mod calculations;
pub mod models;

pub use calculations::{
    CashFlowWorksheet, LiabilityError, LiabilityWorksheet, ScenarioError, ScenarioProjector,
    ScenarioWindow,
};
pub use models::*;
