pub mod loader;
pub mod philadelphia;

pub use loader::{ExemptionRecord, RateRecord, ScheduleLoader, ScheduleLoaderError};
