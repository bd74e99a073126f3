//! Domain records for production runs

mod display;
mod run;

pub use display::resolve_display_name;
pub use run::{DetailId, EmployeeOutputEntry, MaterialUsageEntry, ProductionRun, ProductionStatus};
