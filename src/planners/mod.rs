mod compiler;
mod executor;
mod path;
mod period_plan;
mod period_planner;

pub use compiler::{CompiledPeriod, CompiledPlan};
pub use executor::PlanExecutor;
pub use path::{NodeRef, Path, PathCache, PlanError};
pub use period_plan::{InsertionPoint, PeriodPlan, StagePlan};
pub use period_planner::PeriodPlanner;
