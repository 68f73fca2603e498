pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use game::{Game, GameConfig, GameError, GameSummary};
pub use infra::{AStar, Action, CargoSet, Position};
pub use planners::{CompiledPlan, PeriodPlanner, PlanExecutor, StagePlan};
pub use state::{Field, Item, ItemCollection, Stage, StageState};
