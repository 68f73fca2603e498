use crate::game::GameSummary;
use crate::planners::StagePlan;
use crate::state::{Stage, TurnResult};

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called when a stage has been generated, before its first turn
    fn on_stage_start(&mut self, number: u32, stage: &Stage);

    /// Called once the planner has assigned every item of the stage
    fn on_plan_ready(&mut self, _number: u32, _plan: &StagePlan) {
        // Default implementation does nothing
    }

    /// Called after every turn with the snapshot the stage produced
    fn on_turn(&mut self, result: &TurnResult, stage: &Stage);

    /// Called when the truck is back empty at the office
    fn on_period_end(&mut self, _period: usize, _cost: u32, _stage: &Stage) {
        // Default implementation does nothing
    }

    /// Called when the stage reached a terminal state
    fn on_stage_finished(&mut self, number: u32, stage: &Stage);

    /// Called when every stage has been played
    fn on_game_finished(&mut self, summary: &GameSummary);
}
