use tracing::{debug, info, trace};

use crate::game::GameSummary;
use crate::infra::GameObserver;
use crate::planners::StagePlan;
use crate::state::{Stage, StageState, TurnResult};

/// Reports game progress through `tracing`.
pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_stage_start(&mut self, number: u32, stage: &Stage) {
        let field = stage.field();
        info!("Stage {} started", number);
        debug!("- field: {}x{}, office at {}", field.width, field.height, field.office_pos());
        debug!("- items: {}", stage.items().len());
    }

    fn on_plan_ready(&mut self, number: u32, plan: &StagePlan) {
        for (period, tour) in plan.periods().iter().enumerate() {
            debug!(
                "Stage {} period {}: items [{}], {} turns",
                number,
                period,
                tour.cargo(),
                tour.route_length()
            );
        }
    }

    fn on_turn(&mut self, result: &TurnResult, _stage: &Stage) {
        let action = result.action.map_or("load", |action| action.as_str_name());
        trace!(
            "turn: {}, action: {}, pos: {}, cargo: [{}], cost: {}",
            result.turn,
            action,
            result.truck_pos,
            result.cargo,
            result.running_cost()
        );
    }

    fn on_period_end(&mut self, period: usize, cost: u32, _stage: &Stage) {
        debug!("Period {} finished, cost {}", period, cost);
    }

    fn on_stage_finished(&mut self, number: u32, stage: &Stage) {
        match stage.state() {
            StageState::Complete => info!(
                "Stage {} complete in {} turns, cost {}, score {}",
                number,
                stage.turn(),
                stage.total_cost(),
                stage.score()
            ),
            state => info!("Stage {} ended as {:?} after {} turns", number, state, stage.turn()),
        }
    }

    fn on_game_finished(&mut self, summary: &GameSummary) {
        info!("Game finished after {} stages", summary.stages);
        info!("- complete: {}", summary.complete);
        info!("- failed: {}", summary.failed);
        info!("- turn limit: {}", summary.turn_limit);
        info!("- total score: {}", summary.total_score);
    }
}
