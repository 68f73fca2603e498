use crate::game::GameSummary;
use crate::infra::GameObserver;
use crate::planners::StagePlan;
use crate::state::{Stage, TurnResult};

pub struct CompositeObserver {
    observers: Vec<Box<dyn GameObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn GameObserver>>) -> Self {
        Self { observers }
    }
}

impl GameObserver for CompositeObserver {
    fn on_stage_start(&mut self, number: u32, stage: &Stage) {
        for observer in &mut self.observers {
            observer.on_stage_start(number, stage);
        }
    }

    fn on_plan_ready(&mut self, number: u32, plan: &StagePlan) {
        for observer in &mut self.observers {
            observer.on_plan_ready(number, plan);
        }
    }

    fn on_turn(&mut self, result: &TurnResult, stage: &Stage) {
        for observer in &mut self.observers {
            observer.on_turn(result, stage);
        }
    }

    fn on_period_end(&mut self, period: usize, cost: u32, stage: &Stage) {
        for observer in &mut self.observers {
            observer.on_period_end(period, cost, stage);
        }
    }

    fn on_stage_finished(&mut self, number: u32, stage: &Stage) {
        for observer in &mut self.observers {
            observer.on_stage_finished(number, stage);
        }
    }

    fn on_game_finished(&mut self, summary: &GameSummary) {
        for observer in &mut self.observers {
            observer.on_game_finished(summary);
        }
    }
}
