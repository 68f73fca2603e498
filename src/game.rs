use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::infra::GameObserver;
use crate::infra::params::GAME_STAGE_COUNT;
use crate::planners::{CompiledPlan, PeriodPlanner, PlanError, PlanExecutor};
use crate::state::{ItemError, LevelDesigner, Stage, StageError, StageState};

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("stage {stage} could not be generated: {source}")]
    Generate {
        stage: u32,
        #[source]
        source: ItemError,
    },
    #[error("stage {stage} could not be planned: {source}")]
    Plan {
        stage: u32,
        #[source]
        source: PlanError,
    },
    #[error("stage {stage} aborted: {source}")]
    Stage {
        stage: u32,
        #[source]
        source: StageError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u64,
    pub first_stage: u32,
    pub stage_count: u32,
    pub records_folder: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            first_stage: 0,
            stage_count: GAME_STAGE_COUNT,
            records_folder: None,
        }
    }
}

/// Totals over every played stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameSummary {
    pub stages: u32,
    pub complete: u32,
    pub failed: u32,
    pub turn_limit: u32,
    pub total_cost: u64,
    pub total_score: u64,
}

impl GameSummary {
    pub fn record(&mut self, stage: &Stage) {
        self.stages += 1;
        match stage.state() {
            StageState::Complete => {
                self.complete += 1;
                self.total_cost += stage.total_cost() as u64;
            }
            StageState::Failed => self.failed += 1,
            StageState::TurnLimit => self.turn_limit += 1,
            StageState::Playing => {}
        }
        self.total_score += stage.score();
    }
}

pub struct Game {
    config: GameConfig,
    observer: Box<dyn GameObserver>,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig, observer: impl GameObserver + 'static) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            observer: Box::new(observer),
            rng,
        }
    }

    /// Play every configured stage in order. Fatal stage errors stop the game.
    /// Stage numbers stop at `u32::MAX`.
    pub fn run(&mut self) -> Result<GameSummary, GameError> {
        let mut summary = GameSummary::default();
        let stages = (self.config.first_stage..=u32::MAX).take(self.config.stage_count as usize);
        for number in stages {
            let stage = self.play_stage(number)?;
            summary.record(&stage);
        }
        self.observer.on_game_finished(&summary);
        Ok(summary)
    }

    pub fn play_stage(&mut self, number: u32) -> Result<Stage, GameError> {
        let (field, items) = LevelDesigner::setup(number, &mut self.rng)
            .map_err(|source| GameError::Generate { stage: number, source })?;

        let plan_start = Instant::now();
        let plan = PeriodPlanner::new(&field, &items)
            .plan()
            .map_err(|source| GameError::Plan { stage: number, source })?;
        tracing::debug!(
            "Stage {} planned in {:.2}ms",
            number,
            plan_start.elapsed().as_secs_f64() * 1000.0
        );

        let mut executor = PlanExecutor::new(CompiledPlan::compile(&plan));
        let mut stage = Stage::new(field, items);
        self.observer.on_stage_start(number, &stage);
        self.observer.on_plan_ready(number, &plan);

        while !stage.state().is_terminal() {
            let result = stage
                .run_turn(&mut executor)
                .map_err(|source| GameError::Stage { stage: number, source })?;
            self.observer.on_turn(&result, &stage);
            if result.period_end {
                let period = stage.period().unwrap_or_default();
                self.observer.on_period_end(period, result.period_cost, &stage);
            }
        }

        self.observer.on_stage_finished(number, &stage);
        Ok(stage)
    }
}
