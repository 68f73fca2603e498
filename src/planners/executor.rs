use crate::infra::{Action, CargoSet};
use crate::planners::compiler::CompiledPlan;
use crate::state::{Stage, TurnDriver};

/// Replays a compiled plan: one cargo declaration per period, then its moves in order.
#[derive(Debug, Clone)]
pub struct PlanExecutor {
    plan: CompiledPlan,
    period: usize,
    cursor: usize,
}

impl PlanExecutor {
    pub fn new(plan: CompiledPlan) -> Self {
        Self {
            plan,
            period: 0,
            cursor: 0,
        }
    }

    pub fn plan(&self) -> &CompiledPlan {
        &self.plan
    }

    /// Moves left in the current period.
    pub fn remaining(&self) -> usize {
        self.plan
            .period(self.period)
            .map_or(0, |period| period.actions.len().saturating_sub(self.cursor))
    }
}

impl TurnDriver for PlanExecutor {
    fn load_period(&mut self, _stage: &Stage, period: usize) -> CargoSet {
        self.period = period;
        self.cursor = 0;
        self.plan
            .period(period)
            .map_or_else(CargoSet::new, |compiled| compiled.cargo)
    }

    fn next_action(&mut self, _stage: &Stage) -> Option<Action> {
        let action = self
            .plan
            .period(self.period)?
            .actions
            .get(self.cursor)
            .copied()?;
        self.cursor += 1;
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;
    use crate::planners::PeriodPlanner;
    use crate::state::{Field, Item, ItemCollection, StageState};

    #[test]
    fn test_executor_drives_stage_to_completion() {
        let field = Field::from_rows(&[
            "#######", //
            "#.....#", //
            "#######",
        ]);
        let items = ItemCollection::try_from(vec![
            Item::new(Position::new(5, 1), None, 1),
            Item::new(Position::new(1, 1), Some(2), 2),
        ])
        .unwrap();
        let plan = PeriodPlanner::new(&field, &items).plan().unwrap();
        let mut executor = PlanExecutor::new(CompiledPlan::compile(&plan));
        let mut stage = Stage::new(field, items);

        while !stage.state().is_terminal() {
            stage.run_turn(&mut executor).unwrap();
        }
        assert_eq!(stage.state(), StageState::Complete);
        assert_eq!(executor.remaining(), 0);
        assert!(stage.score() > 0);
    }
}
