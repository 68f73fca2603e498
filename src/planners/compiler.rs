use crate::infra::params::PERIOD_COUNT;
use crate::infra::{Action, CargoSet};
use crate::planners::path::NodeRef;
use crate::planners::period_plan::{PeriodPlan, StagePlan};

/// Cargo declaration and move list of one period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledPeriod {
    pub cargo: CargoSet,
    pub actions: Vec<Action>,
}

impl CompiledPeriod {
    /// Flatten a period tour into moves, starting from its first depot edge.
    pub fn compile(plan: &PeriodPlan) -> Self {
        let paths = plan.paths();
        let first = paths
            .iter()
            .position(|path| path.start == NodeRef::Depot)
            .unwrap_or(0);

        let actions = paths[first..]
            .iter()
            .chain(&paths[..first])
            .flat_map(|path| path.route.iter().copied())
            .collect();

        Self {
            cargo: plan.cargo(),
            actions,
        }
    }
}

/// Per-period move lists of a stage, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPlan {
    periods: Vec<CompiledPeriod>,
}

impl CompiledPlan {
    pub fn compile(plan: &StagePlan) -> Self {
        let periods = plan.periods().iter().map(CompiledPeriod::compile).collect();
        Self { periods }
    }

    pub fn period(&self, period: usize) -> Option<&CompiledPeriod> {
        self.periods.get(period)
    }

    pub fn periods(&self) -> &[CompiledPeriod] {
        &self.periods
    }

    pub fn total_actions(&self) -> usize {
        self.periods.iter().map(|period| period.actions.len()).sum()
    }
}

impl Default for CompiledPlan {
    fn default() -> Self {
        Self {
            periods: vec![CompiledPeriod::default(); PERIOD_COUNT],
        }
    }
}
