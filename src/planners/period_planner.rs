use std::cmp::Reverse;

use tracing::debug;

use crate::infra::params::{PERIOD_COUNT, PLANNER_CAPACITY};
use crate::planners::path::{NodeRef, Path, PathCache, PlanError};
use crate::planners::period_plan::{InsertionPoint, PeriodPlan, StagePlan};
use crate::state::{Field, ItemCollection};

/// Candidate placement of one item.
#[derive(Debug, Clone)]
struct Insertion {
    period: usize,
    point: InsertionPoint,
    /// Weighted cost increase of the period tour.
    diff: i64,
    to_item: Path,
    from_item: Path,
}

/// Assigns every item to a period and grows each period tour by cheapest insertion.
///
/// Items with a required period go first, in index order. The rest follow
/// heaviest first and land wherever the weighted tour cost grows least,
/// provided the period stays within `PLANNER_CAPACITY`.
pub struct PeriodPlanner<'a> {
    field: &'a Field,
    items: &'a ItemCollection,
    cache: PathCache,
}

impl<'a> PeriodPlanner<'a> {
    pub fn new(field: &'a Field, items: &'a ItemCollection) -> Self {
        Self {
            field,
            items,
            cache: PathCache::new(),
        }
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn plan(&mut self) -> Result<StagePlan, PlanError> {
        let mut stage_plan = StagePlan::new();

        let items = self.items;
        let mut free = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let Some(period) = item.period else {
                free.push(index);
                continue;
            };
            // Required items skip the capacity check
            let plan = &stage_plan.periods()[period];
            let weight = plan.weight() + item.weight;
            let best = if plan.is_empty() {
                Some(self.new_cycle(period, index, weight)?)
            } else {
                self.cheapest_edge(plan, period, index, weight, None)?
            };
            let insertion = best.ok_or(PlanError::NoFeasiblePeriod {
                index,
                weight: item.weight,
            })?;
            debug!(
                "Required item {} goes to period {} at {:?}",
                index, period, insertion.point
            );
            Self::commit(&mut stage_plan, index, item.weight, insertion)?;
        }

        // Stable sort keeps index order among equal weights
        free.sort_by_key(|&index| Reverse(items.get(index).map_or(0, |item| item.weight)));

        for index in free {
            let item_weight = items
                .get(index)
                .map(|item| item.weight)
                .ok_or(PlanError::UnknownItem { index })?;

            let mut best: Option<Insertion> = None;
            let mut empty_searched = false;
            for period in 0..PERIOD_COUNT {
                let plan = &stage_plan.periods()[period];
                let weight = plan.weight() + item_weight;
                if weight > PLANNER_CAPACITY {
                    continue;
                }

                if plan.is_empty() {
                    // Empty periods are interchangeable, the first one stands for all
                    if !empty_searched {
                        let candidate = self.new_cycle(period, index, weight)?;
                        best = Self::better(best, candidate);
                        empty_searched = true;
                    }
                } else {
                    best = self.cheapest_edge(plan, period, index, weight, best)?;
                }
            }

            let insertion = best.ok_or(PlanError::NoFeasiblePeriod {
                index,
                weight: item_weight,
            })?;
            debug!(
                "Free item {} (weight {}) goes to period {} at {:?}, cost +{}",
                index, item_weight, insertion.period, insertion.point, insertion.diff
            );
            Self::commit(&mut stage_plan, index, item_weight, insertion)?;
        }

        for (period, plan) in stage_plan.periods().iter().enumerate() {
            debug!(
                "Period {}: items {:?}, weight {}, route {} turns",
                period,
                plan.items(),
                plan.weight(),
                plan.route_length()
            );
        }
        Ok(stage_plan)
    }

    fn new_cycle(&mut self, period: usize, index: usize, weight: u32) -> Result<Insertion, PlanError> {
        let item = NodeRef::Item(index);
        let to_item = self.path(NodeRef::Depot, item)?;
        let from_item = self.path(item, NodeRef::Depot)?;
        let diff = PeriodPlan::new().delivery_cost_with(
            weight,
            InsertionPoint::NewCycle,
            &to_item,
            &from_item,
        );
        Ok(Insertion {
            period,
            point: InsertionPoint::NewCycle,
            diff,
            to_item,
            from_item,
        })
    }

    /// Scan every edge of `plan` and keep the cheapest split, starting from `best`.
    fn cheapest_edge(
        &mut self,
        plan: &PeriodPlan,
        period: usize,
        index: usize,
        weight: u32,
        mut best: Option<Insertion>,
    ) -> Result<Option<Insertion>, PlanError> {
        let item = NodeRef::Item(index);
        let before = plan.delivery_cost();
        for (edge, path) in plan.paths().iter().enumerate() {
            let to_item = self.path(path.start, item)?;
            let from_item = self.path(item, path.goal)?;
            let point = InsertionPoint::Edge(edge);
            let diff = plan.delivery_cost_with(weight, point, &to_item, &from_item) - before;
            best = Self::better(
                best,
                Insertion {
                    period,
                    point,
                    diff,
                    to_item,
                    from_item,
                },
            );
        }
        Ok(best)
    }

    /// Ties keep the earlier candidate.
    fn better(best: Option<Insertion>, candidate: Insertion) -> Option<Insertion> {
        match best {
            Some(best) if best.diff <= candidate.diff => Some(best),
            _ => Some(candidate),
        }
    }

    fn commit(
        stage_plan: &mut StagePlan,
        index: usize,
        item_weight: u32,
        insertion: Insertion,
    ) -> Result<(), PlanError> {
        stage_plan.period_mut(insertion.period).insert(
            index,
            item_weight,
            insertion.point,
            insertion.to_item,
            insertion.from_item,
        )?;
        Ok(())
    }

    fn path(&mut self, start: NodeRef, goal: NodeRef) -> Result<Path, PlanError> {
        self.cache.path(self.field, self.items, start, goal)
    }
}
