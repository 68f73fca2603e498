use crate::infra::{CargoError, CargoSet};
use crate::infra::params::{PERIOD_COUNT, TRUCK_WEIGHT};
use crate::planners::path::{NodeRef, Path};

/// Where a new stop goes in a period tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// The tour is empty: open the depot -> item -> depot cycle.
    NewCycle,
    /// Replace the edge at this index with two edges through the item.
    Edge(usize),
}

/// Closed tour of one period, starting and ending at the depot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodPlan {
    paths: Vec<Path>,
    items: Vec<usize>,
    cargo: CargoSet,
    /// Truck weight plus every item committed so far.
    weight: u32,
}

impl Default for PeriodPlan {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            items: Vec::new(),
            cargo: CargoSet::new(),
            weight: TRUCK_WEIGHT,
        }
    }
}

impl PeriodPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Items in the order they were committed to this period.
    pub fn items(&self) -> &[usize] {
        &self.items
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn cargo_weight(&self) -> u32 {
        self.weight - TRUCK_WEIGHT
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cargo(&self) -> CargoSet {
        self.cargo
    }

    /// Turns needed to drive the whole tour.
    pub fn route_length(&self) -> u32 {
        self.paths.iter().map(Path::cost).sum()
    }

    /// Tour cost with every edge weighted by the committed period weight.
    pub fn delivery_cost(&self) -> i64 {
        self.route_length() as i64 * self.weight as i64
    }

    /// Tour cost if `to_item` and `from_item` were spliced in at `point`, with
    /// every edge weighted by `weight`.
    pub fn delivery_cost_with(
        &self,
        weight: u32,
        point: InsertionPoint,
        to_item: &Path,
        from_item: &Path,
    ) -> i64 {
        let replaced = match point {
            InsertionPoint::NewCycle => 0,
            InsertionPoint::Edge(edge) => self.paths.get(edge).map_or(0, Path::cost),
        };
        let length = self.route_length() - replaced + to_item.cost() + from_item.cost();
        length as i64 * weight as i64
    }

    pub fn insert(
        &mut self,
        item: usize,
        item_weight: u32,
        point: InsertionPoint,
        to_item: Path,
        from_item: Path,
    ) -> Result<(), CargoError> {
        self.cargo.insert(item)?;
        match point {
            InsertionPoint::NewCycle => {
                debug_assert!(self.paths.is_empty());
                self.paths.push(to_item);
                self.paths.push(from_item);
            }
            InsertionPoint::Edge(edge) => {
                self.paths[edge] = to_item;
                self.paths.insert(edge + 1, from_item);
            }
        }
        self.items.push(item);
        self.weight += item_weight;
        Ok(())
    }

    /// True when the paths chain into a single depot-closed cycle.
    pub fn is_closed_tour(&self) -> bool {
        if self.paths.is_empty() {
            return true;
        }
        let first = &self.paths[0];
        let last = &self.paths[self.paths.len() - 1];
        first.start == NodeRef::Depot
            && last.goal == NodeRef::Depot
            && self.paths.windows(2).all(|pair| pair[0].goal == pair[1].start)
    }
}

/// Period assignment and tours for a whole stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagePlan {
    periods: [PeriodPlan; PERIOD_COUNT],
}

impl StagePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn periods(&self) -> &[PeriodPlan] {
        &self.periods
    }

    pub fn period(&self, period: usize) -> Option<&PeriodPlan> {
        self.periods.get(period)
    }

    pub(crate) fn period_mut(&mut self, period: usize) -> &mut PeriodPlan {
        &mut self.periods[period]
    }

    /// Period the item was assigned to.
    pub fn assigned_period(&self, item: usize) -> Option<usize> {
        self.periods
            .iter()
            .position(|plan| plan.items.contains(&item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Action;

    fn path(start: NodeRef, goal: NodeRef, load_weight: u32, len: usize) -> Path {
        Path {
            start,
            goal,
            load_weight,
            route: vec![Action::MoveRight; len],
        }
    }

    #[test]
    fn test_new_cycle() {
        let mut plan = PeriodPlan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.weight(), TRUCK_WEIGHT);

        let out = path(NodeRef::Depot, NodeRef::Item(2), 3, 4);
        let back = path(NodeRef::Item(2), NodeRef::Depot, 0, 4);
        assert_eq!(
            plan.delivery_cost_with(TRUCK_WEIGHT + 3, InsertionPoint::NewCycle, &out, &back),
            48
        );

        plan.insert(2, 3, InsertionPoint::NewCycle, out, back).unwrap();
        assert_eq!(plan.items(), &[2]);
        assert_eq!(plan.cargo_weight(), 3);
        assert_eq!(plan.route_length(), 8);
        assert_eq!(plan.delivery_cost(), 48);
        assert!(plan.is_closed_tour());
    }

    #[test]
    fn test_insert_splits_edge() {
        let mut plan = PeriodPlan::new();
        plan.insert(
            0,
            1,
            InsertionPoint::NewCycle,
            path(NodeRef::Depot, NodeRef::Item(0), 1, 3),
            path(NodeRef::Item(0), NodeRef::Depot, 0, 3),
        )
        .unwrap();

        let to_item = path(NodeRef::Item(0), NodeRef::Item(1), 2, 2);
        let from_item = path(NodeRef::Item(1), NodeRef::Depot, 0, 4);
        // (6 - 3 + 2 + 4) * (4 + 2)
        assert_eq!(
            plan.delivery_cost_with(6, InsertionPoint::Edge(1), &to_item, &from_item),
            54
        );

        plan.insert(1, 2, InsertionPoint::Edge(1), to_item, from_item).unwrap();
        let stops: Vec<NodeRef> = plan.paths().iter().map(|p| p.goal).collect();
        assert_eq!(stops, vec![NodeRef::Item(0), NodeRef::Item(1), NodeRef::Depot]);
        assert!(plan.is_closed_tour());
        assert_eq!(plan.weight(), 6);
        assert_eq!(plan.cargo().iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_assigned_period() {
        let mut stage_plan = StagePlan::new();
        stage_plan.period_mut(2).insert(
            5,
            1,
            InsertionPoint::NewCycle,
            path(NodeRef::Depot, NodeRef::Item(5), 1, 1),
            path(NodeRef::Item(5), NodeRef::Depot, 0, 1),
        )
        .unwrap();
        assert_eq!(stage_plan.assigned_period(5), Some(2));
        assert_eq!(stage_plan.assigned_period(0), None);
        assert!(stage_plan.period(PERIOD_COUNT).is_none());
    }

    #[test]
    fn test_item_outside_cargo_slots_is_refused() {
        let mut plan = PeriodPlan::new();
        let result = plan.insert(
            16,
            1,
            InsertionPoint::NewCycle,
            path(NodeRef::Depot, NodeRef::Item(16), 1, 2),
            path(NodeRef::Item(16), NodeRef::Depot, 0, 2),
        );
        assert_eq!(result, Err(CargoError { index: 16 }));
        assert!(plan.is_empty());
        assert!(plan.paths().is_empty());
        assert_eq!(plan.weight(), TRUCK_WEIGHT);
    }
}
