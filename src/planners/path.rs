use std::collections::HashMap;
use std::fmt;

use crate::infra::{AStar, Action, CargoError, PathError, Position};
use crate::state::{Field, ItemCollection};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("item {index} does not exist")]
    UnknownItem { index: usize },
    #[error("no path from {start} to {goal}")]
    NoPath {
        start: NodeRef,
        goal: NodeRef,
        #[source]
        source: PathError,
    },
    #[error("no period has room for item {index} of weight {weight}")]
    NoFeasiblePeriod { index: usize, weight: u32 },
    #[error(transparent)]
    Cargo(#[from] CargoError),
}

/// A stop on a tour: the office or the destination of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    Depot,
    Item(usize),
}

impl NodeRef {
    pub fn position(self, field: &Field, items: &ItemCollection) -> Result<Position, PlanError> {
        match self {
            NodeRef::Depot => Ok(field.office_pos()),
            NodeRef::Item(index) => items
                .get(index)
                .map(|item| item.destination)
                .ok_or(PlanError::UnknownItem { index }),
        }
    }

    /// Weight dropped when the truck reaches this stop.
    pub fn load_weight(self, items: &ItemCollection) -> u32 {
        match self {
            NodeRef::Depot => 0,
            NodeRef::Item(index) => items.get(index).map_or(0, |item| item.weight),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Depot => write!(f, "depot"),
            NodeRef::Item(index) => write!(f, "item {}", index),
        }
    }
}

/// Shortest route between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub start: NodeRef,
    pub goal: NodeRef,
    /// Weight of the item delivered at `goal`, 0 for the depot.
    pub load_weight: u32,
    pub route: Vec<Action>,
}

impl Path {
    /// Turns needed to drive the route.
    pub fn cost(&self) -> u32 {
        self.route.len() as u32
    }
}

/// Memoizes A* routes per (start, goal) pair for one stage.
#[derive(Debug, Default)]
pub struct PathCache {
    paths: HashMap<(NodeRef, NodeRef), Path>,
    hits: usize,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(
        &mut self,
        field: &Field,
        items: &ItemCollection,
        start: NodeRef,
        goal: NodeRef,
    ) -> Result<Path, PlanError> {
        if let Some(path) = self.paths.get(&(start, goal)) {
            self.hits += 1;
            return Ok(path.clone());
        }

        let from = start.position(field, items)?;
        let to = goal.position(field, items)?;
        let route = AStar::find_path(field, from, to).map_err(|source| PlanError::NoPath {
            start,
            goal,
            source,
        })?;
        let path = Path {
            start,
            goal,
            load_weight: goal.load_weight(items),
            route,
        };
        self.paths.insert((start, goal), path.clone());
        Ok(path)
    }

    /// Number of distinct routes computed so far.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Item;

    fn setup() -> (Field, ItemCollection) {
        let field = Field::from_rows(&[
            "#######", //
            "#.....#", //
            "#.#.#.#", //
            "#.....#", //
            "#######",
        ]);
        let items = ItemCollection::try_from(vec![
            Item::new(Position::new(1, 1), None, 2),
            Item::new(Position::new(5, 3), Some(1), 3),
        ])
        .unwrap();
        (field, items)
    }

    #[test]
    fn test_node_positions_and_weights() {
        let (field, items) = setup();
        assert_eq!(NodeRef::Depot.position(&field, &items), Ok(Position::new(3, 2)));
        assert_eq!(NodeRef::Item(1).position(&field, &items), Ok(Position::new(5, 3)));
        assert_eq!(
            NodeRef::Item(2).position(&field, &items),
            Err(PlanError::UnknownItem { index: 2 })
        );
        assert_eq!(NodeRef::Depot.load_weight(&items), 0);
        assert_eq!(NodeRef::Item(0).load_weight(&items), 2);
    }

    #[test]
    fn test_cache_memoizes_routes() {
        let (field, items) = setup();
        let mut cache = PathCache::new();

        let first = cache
            .path(&field, &items, NodeRef::Item(0), NodeRef::Item(1))
            .unwrap();
        assert_eq!(first.cost(), 6);
        assert_eq!(first.load_weight, 3);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 0);

        let second = cache
            .path(&field, &items, NodeRef::Item(0), NodeRef::Item(1))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);

        // Reverse direction is its own entry
        cache
            .path(&field, &items, NodeRef::Item(1), NodeRef::Item(0))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }
}
