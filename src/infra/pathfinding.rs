use crate::infra::{Action, Position, action_between};
use crate::state::Field;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("cell {pos} lies outside the field")]
    OutOfBounds { pos: Position },
    #[error("no route from {start} to {goal}")]
    Unreachable { start: Position, goal: Position },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Open,
    Close,
}

/// Search bookkeeping for one cell. Parents are cell indices into the same grid.
#[derive(Debug, Clone, Copy)]
struct VisitRecord {
    state: VisitState,
    parent: Option<usize>,
    cost: u32,
    heuristic: u32,
}

impl VisitRecord {
    const UNVISITED: VisitRecord = VisitRecord {
        state: VisitState::None,
        parent: None,
        cost: 0,
        heuristic: 0,
    };

    fn score(&self) -> u32 {
        self.cost + self.heuristic
    }
}

pub struct AStar;

impl AStar {
    /// Shortest sequence of moves leading from `start` to `goal`.
    ///
    /// The open list is scanned linearly and the first node with the lowest
    /// `cost + heuristic` wins, so ties resolve in discovery order. The search
    /// stops as soon as the goal is discovered.
    #[tracing::instrument(level = "trace", skip(field), fields(start_x = start.x, start_y = start.y, goal_x = goal.x, goal_y = goal.y))]
    pub fn find_path(field: &Field, start: Position, goal: Position) -> Result<Vec<Action>, PathError> {
        let start_index = field
            .index_of(&start)
            .ok_or(PathError::OutOfBounds { pos: start })?;
        if field.index_of(&goal).is_none() {
            return Err(PathError::OutOfBounds { pos: goal });
        }

        if start == goal {
            return Ok(Vec::new());
        }

        let mut records = vec![VisitRecord::UNVISITED; field.cell_count()];
        records[start_index] = VisitRecord {
            state: VisitState::Open,
            parent: None,
            cost: 0,
            heuristic: heuristic(start, goal),
        };
        let mut open_list = vec![start_index];
        let mut expansions = 0;

        while !open_list.is_empty() {
            let mut best = 0;
            for (slot, &index) in open_list.iter().enumerate().skip(1) {
                if records[index].score() < records[open_list[best]].score() {
                    best = slot;
                }
            }
            let current_index = open_list[best];
            let current = field.position_of(current_index);
            let current_cost = records[current_index].cost;
            expansions += 1;

            for neighbor in current.neighbors() {
                let Some(neighbor_index) = field.index_of(&neighbor) else {
                    continue;
                };

                let record = &mut records[neighbor_index];
                match record.state {
                    VisitState::None => {
                        if field.is_wall(&neighbor) {
                            record.state = VisitState::Close;
                            continue;
                        }
                        *record = VisitRecord {
                            state: VisitState::Open,
                            parent: Some(current_index),
                            cost: current_cost + 1,
                            heuristic: heuristic(neighbor, goal),
                        };
                        open_list.push(neighbor_index);

                        if neighbor == goal {
                            tracing::trace!("A*: reached goal after {} expansions", expansions);
                            return Ok(reconstruct_path(field, &records, neighbor_index));
                        }
                    }
                    VisitState::Open if current_cost + 1 < record.cost => {
                        record.parent = Some(current_index);
                        record.cost = current_cost + 1;
                    }
                    _ => {}
                }
            }

            records[current_index].state = VisitState::Close;
            open_list.remove(best);
        }

        tracing::warn!("A*: open list exhausted after {} expansions", expansions);
        Err(PathError::Unreachable { start, goal })
    }
}

fn heuristic(a: Position, b: Position) -> u32 {
    a.distance(&b) as u32
}

fn reconstruct_path(field: &Field, records: &[VisitRecord], goal_index: usize) -> Vec<Action> {
    let mut actions = Vec::new();
    let mut current = goal_index;
    while let Some(parent) = records[current].parent {
        let from = field.position_of(parent);
        let to = field.position_of(current);
        if let Some(action) = action_between(from, to) {
            actions.push(action);
        }
        current = parent;
    }
    actions.reverse();
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::walk;

    #[test]
    fn test_open_field_path_is_manhattan() {
        let field = Field::from_rows(&[".....", ".....", ".....", ".....", "....."]);
        let start = Position::new(0, 0);
        let goal = Position::new(4, 3);

        let path = AStar::find_path(&field, start, goal).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(walk(start, &path), goal);
    }

    #[test]
    fn test_ties_follow_discovery_order() {
        // Every cell on a monotone route scores 4. Right is discovered before
        // Up, so the route runs along the bottom row first.
        let field = Field::from_rows(&[".....", ".....", ".....", ".....", "....."]);
        let path = AStar::find_path(&field, Position::new(0, 0), Position::new(2, 2)).unwrap();
        assert_eq!(
            path,
            vec![
                Action::MoveRight,
                Action::MoveRight,
                Action::MoveUp,
                Action::MoveUp
            ]
        );
    }

    #[test]
    fn test_path_detours_around_wall() {
        // The wall in column 2 only has a gap at the top row
        let field = Field::from_rows(&[
            "..#..", //
            "..#..", //
            "..#..", //
            "..#..", //
            ".....",
        ]);
        let start = Position::new(0, 0);
        let goal = Position::new(4, 0);

        let path = AStar::find_path(&field, start, goal).unwrap();
        assert_eq!(path.len(), 12);
        assert_eq!(walk(start, &path), goal);

        let mut pos = start;
        for action in &path {
            pos = pos.step(*action);
            assert!(!field.is_wall(&pos), "path crosses wall at {}", pos);
        }
    }

    #[test]
    fn test_same_cell_is_empty_path() {
        let field = Field::from_rows(&["...", "...", "..."]);
        let pos = Position::new(1, 1);
        assert_eq!(AStar::find_path(&field, pos, pos).unwrap(), Vec::new());
    }

    #[test]
    fn test_unreachable_goal_is_an_error() {
        let field = Field::from_rows(&[
            "..#..", //
            "..#..", //
            "..#..",
        ]);
        let start = Position::new(0, 0);
        let goal = Position::new(4, 2);
        assert_eq!(
            AStar::find_path(&field, start, goal),
            Err(PathError::Unreachable { start, goal })
        );
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let field = Field::from_rows(&["...", "...", "..."]);
        let start = Position::new(0, 0);
        let goal = Position::new(3, 0);
        assert_eq!(
            AStar::find_path(&field, start, goal),
            Err(PathError::OutOfBounds { pos: goal })
        );
    }
}
