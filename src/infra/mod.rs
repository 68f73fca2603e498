mod cargo;
mod composite_observer;
mod default_observer;
mod game_observer;
pub mod params;
mod pathfinding;
mod record_file;
mod stage_recorder;
mod types;

pub use cargo::{CargoError, CargoSet};
pub use composite_observer::CompositeObserver;
pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use pathfinding::{AStar, PathError};
pub use record_file::RecordFile;
pub use stage_recorder::StageRecorder;
pub use types::{Action, Position};

// ============================================================================
// Helper functions
// ============================================================================

/// The move that takes the truck from `from` to the adjacent cell `to`.
pub fn action_between(from: Position, to: Position) -> Option<Action> {
    if !from.is_adjacent(&to) {
        return None;
    }

    if to.x < from.x {
        Some(Action::MoveLeft)
    } else if to.x > from.x {
        Some(Action::MoveRight)
    } else if to.y < from.y {
        Some(Action::MoveDown)
    } else {
        Some(Action::MoveUp)
    }
}

/// Cell reached after applying every action in order, ignoring walls.
pub fn walk(start: Position, actions: &[Action]) -> Position {
    actions.iter().fold(start, |pos, action| pos.step(*action))
}
