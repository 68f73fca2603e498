use std::fmt;

/// One step of the truck. Coordinates grow to the right and upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    MoveUp,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveDown,
        Action::MoveUp,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::MoveLeft => (-1, 0),
            Action::MoveRight => (1, 0),
            Action::MoveDown => (0, -1),
            Action::MoveUp => (0, 1),
        }
    }

    pub fn as_str_name(&self) -> &'static str {
        match self {
            Action::MoveLeft => "MOVE_LEFT",
            Action::MoveRight => "MOVE_RIGHT",
            Action::MoveDown => "MOVE_DOWN",
            Action::MoveUp => "MOVE_UP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn step(&self, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Neighbours in `Action::ALL` order.
    pub fn neighbors(&self) -> [Position; 4] {
        [
            Position::new(self.x - 1, self.y), // Left
            Position::new(self.x + 1, self.y), // Right
            Position::new(self.x, self.y - 1), // Down
            Position::new(self.x, self.y + 1), // Up
        ]
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
