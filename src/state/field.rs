use crate::infra::Position;

/// Walled grid the truck drives on. Read-only once a stage starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub width: i32,
    pub height: i32,
    walls: Vec<bool>,
}

impl Field {
    /// A field with every cell walled. Non-positive sizes give a field
    /// without cells, where every position is a wall.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = if width > 0 && height > 0 {
            (width, height)
        } else {
            (0, 0)
        };
        Self {
            width,
            height,
            walls: vec![true; (width * height) as usize],
        }
    }

    /// Build a field from text rows. Row `i` holds the cells with `y == i`,
    /// `#` is a wall and anything else is open. The first row sets the
    /// width: cells missing from shorter rows stay walls, extra ones are dropped.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.chars().count()) as i32;
        let mut field = Field::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, tile) in row.chars().enumerate() {
                field.set_wall(Position::new(x as i32, y as i32), tile == '#');
            }
        }
        field
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn index_of(&self, pos: &Position) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn position_of(&self, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }

    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    /// Cells outside the field count as walls.
    pub fn is_wall(&self, pos: &Position) -> bool {
        self.index_of(pos).is_none_or(|index| self.walls[index])
    }

    pub fn set_wall(&mut self, pos: Position, wall: bool) {
        if let Some(index) = self.index_of(&pos) {
            self.walls[index] = wall;
        }
    }

    /// The depot every period starts from and returns to.
    pub fn office_pos(&self) -> Position {
        Position::new((self.width - 1) / 2, (self.height - 1) / 2)
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.walls.len())
            .filter(|&index| !self.walls[index])
            .map(|index| self.position_of(index))
    }
}
