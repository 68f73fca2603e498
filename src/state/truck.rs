use crate::infra::{CargoSet, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truck {
    pub pos: Position,
    pub cargo: CargoSet,
}

impl Truck {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            cargo: CargoSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cargo.is_empty()
    }
}
