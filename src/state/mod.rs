mod field;
mod item;
mod level_designer;
mod stage;
mod truck;

pub use field::Field;
pub use item::{Item, ItemCollection, ItemError};
pub use level_designer::{LevelDesigner, StageProfile};
pub use stage::{
    CargoViolation, Stage, StageError, StageState, TransportState, TurnDriver, TurnResult,
};
pub use truck::Truck;
