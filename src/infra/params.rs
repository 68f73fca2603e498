//! Fixed rules of the delivery game.

/// Turns available to complete every period of one stage.
pub const GAME_TURN_PER_STAGE: u32 = 1000;
/// Number of wall density steps used by the level designer.
pub const WALL_DENSITY_MAX: u32 = 5;
/// Number of steps for the share of period-specified items.
pub const PERIOD_SPECIFIED_MAX: u32 = 6;
/// Upper bound on items in a stage. Cargo sets are sized by this.
pub const ITEM_COUNT_MAX: usize = 16;
pub const GAME_STAGE_COUNT: u32 = WALL_DENSITY_MAX * PERIOD_SPECIFIED_MAX * ITEM_COUNT_MAX as u32;

pub const PERIOD_COUNT: usize = 4;

pub const FIELD_WIDTH_MIN: i32 = 19;
pub const FIELD_HEIGHT_MIN: i32 = 19;
pub const FIELD_WIDTH_MAX: i32 = 31;
pub const FIELD_HEIGHT_MAX: i32 = 31;

/// Maximum weight of the cargo alone.
pub const TRUCK_WEIGHT_CAPACITY: u32 = 15;
/// Weight of the empty truck, charged on every move.
pub const TRUCK_WEIGHT: u32 = 3;
/// Truck plus a full load. The planner compares committed weights against this.
pub const PLANNER_CAPACITY: u32 = TRUCK_WEIGHT + TRUCK_WEIGHT_CAPACITY;

pub const ITEM_WEIGHT_MIN: u32 = 1;
pub const ITEM_WEIGHT_MAX: u32 = 3;
/// Maximum number of items sharing the same weight.
pub const WEIGHT_HISTOGRAM_MAX: usize = ITEM_COUNT_MAX.div_ceil((ITEM_WEIGHT_MAX - ITEM_WEIGHT_MIN + 1) as usize);

pub const SCORE_FACTOR: u64 = 10_000;
