use rand::Rng;

use crate::infra::params::{
    FIELD_HEIGHT_MAX, FIELD_HEIGHT_MIN, FIELD_WIDTH_MAX, FIELD_WIDTH_MIN, ITEM_COUNT_MAX,
    ITEM_WEIGHT_MAX, ITEM_WEIGHT_MIN, PERIOD_COUNT, PERIOD_SPECIFIED_MAX, TRUCK_WEIGHT_CAPACITY,
    WALL_DENSITY_MAX, WEIGHT_HISTOGRAM_MAX,
};
use crate::infra::{Action, Position};
use crate::state::{Field, Item, ItemCollection, ItemError};

/// Difficulty knobs derived from a stage number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProfile {
    /// Percentage of checkerboard cells that stay walled after the maze is dug.
    pub wall_density: u32,
    pub item_count: usize,
    pub period_specified_count: usize,
}

impl StageProfile {
    pub fn for_stage(number: u32) -> Self {
        let wall_density_index = number % WALL_DENSITY_MAX;
        let period_specified_index = (number / WALL_DENSITY_MAX) % PERIOD_SPECIFIED_MAX;
        let item_count_index =
            (number / (WALL_DENSITY_MAX * PERIOD_SPECIFIED_MAX)) % ITEM_COUNT_MAX as u32;

        // Never zero, a field without walls makes a dull maze
        let wall_density = (wall_density_index + 1) * (100 / WALL_DENSITY_MAX);
        let item_count = item_count_index as usize + 1;
        let period_specified_count =
            item_count * period_specified_index as usize / (PERIOD_SPECIFIED_MAX as usize - 1);

        Self {
            wall_density,
            item_count,
            period_specified_count,
        }
    }
}

/// Generates the field and items of a stage.
pub struct LevelDesigner;

impl LevelDesigner {
    pub fn setup<R: Rng + ?Sized>(
        number: u32,
        rng: &mut R,
    ) -> Result<(Field, ItemCollection), ItemError> {
        let profile = StageProfile::for_stage(number);
        let width = FIELD_WIDTH_MIN + rng.random_range(0..=(FIELD_WIDTH_MAX - FIELD_WIDTH_MIN) / 4) * 4;
        let height =
            FIELD_HEIGHT_MIN + rng.random_range(0..=(FIELD_HEIGHT_MAX - FIELD_HEIGHT_MIN) / 4) * 4;

        tracing::debug!(
            "Stage {}: {}x{} field, density {}, {} items ({} with a period)",
            number,
            width,
            height,
            profile.wall_density,
            profile.item_count,
            profile.period_specified_count
        );

        let field = Self::dig_field(width, height, profile.wall_density, rng);
        let items = Self::place_items(&field, &profile, rng)?;
        Ok((field, items))
    }

    /// Dig a maze that links every odd cell to the office, then knock out
    /// extra walls so that roughly `wall_density` percent of them remain.
    pub fn dig_field<R: Rng + ?Sized>(width: i32, height: i32, wall_density: u32, rng: &mut R) -> Field {
        debug_assert!(width % 4 == 3 && height % 4 == 3);
        let mut field = Field::new(width, height);
        field.set_wall(field.office_pos(), false);

        let gx = (width - 1) / 2;
        let gy = (height - 1) / 2;
        let mut remaining = gx * gy - 1;
        while remaining > 0 {
            let from = Position::new(rng.random_range(0..gx) * 2 + 1, rng.random_range(0..gy) * 2 + 1);
            if field.is_wall(&from) {
                continue;
            }
            let action = Action::ALL[rng.random_range(0..Action::ALL.len())];
            let center = from.step(action);
            let next = center.step(action);
            if field.contains(&next) && field.is_wall(&next) {
                field.set_wall(next, false);
                field.set_wall(center, false);
                remaining -= 1;
            }
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                if (x + y) % 2 == 1 && rng.random_range(0..100) >= wall_density {
                    field.set_wall(Position::new(x, y), false);
                }
            }
        }
        field
    }

    fn place_items<R: Rng + ?Sized>(
        field: &Field,
        profile: &StageProfile,
        rng: &mut R,
    ) -> Result<ItemCollection, ItemError> {
        let count = profile.item_count;

        let mut histogram = [0usize; ITEM_WEIGHT_MAX as usize + 1];
        let mut weights = Vec::with_capacity(count);
        for _ in 0..count {
            let weight = loop {
                let weight = rng.random_range(ITEM_WEIGHT_MIN..=ITEM_WEIGHT_MAX);
                if histogram[weight as usize] < WEIGHT_HISTOGRAM_MAX {
                    break weight;
                }
            };
            histogram[weight as usize] += 1;
            weights.push(weight);
        }

        let mut periods: Vec<Option<usize>> = vec![None; count];
        let mut period_weights = [0u32; PERIOD_COUNT];
        for _ in 0..profile.period_specified_count {
            loop {
                let index = rng.random_range(0..count);
                if periods[index].is_some() {
                    continue;
                }
                let period = rng.random_range(0..PERIOD_COUNT);
                if period_weights[period] + weights[index] <= TRUCK_WEIGHT_CAPACITY {
                    periods[index] = Some(period);
                    period_weights[period] += weights[index];
                    break;
                }
            }
        }

        let office = field.office_pos();
        let mut items = ItemCollection::new();
        let mut taken: Vec<Position> = Vec::with_capacity(count);
        for index in 0..count {
            let destination = loop {
                let pos = Position::new(
                    rng.random_range(0..field.width),
                    rng.random_range(0..field.height),
                );
                if !field.is_wall(&pos) && pos != office && !taken.contains(&pos) {
                    break pos;
                }
            };
            taken.push(destination);
            items.add_item(Item::new(destination, periods[index], weights[index]))?;
        }
        Ok(items)
    }
}
