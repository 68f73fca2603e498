use tracing::{debug, warn};

use crate::infra::params::{
    GAME_TURN_PER_STAGE, ITEM_COUNT_MAX, PERIOD_COUNT, SCORE_FACTOR, TRUCK_WEIGHT,
    TRUCK_WEIGHT_CAPACITY,
};
use crate::infra::{Action, CargoSet, Position};
use crate::state::{Field, ItemCollection, Truck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageState {
    Playing,
    Failed,
    TurnLimit,
    Complete,
}

impl StageState {
    pub fn is_terminal(self) -> bool {
        self != StageState::Playing
    }
}

/// Delivery lifecycle of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    NotTransported,
    /// Loaded for the current period.
    Transporting,
    /// Delivered in an earlier period.
    Transported,
}

/// Reasons a cargo declaration is refused at a period start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CargoViolation {
    #[error("item {index} was already delivered")]
    AlreadyTransported { index: usize },
    #[error("item {index} is due in period {required}, not period {period}")]
    WrongPeriod {
        index: usize,
        required: usize,
        period: usize,
    },
    #[error("item {index} is due in period {period} but was not loaded")]
    MissingRequired { index: usize, period: usize },
    #[error("cargo weight {weight} exceeds the truck capacity of {capacity}", capacity = TRUCK_WEIGHT_CAPACITY)]
    OverCapacity { weight: u32 },
    #[error("item {index} is still undelivered in the final period")]
    LeftBehind { index: usize },
    #[error("item {index} does not exist")]
    NonexistentItem { index: usize },
}

/// Misuse of the turn API. Rule violations are not errors: they fail the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("stage already finished as {0:?}")]
    Finished(StageState),
    #[error("the truck is empty at the office; load the next period before moving")]
    AwaitingCargo,
    #[error("cargo can only be loaded when the truck is empty at the office")]
    NotAtPeriodStart,
    #[error("no action left to drive period {period}")]
    OutOfActions { period: usize },
}

/// Snapshot handed to observers after every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnResult {
    /// Zero-based index of the turn this snapshot describes.
    pub turn: u32,
    /// The turn loaded cargo instead of moving.
    pub init_period: bool,
    pub action: Option<Action>,
    pub truck_pos: Position,
    pub cargo: CargoSet,
    pub period_cost: u32,
    /// Fuel of all finished periods, not counting the current one.
    pub total_cost: u32,
    /// The truck came back empty and the current period closed.
    pub period_end: bool,
    pub state: StageState,
}

impl TurnResult {
    pub fn running_cost(&self) -> u32 {
        self.total_cost + self.period_cost
    }
}

/// Supplies cargo declarations and moves to `Stage::run_turn`.
pub trait TurnDriver {
    fn load_period(&mut self, stage: &Stage, period: usize) -> CargoSet;

    fn next_action(&mut self, stage: &Stage) -> Option<Action>;
}

/// One stage of the game: a field, its items and the truck delivering them.
#[derive(Debug, Clone)]
pub struct Stage {
    field: Field,
    items: ItemCollection,
    truck: Truck,
    period: Option<usize>,
    period_cost: u32,
    total_cost: u32,
    transport_states: Vec<TransportState>,
    turn_index: u32,
    turn_limit: u32,
    state: StageState,
    last_result: TurnResult,
    violations: Vec<CargoViolation>,
}

impl Stage {
    pub fn new(field: Field, items: ItemCollection) -> Self {
        let office = field.office_pos();
        let transport_states = vec![TransportState::NotTransported; items.len()];
        Self {
            field,
            items,
            truck: Truck::new(office),
            period: None,
            period_cost: 0,
            total_cost: 0,
            transport_states,
            turn_index: 0,
            turn_limit: GAME_TURN_PER_STAGE,
            state: StageState::Playing,
            last_result: TurnResult {
                turn: 0,
                init_period: false,
                action: None,
                truck_pos: office,
                cargo: CargoSet::new(),
                period_cost: 0,
                total_cost: 0,
                period_end: false,
                state: StageState::Playing,
            },
            violations: Vec::new(),
        }
    }

    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    pub fn truck(&self) -> &Truck {
        &self.truck
    }

    /// Current period, `None` before the first cargo is loaded.
    pub fn period(&self) -> Option<usize> {
        self.period
    }

    pub fn next_period(&self) -> usize {
        self.period.map_or(0, |period| period + 1)
    }

    pub fn period_cost(&self) -> u32 {
        self.period_cost
    }

    pub fn total_cost(&self) -> u32 {
        self.total_cost
    }

    pub fn turn(&self) -> u32 {
        self.turn_index
    }

    pub fn turn_limit(&self) -> u32 {
        self.turn_limit
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    pub fn last_result(&self) -> &TurnResult {
        &self.last_result
    }

    pub fn violations(&self) -> &[CargoViolation] {
        &self.violations
    }

    pub fn transport_state(&self, index: usize) -> Option<TransportState> {
        self.transport_states.get(index).copied()
    }

    /// True when the next turn loads cargo rather than moving.
    pub fn is_period_start(&self) -> bool {
        self.state == StageState::Playing
            && self.truck.is_empty()
            && self.truck.pos == self.field.office_pos()
    }

    pub fn score(&self) -> u64 {
        if self.state != StageState::Complete || self.total_cost == 0 {
            return 0;
        }
        let area = (self.field.width * self.field.height) as u64;
        area * self.items.len() as u64 * SCORE_FACTOR / self.total_cost as u64
    }

    /// Play one turn, asking `driver` for cargo or a move as the stage requires.
    pub fn run_turn<D: TurnDriver + ?Sized>(
        &mut self,
        driver: &mut D,
    ) -> Result<TurnResult, StageError> {
        self.ensure_playing()?;
        if self.is_period_start() {
            let period = self.next_period();
            let cargo = driver.load_period(self, period);
            self.start_period(cargo)
        } else {
            let period = self.period.unwrap_or_default();
            let action = driver
                .next_action(self)
                .ok_or(StageError::OutOfActions { period })?;
            self.advance(action)
        }
    }

    /// Period-start turn: validate and load `cargo`. An illegal declaration
    /// fails the stage.
    pub fn start_period(&mut self, cargo: CargoSet) -> Result<TurnResult, StageError> {
        self.ensure_playing()?;
        if !self.is_period_start() {
            return Err(StageError::NotAtPeriodStart);
        }

        let period = self.next_period();
        self.period = Some(period);
        self.period_cost = 0;

        self.violations = self.validate_cargo(period, cargo);
        if !self.violations.is_empty() {
            for violation in &self.violations {
                warn!("Period {}: {}", period, violation);
            }
            self.state = StageState::Failed;
            self.record_turn(true, None, false);
            return Ok(self.last_result);
        }

        debug!("Period {} starts with cargo [{}]", period, cargo);
        self.truck.cargo = cargo;
        for index in cargo.iter() {
            self.transport_states[index] = TransportState::Transporting;
        }

        Ok(self.finish_turn(true, None))
    }

    /// Movement turn. A move into a wall leaves the truck in place but still burns fuel.
    pub fn advance(&mut self, action: Action) -> Result<TurnResult, StageError> {
        self.ensure_playing()?;
        if self.is_period_start() {
            return Err(StageError::AwaitingCargo);
        }

        let cost = TRUCK_WEIGHT + self.cargo_weight(self.truck.cargo);
        let next = self.truck.pos.step(action);
        if !self.field.is_wall(&next) {
            self.truck.pos = next;
            let delivered: Vec<usize> = self
                .truck
                .cargo
                .iter()
                .filter(|&index| {
                    self.items
                        .get(index)
                        .is_some_and(|item| item.destination == next)
                })
                .collect();
            for index in delivered {
                debug!("Item {} delivered at {}", index, next);
                self.truck.cargo.remove(index);
            }
        }
        self.period_cost += cost;

        Ok(self.finish_turn(false, Some(action)))
    }

    fn ensure_playing(&self) -> Result<(), StageError> {
        if self.state.is_terminal() {
            return Err(StageError::Finished(self.state));
        }
        Ok(())
    }

    fn cargo_weight(&self, cargo: CargoSet) -> u32 {
        cargo
            .iter()
            .filter_map(|index| self.items.get(index))
            .map(|item| item.weight)
            .sum()
    }

    fn validate_cargo(&self, period: usize, cargo: CargoSet) -> Vec<CargoViolation> {
        let mut violations = Vec::new();
        let mut weight = 0;
        let final_period = period == PERIOD_COUNT - 1;

        for (index, item) in self.items.iter().enumerate() {
            if !cargo.contains(index) {
                continue;
            }
            if self.transport_states[index] != TransportState::NotTransported {
                violations.push(CargoViolation::AlreadyTransported { index });
            }
            if !item.accepts_period(period)
                && let Some(required) = item.period
            {
                violations.push(CargoViolation::WrongPeriod {
                    index,
                    required,
                    period,
                });
            }
            weight += item.weight;
        }
        for index in self.items.required_in(period) {
            if !cargo.contains(index) {
                violations.push(CargoViolation::MissingRequired { index, period });
            }
        }
        if final_period {
            for (index, state) in self.transport_states.iter().enumerate() {
                if *state == TransportState::NotTransported && !cargo.contains(index) {
                    violations.push(CargoViolation::LeftBehind { index });
                }
            }
        }
        if weight > TRUCK_WEIGHT_CAPACITY {
            violations.push(CargoViolation::OverCapacity { weight });
        }
        for index in self.items.len()..ITEM_COUNT_MAX {
            if cargo.contains(index) {
                violations.push(CargoViolation::NonexistentItem { index });
            }
        }
        violations
    }

    fn finish_turn(&mut self, init_period: bool, action: Option<Action>) -> TurnResult {
        let period_end = self.truck.is_empty() && self.truck.pos == self.field.office_pos();
        self.record_turn(init_period, action, period_end);

        if period_end {
            let period = self.period.unwrap_or_default();
            debug!("Period {} ends, cost {}", period, self.period_cost);
            self.total_cost += self.period_cost;
            for state in self.transport_states.iter_mut() {
                if *state == TransportState::Transporting {
                    *state = TransportState::Transported;
                }
            }
            if period == PERIOD_COUNT - 1 {
                self.state = StageState::Complete;
            }
        }

        self.turn_index += 1;
        if self.state == StageState::Playing && self.turn_index >= self.turn_limit {
            warn!("Turn limit {} reached in period {:?}", self.turn_limit, self.period);
            self.state = StageState::TurnLimit;
        }

        self.last_result.state = self.state;
        self.last_result
    }

    fn record_turn(&mut self, init_period: bool, action: Option<Action>, period_end: bool) {
        self.last_result = TurnResult {
            turn: self.turn_index,
            init_period,
            action,
            truck_pos: self.truck.pos,
            cargo: self.truck.cargo,
            period_cost: self.period_cost,
            total_cost: self.total_cost,
            period_end,
            state: self.state,
        };
    }
}
