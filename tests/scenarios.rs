//! End-to-end stage scenarios: plan, compile and play small hand-made stages.

use truckbot::infra::params::{PERIOD_COUNT, TRUCK_WEIGHT};
use truckbot::infra::{Action, CargoSet, Position};
use truckbot::planners::{CompiledPlan, PeriodPlanner, PlanExecutor};
use truckbot::state::{CargoViolation, Field, Item, ItemCollection, Stage, StageState};

fn corridor() -> Field {
    Field::from_rows(&[
        "#######", //
        "#.....#", //
        "#######",
    ])
}

fn cargo(indices: &[usize]) -> CargoSet {
    CargoSet::try_from(indices).unwrap()
}

fn play(field: Field, items: ItemCollection) -> Stage {
    let plan = PeriodPlanner::new(&field, &items).plan().unwrap();
    let mut executor = PlanExecutor::new(CompiledPlan::compile(&plan));
    let mut stage = Stage::new(field, items);
    while !stage.state().is_terminal() {
        stage.run_turn(&mut executor).unwrap();
    }
    stage
}

#[test]
fn single_item_round_trip() {
    let field = corridor();
    let items = ItemCollection::try_from(vec![Item::new(Position::new(5, 1), None, 1)]).unwrap();

    let plan = PeriodPlanner::new(&field, &items).plan().unwrap();
    let period = plan.assigned_period(0).unwrap();
    let compiled = CompiledPlan::compile(&plan);
    assert_eq!(
        compiled.period(period).unwrap().actions,
        vec![
            Action::MoveRight,
            Action::MoveRight,
            Action::MoveLeft,
            Action::MoveLeft
        ]
    );

    let stage = play(field, items);
    assert_eq!(stage.state(), StageState::Complete);
    let expected_cost = (TRUCK_WEIGHT + 1) * 2 + TRUCK_WEIGHT * 2;
    assert_eq!(stage.total_cost(), expected_cost);
    assert_eq!(stage.score(), 7 * 3 * 10_000 / expected_cost as u64);
}

#[test]
fn required_items_fill_capacity_exactly() {
    let field = corridor();
    let items = ItemCollection::try_from(vec![
        Item::new(Position::new(1, 1), Some(0), 8),
        Item::new(Position::new(5, 1), Some(0), 7),
        Item::new(Position::new(4, 1), None, 1),
    ])
    .unwrap();

    let plan = PeriodPlanner::new(&field, &items).plan().unwrap();
    assert_eq!(plan.period(0).unwrap().cargo_weight(), 15);
    assert_ne!(plan.assigned_period(2), Some(0));

    let stage = play(field, items);
    assert_eq!(stage.state(), StageState::Complete);
    assert!(stage.score() > 0);
}

#[test]
fn overloaded_cargo_is_refused() {
    let items = ItemCollection::try_from(vec![
        Item::new(Position::new(1, 1), Some(0), 8),
        Item::new(Position::new(5, 1), Some(0), 7),
        Item::new(Position::new(4, 1), None, 1),
    ])
    .unwrap();
    let mut stage = Stage::new(corridor(), items);

    stage.start_period(cargo(&[0, 1, 2])).unwrap();
    assert_eq!(stage.state(), StageState::Failed);
    assert_eq!(stage.violations(), &[CargoViolation::OverCapacity { weight: 16 }]);
}

#[test]
fn reloading_delivered_item_fails_stage() {
    let items = ItemCollection::try_from(vec![Item::new(Position::new(2, 1), None, 2)]).unwrap();
    let mut stage = Stage::new(corridor(), items);

    stage.start_period(cargo(&[0])).unwrap();
    stage.advance(Action::MoveLeft).unwrap();
    let back = stage.advance(Action::MoveRight).unwrap();
    assert!(back.period_end);

    let result = stage.start_period(cargo(&[0])).unwrap();
    assert_eq!(result.state, StageState::Failed);
    assert!(
        stage
            .violations()
            .contains(&CargoViolation::AlreadyTransported { index: 0 })
    );
    assert_eq!(stage.score(), 0);
}

#[test]
fn omitting_final_period_items_fails_stage() {
    let last = PERIOD_COUNT - 1;
    let items = ItemCollection::try_from(vec![
        Item::new(Position::new(1, 1), Some(last), 1),
        Item::new(Position::new(5, 1), Some(last), 2),
    ])
    .unwrap();
    let mut stage = Stage::new(corridor(), items);

    for _ in 0..last {
        stage.start_period(CargoSet::new()).unwrap();
        assert_eq!(stage.state(), StageState::Playing);
    }
    stage.start_period(CargoSet::new()).unwrap();

    assert_eq!(stage.state(), StageState::Failed);
    assert!(
        stage
            .violations()
            .contains(&CargoViolation::MissingRequired { index: 1, period: last })
    );
    assert_eq!(stage.score(), 0);
    // A failed start does not count as a played turn
    assert_eq!(stage.turn(), last as u32);
}
