use std::fmt::Write;

use crate::game::GameSummary;
use crate::infra::{GameObserver, Position};
use crate::planners::StagePlan;
use crate::state::{Field, ItemCollection, Stage, StageState, TurnResult};

/// Keeps the turns of the current stage and renders them as a text dump.
#[derive(Debug, Default)]
pub struct StageRecorder {
    number: u32,
    field: Option<Field>,
    items: ItemCollection,
    assignment: Vec<Option<usize>>,
    turns: Vec<TurnResult>,
    outcome: Option<(StageState, u32, u64)>,
}

impl StageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn turns(&self) -> &[TurnResult] {
        &self.turns
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "stage {}", self.number);

        if let Some(field) = &self.field {
            let _ = writeln!(out, "field {}x{}", field.width, field.height);
            out.push_str(&self.draw_field(field));
        }

        let _ = writeln!(out, "items");
        for (index, item) in self.items.iter().enumerate() {
            let required = item.period.map_or("-".to_string(), |p| p.to_string());
            let planned = self
                .assignment
                .get(index)
                .copied()
                .flatten()
                .map_or("-".to_string(), |p| p.to_string());
            let _ = writeln!(
                out,
                "  {:x}: {} weight {} period {} planned {}",
                index, item.destination, item.weight, required, planned
            );
        }

        let _ = writeln!(out, "turns");
        let mut previous_cargo = None;
        for result in &self.turns {
            // Only turns that change the load or close a period
            if !result.init_period && !result.period_end && previous_cargo == Some(result.cargo) {
                continue;
            }
            previous_cargo = Some(result.cargo);
            let action = result.action.map_or("load", |action| action.as_str_name());
            let _ = writeln!(
                out,
                "  {:4} {:<10} {:>8} [{}] cost {}{}",
                result.turn,
                action,
                result.truck_pos.to_string(),
                result.cargo,
                result.running_cost(),
                if result.period_end { " period end" } else { "" }
            );
        }

        if let Some((state, cost, score)) = self.outcome {
            let _ = writeln!(out, "result {:?} cost {} score {}", state, cost, score);
        }
        out
    }

    /// Row per y, top row first. `O` marks the office, hex digits mark item destinations.
    fn draw_field(&self, field: &Field) -> String {
        let mut out = String::new();
        let office = field.office_pos();
        for y in (0..field.height).rev() {
            for x in 0..field.width {
                let pos = Position::new(x, y);
                let item = self.items.iter().position(|item| item.destination == pos);
                let cell = match item {
                    Some(index) => std::char::from_digit(index as u32, 16).unwrap_or('?'),
                    None if pos == office => 'O',
                    None if field.is_wall(&pos) => '#',
                    None => '.',
                };
                out.push(cell);
            }
            out.push('\n');
        }
        out
    }
}

impl GameObserver for StageRecorder {
    fn on_stage_start(&mut self, number: u32, stage: &Stage) {
        *self = Self {
            number,
            field: Some(stage.field().clone()),
            items: stage.items().clone(),
            assignment: vec![None; stage.items().len()],
            ..Self::default()
        };
    }

    fn on_plan_ready(&mut self, _number: u32, plan: &StagePlan) {
        for (index, slot) in self.assignment.iter_mut().enumerate() {
            *slot = plan.assigned_period(index);
        }
    }

    fn on_turn(&mut self, result: &TurnResult, _stage: &Stage) {
        self.turns.push(*result);
    }

    fn on_stage_finished(&mut self, _number: u32, stage: &Stage) {
        self.outcome = Some((stage.state(), stage.total_cost(), stage.score()));
    }

    fn on_game_finished(&mut self, _summary: &GameSummary) {}
}
