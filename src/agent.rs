use crate::algorithms::common::Plan;
use crate::grid::{Position, TimedPosition};

/// Plan-following controller for the crossing agent.
pub struct Agent {
    pub position: Position,
    pub spawn: Position,
    pub alive: bool,
    plan: Option<Plan>,
    step: usize,
}

impl Agent {
    pub fn new(spawn: Position) -> Self {
        Agent {
            position: spawn,
            spawn,
            alive: true,
            plan: None,
            step: 0,
        }
    }

    /// True once the current plan has been fully executed, or if there is none.
    pub fn needs_plan(&self) -> bool {
        match &self.plan {
            Some(plan) => self.step >= plan.len(),
            None => true,
        }
    }

    /// Step 0 of a plan is the cell the agent already occupies, so execution
    /// resumes at step 1 on the next tick.
    pub fn follow(&mut self, plan: Plan) {
        self.plan = Some(plan);
        self.step = 1;
    }

    /// Stay put for one tick and plan again afterwards.
    pub fn hold(&mut self) {
        self.follow(Plan::hold(self.position));
    }

    /// Moves to the next planned cell. Returns the cell entered, or `None`
    /// when there was nothing left to execute and the agent stayed put.
    pub fn advance(&mut self) -> Option<Position> {
        let next = self.plan.as_ref()?.get(self.step)?;
        self.step += 1;
        self.position = next;
        Some(next)
    }

    /// Remaining planned cells, the next one first.
    pub fn upcoming(&self) -> &[TimedPosition] {
        match &self.plan {
            Some(plan) => plan.steps().get(self.step..).unwrap_or(&[]),
            None => &[],
        }
    }

    pub fn clear_plan(&mut self) {
        self.plan = None;
        self.step = 0;
    }

    /// Marks the agent dead and drops its plan.
    pub fn die(&mut self) {
        self.alive = false;
        self.clear_plan();
    }

    /// Returns the agent to its spawn cell with no plan.
    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.alive = true;
        self.clear_plan();
    }
}

/// Picks the accepting cell closest in column to `from`; the first listed
/// wins ties.
pub fn choose_goal(from: Position, goals: &[Position]) -> Option<Position> {
    goals
        .iter()
        .copied()
        .min_by_key(|goal| goal.col.abs_diff(from.col))
}
