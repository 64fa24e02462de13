use crate::config::GridConfig;
use crate::error::PlanError;
use crate::grid::{Position, TimedPosition};
use crate::snapshot::Snapshot;
use std::hash::{Hash, Hasher};

/// A planning strategy the simulation can swap in.
pub trait Planner {
    /// Short kebab-case label used in logs and comparison tables.
    fn name(&self) -> &'static str;

    /// Plans from `start` to `goal` against a frozen snapshot.
    ///
    /// # Arguments
    ///
    /// * `config` - Playfield geometry.
    /// * `snapshot` - Obstacles as they were when planning started.
    /// * `start` - The agent's current cell.
    /// * `goal` - The accepting cell to reach.
    ///
    /// # Returns
    ///
    /// A `Plan` whose step `i` is occupied `i` ticks from now, or a
    /// recoverable `PlanError`.
    fn plan(
        &mut self,
        config: &GridConfig,
        snapshot: &Snapshot,
        start: Position,
        goal: Position,
    ) -> Result<Plan, PlanError>;
}

/// Ordered route where step `i` is the cell to occupy `i` ticks after planning.
/// The first step is always the start cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<TimedPosition>,
}

impl Plan {
    /// Times a single-slice path by its indices.
    pub fn from_path(path: Vec<Position>) -> Self {
        let steps = path
            .into_iter()
            .enumerate()
            .map(|(time, pos)| TimedPosition::at(pos, time as u32))
            .collect();
        Plan { steps }
    }

    /// Wraps a path whose steps already carry their tick offsets.
    pub fn from_timed(steps: Vec<TimedPosition>) -> Self {
        Plan { steps }
    }

    /// Stay put for one tick.
    pub fn hold(position: Position) -> Self {
        Plan {
            steps: vec![TimedPosition::at(position, 0)],
        }
    }

    pub fn steps(&self) -> &[TimedPosition] {
        &self.steps
    }

    /// Cell to occupy at plan step `step`.
    pub fn get(&self, step: usize) -> Option<Position> {
        self.steps.get(step).map(TimedPosition::position)
    }

    pub fn last(&self) -> Option<Position> {
        self.steps.last().map(TimedPosition::position)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of moves, i.e. steps after the start cell.
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Search node stored in an arena; `parent` indexes the same arena.
///
/// Two nodes are the same search state when their positions match, whatever
/// their costs or parents.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node<P> {
    pub pos: P,
    pub parent: Option<usize>,
    pub g: u32,
    pub h: u32,
    pub f: u32,
}

impl<P> Node<P> {
    pub fn new(pos: P, parent: Option<usize>, g: u32, h: u32) -> Self {
        Node {
            pos,
            parent,
            g,
            h,
            f: g + h,
        }
    }
}

impl<P: PartialEq> PartialEq for Node<P> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<P: Eq> Eq for Node<P> {}

impl<P: Hash> Hash for Node<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}

/// Walks the parent chain from `last` and returns it start-first.
pub(crate) fn reconstruct<P: Copy>(arena: &[Node<P>], last: usize) -> Vec<P> {
    let mut path = Vec::new();
    let mut current = Some(last);
    while let Some(index) = current {
        let node = &arena[index];
        path.push(node.pos);
        current = node.parent;
    }
    path.reverse();
    path
}
