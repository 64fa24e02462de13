use crate::algorithms::common::{reconstruct, Node, Plan, Planner};
use crate::config::GridConfig;
use crate::error::PlanError;
use crate::grid::{Position, TimedPosition};
use crate::oracle::SafetyOracle;
use crate::snapshot::Snapshot;
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Wait, up, down, left, right. Every action takes exactly one tick.
const ACTIONS: [(i32, i32); 5] = [(0, 0), (0, -1), (0, 1), (-1, 0), (1, 0)];

/// Open-set entry. Arena indices grow with insertion, so ordering on
/// `(f, index)` keeps equal-`f` entries in first-in first-out order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct QueueEntry {
    f: u32,
    index: usize,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// A* over `(column, row, time)` states.
///
/// `g` is the elapsed time and `h` the Manhattan distance to `goal`, which
/// never overestimates since no action covers more than one cell per tick.
/// Children later than `horizon` are pruned and children the oracle reports
/// unsafe are never generated. The first popped state standing on `goal`
/// ends the search, at whatever time it arrives.
///
/// # Arguments
///
/// * `oracle` - Safety queries against the frozen snapshot.
/// * `start` - The agent's cell at offset 0.
/// * `goal` - The cell to reach; arrival time is free.
/// * `horizon` - The latest tick offset a plan may use.
///
/// # Returns
///
/// The timed path with one state per tick, starting at `(start, 0)`, or
/// `PlanError::HorizonExhausted` when no safe route exists within `horizon`.
pub fn spatio_temporal_a_star(
    oracle: &SafetyOracle<'_>,
    start: Position,
    goal: Position,
    horizon: u32,
) -> Result<Vec<TimedPosition>, PlanError> {
    let root = TimedPosition::at(start, 0);
    let mut arena = vec![Node::new(root, None, 0, start.manhattan(goal))];
    let mut open = BinaryHeap::new();
    let mut generated: FxHashSet<TimedPosition> = FxHashSet::default();
    let mut closed: FxHashSet<TimedPosition> = FxHashSet::default();
    open.push(QueueEntry {
        f: arena[0].f,
        index: 0,
    });
    generated.insert(root);

    while let Some(QueueEntry { index: current, .. }) = open.pop() {
        let node = arena[current];
        if !closed.insert(node.pos) {
            continue;
        }
        trace!("expanding {} h={} f={}", node.pos, node.h, node.f);

        if node.pos.position() == goal {
            let path = reconstruct(&arena, current);
            debug!(
                "spatio-temporal A* reached {} at t={} after expanding {} states",
                goal,
                node.pos.time,
                closed.len()
            );
            return Ok(path);
        }

        if node.pos.time >= horizon {
            continue;
        }
        let time = node.pos.time + 1;

        for (dcol, drow) in ACTIONS {
            let child = TimedPosition::new(node.pos.col + dcol, node.pos.row + drow, time);
            if closed.contains(&child) || !generated.insert(child) {
                continue;
            }
            if !oracle.is_safe_at(child) {
                continue;
            }
            arena.push(Node::new(
                child,
                Some(current),
                time,
                child.position().manhattan(goal),
            ));
            open.push(QueueEntry {
                f: arena[arena.len() - 1].f,
                index: arena.len() - 1,
            });
        }
    }

    debug!(
        "spatio-temporal A* found no path from {} to {} within {} ticks ({} states expanded)",
        start,
        goal,
        horizon,
        closed.len()
    );
    Err(PlanError::HorizonExhausted {
        start,
        goal,
        horizon,
    })
}

/// Plans straight from the snapshot through the safety oracle.
#[derive(Debug, Clone, Copy)]
pub struct SpatioTemporalPlanner {
    horizon: u32,
}

impl SpatioTemporalPlanner {
    /// Creates a planner that looks at most `horizon` ticks ahead.
    pub fn new(horizon: u32) -> Self {
        SpatioTemporalPlanner { horizon }
    }
}

impl Planner for SpatioTemporalPlanner {
    fn name(&self) -> &'static str {
        "spatio-temporal"
    }

    fn plan(
        &mut self,
        config: &GridConfig,
        snapshot: &Snapshot,
        start: Position,
        goal: Position,
    ) -> Result<Plan, PlanError> {
        let oracle = SafetyOracle::new(config, snapshot);
        spatio_temporal_a_star(&oracle, start, goal, self.horizon).map(Plan::from_timed)
    }
}
