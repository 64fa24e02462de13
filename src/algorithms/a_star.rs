use crate::algorithms::common::{reconstruct, Node, Plan, Planner};
use crate::config::GridConfig;
use crate::error::PlanError;
use crate::grid::{OccupancyGrid, Position};
use crate::grid_builder::{build_conservative, build_predictive, build_reactive};
use crate::snapshot::Snapshot;
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

/// A* over a single occupancy slice, 4-connected, unit cost, Manhattan
/// heuristic.
///
/// The open set is scanned linearly and the first entry with the lowest `f`
/// wins, so ties go to the earliest inserted node. A neighbour is dropped when
/// its cell is closed or already open with a `g` no worse than the new one.
///
/// # Arguments
///
/// * `grid` - The occupancy slice to search.
/// * `start` - The agent's cell; it is never checked for safety.
/// * `goal` - The cell to reach.
///
/// # Returns
///
/// The path from `start` to `goal` inclusive, or `PlanError::NoPathFound`
/// once the open set runs dry.
pub fn a_star(
    grid: &OccupancyGrid,
    start: Position,
    goal: Position,
) -> Result<Vec<Position>, PlanError> {
    let mut arena = vec![Node::new(start, None, 0, start.manhattan(goal))];
    let mut open: Vec<usize> = vec![0];
    let mut open_g: FxHashMap<Position, u32> = FxHashMap::default();
    let mut closed: FxHashSet<Position> = FxHashSet::default();
    open_g.insert(start, 0);

    loop {
        let Some(slot) = open
            .iter()
            .enumerate()
            .min_by_key(|(_, index)| arena[**index].f)
            .map(|(slot, _)| slot)
        else {
            break;
        };
        let current = open.remove(slot);
        let node = arena[current];

        if !closed.insert(node.pos) {
            continue;
        }
        trace!(
            "expanding {} g={} h={} f={}",
            node.pos,
            node.g,
            node.h,
            node.f
        );

        if node.pos == goal {
            let path = reconstruct(&arena, current);
            debug!(
                "grid A* reached {} in {} moves after expanding {} cells",
                goal,
                path.len() - 1,
                closed.len()
            );
            return Ok(path);
        }

        for next in grid.get_neighbors(&node.pos) {
            if closed.contains(&next) {
                continue;
            }
            let g = node.g + 1;
            if open_g.get(&next).is_some_and(|best| *best <= g) {
                continue;
            }
            open_g.insert(next, g);
            arena.push(Node::new(next, Some(current), g, next.manhattan(goal)));
            open.push(arena.len() - 1);
        }
    }

    debug!(
        "grid A* found no path from {} to {} after expanding {} cells",
        start,
        goal,
        closed.len()
    );
    Err(PlanError::NoPathFound { start, goal })
}

/// Which time slice the grid planner searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    /// Occupancy at the snapshot tick.
    Reactive,
    /// Occupancy one tick later.
    Predictive,
    /// Union of both.
    Conservative,
}

/// Builds one occupancy grid per call and runs [`a_star`] on it.
#[derive(Debug, Clone, Copy)]
pub struct GridPlanner {
    mode: GridMode,
}

impl GridPlanner {
    /// Creates a grid planner searching the slice selected by `mode`.
    pub fn new(mode: GridMode) -> Self {
        GridPlanner { mode }
    }

    /// Rasterizes the snapshot into the slice this planner searches.
    pub fn build(&self, config: &GridConfig, snapshot: &Snapshot) -> OccupancyGrid {
        match self.mode {
            GridMode::Reactive => build_reactive(config, snapshot),
            GridMode::Predictive => build_predictive(config, snapshot),
            GridMode::Conservative => build_conservative(config, snapshot),
        }
    }
}

impl Planner for GridPlanner {
    fn name(&self) -> &'static str {
        match self.mode {
            GridMode::Reactive => "reactive",
            GridMode::Predictive => "predictive",
            GridMode::Conservative => "conservative",
        }
    }

    fn plan(
        &mut self,
        config: &GridConfig,
        snapshot: &Snapshot,
        start: Position,
        goal: Position,
    ) -> Result<Plan, PlanError> {
        let grid = self.build(config, snapshot);
        a_star(&grid, start, goal).map(Plan::from_path)
    }
}
