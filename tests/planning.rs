use crossing_planner::agent::choose_goal;
use crossing_planner::algorithms::a_star::{a_star, GridMode, GridPlanner};
use crossing_planner::algorithms::common::Planner;
use crossing_planner::algorithms::spatio_temporal::{spatio_temporal_a_star, SpatioTemporalPlanner};
use crossing_planner::config::GridConfig;
use crossing_planner::error::PlanError;
use crossing_planner::grid::{Cell, OccupancyGrid, Position, TimedPosition};
use crossing_planner::grid_builder::{
    build_conservative, build_predictive, build_reactive, merge_conservative,
};
use crossing_planner::obstacle::Obstacle;
use crossing_planner::oracle::SafetyOracle;
use crossing_planner::simulation::Level;
use crossing_planner::snapshot::Snapshot;
use pathfinding::prelude::astar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const TILE: f64 = 25.0;

fn narrow_river() -> GridConfig {
    GridConfig::new(25, 7, 16, 3, 7).unwrap()
}

/// One-tile stepping stones down column 5, with a three-tile raft centred on
/// column 5 of row 4.
fn stepping_stones(with_raft: bool) -> Snapshot {
    let mut obstacles: Vec<Obstacle> = [3, 5, 6, 7]
        .into_iter()
        .map(|row| Obstacle::platform(row, 5.0 * TILE, TILE, 0.0))
        .collect();
    if with_raft {
        obstacles.push(Obstacle::platform(4, 4.0 * TILE, 3.0 * TILE, 0.0));
    }
    Snapshot::new(obstacles, 0)
}

fn random_snapshot(rng: &mut StdRng, config: &GridConfig) -> Snapshot {
    let mut obstacles = Vec::new();
    for _ in 0..rng.gen_range(5..20) {
        let row = rng.gen_range(0..config.height as i32);
        let left = rng.gen_range(-50.0..config.screen_width());
        let width = f64::from(rng.gen_range(1..4_u32)) * TILE;
        let velocity = rng.gen_range(-6.0..6.0);
        let obstacle = match rng.gen_range(0..3) {
            0 => Obstacle::vehicle(row, left, width, velocity),
            1 => Obstacle::platform(row, left, width, velocity),
            _ => Obstacle::submersible(row, left, width, velocity, rng.gen_bool(0.5), 50),
        };
        obstacles.push(obstacle);
    }
    Snapshot::new(obstacles, rng.gen_range(0..200))
}

struct ListNode<P> {
    pos: P,
    parent: Option<usize>,
    g: u32,
    f: u32,
}

fn walk_back<P: Copy>(nodes: &[ListNode<P>], last: usize) -> Vec<P> {
    let mut path = Vec::new();
    let mut current = Some(last);
    while let Some(index) = current {
        path.push(nodes[index].pos);
        current = nodes[index].parent;
    }
    path.reverse();
    path
}

/// Plain list-based A*: linear scan for the first lowest `f`, a closed list,
/// and a new open entry only when no open entry for the cell has `g <=` it.
fn list_a_star(grid: &OccupancyGrid, start: Position, goal: Position) -> Option<Vec<Position>> {
    let mut nodes = vec![ListNode {
        pos: start,
        parent: None,
        g: 0,
        f: start.manhattan(goal),
    }];
    let mut open: Vec<usize> = vec![0];
    let mut closed: Vec<Position> = Vec::new();

    while !open.is_empty() {
        let mut best = 0;
        for (slot, index) in open.iter().enumerate() {
            if nodes[*index].f < nodes[open[best]].f {
                best = slot;
            }
        }
        let current = open.remove(best);
        let pos = nodes[current].pos;
        closed.push(pos);

        if pos == goal {
            return Some(walk_back(&nodes, current));
        }

        for (dcol, drow) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let next = pos.offset(dcol, drow);
            if grid.is_blocked(next) || closed.contains(&next) {
                continue;
            }
            let g = nodes[current].g + 1;
            if open
                .iter()
                .any(|index| nodes[*index].pos == next && g >= nodes[*index].g)
            {
                continue;
            }
            nodes.push(ListNode {
                pos: next,
                parent: Some(current),
                g,
                f: g + next.manhattan(goal),
            });
            open.push(nodes.len() - 1);
        }
    }
    None
}

/// Time-expanded A* that stably re-sorts the whole open list by `f` before
/// every pop and keeps duplicate states in it.
fn sorted_list_spatio_temporal(
    oracle: &SafetyOracle<'_>,
    start: Position,
    goal: Position,
    horizon: u32,
) -> Option<Vec<TimedPosition>> {
    let mut nodes = vec![ListNode {
        pos: TimedPosition::at(start, 0),
        parent: None,
        g: 0,
        f: start.manhattan(goal),
    }];
    let mut open: Vec<usize> = vec![0];
    let mut closed: HashSet<TimedPosition> = HashSet::new();

    while !open.is_empty() {
        open.sort_by_key(|index| nodes[*index].f);
        let current = open.remove(0);
        let state = nodes[current].pos;
        if !closed.insert(state) {
            continue;
        }

        if state.position() == goal {
            return Some(walk_back(&nodes, current));
        }

        for (dcol, drow) in [(0, 0), (0, -1), (0, 1), (-1, 0), (1, 0)] {
            let child = TimedPosition::new(state.col + dcol, state.row + drow, state.time + 1);
            if child.time > horizon || !oracle.is_safe_at(child) {
                continue;
            }
            nodes.push(ListNode {
                pos: child,
                parent: Some(current),
                g: child.time,
                f: child.time + child.position().manhattan(goal),
            });
            open.push(nodes.len() - 1);
        }
    }
    None
}

#[test]
fn raft_is_the_only_way_across() {
    let config = narrow_river();
    let start = Position::new(5, 14);
    let goal = Position::new(5, 1);

    let grid = build_reactive(&config, &stepping_stones(true));
    let path = a_star(&grid, start, goal).unwrap();
    assert!(path.contains(&Position::new(5, 4)));
    assert_eq!(path.len() - 1, start.manhattan(goal) as usize);
    for pos in &path {
        if config.is_river_row(pos.row) {
            assert!(!grid.is_blocked(*pos), "stepped into water at {pos}");
        }
    }

    let grid = build_reactive(&config, &stepping_stones(false));
    assert_eq!(
        a_star(&grid, start, goal),
        Err(PlanError::NoPathFound { start, goal })
    );
}

#[test]
fn empty_grid_paths_are_manhattan_and_orthogonal() {
    let grid = OccupancyGrid::new(9, 9);
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let start = Position::new(rng.gen_range(0..9), rng.gen_range(0..9));
        let goal = Position::new(rng.gen_range(0..9), rng.gen_range(0..9));
        let path = a_star(&grid, start, goal).unwrap();
        assert_eq!(path[0], start);
        assert_eq!(path.len() - 1, start.manhattan(goal) as usize);
        assert!(path.windows(2).all(|pair| pair[0].manhattan(pair[1]) == 1));
    }
}

#[test]
fn grid_a_star_matches_reference_path_cost() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..30 {
        let mut grid = OccupancyGrid::new(12, 12);
        for row in 0..12 {
            for col in 0..12 {
                if rng.gen_bool(0.28) {
                    grid.set(Position::new(col, row), Cell::Blocked);
                }
            }
        }
        let start = Position::new(0, 11);
        let goal = Position::new(11, 0);
        grid.set(start, Cell::Safe);
        grid.set(goal, Cell::Safe);

        let ours = a_star(&grid, start, goal).ok().map(|path| path.len() as u32 - 1);
        let reference = astar(
            &start,
            |pos| {
                grid.get_neighbors(pos)
                    .into_iter()
                    .map(|next| (next, 1u32))
                    .collect::<Vec<_>>()
            },
            |pos| pos.manhattan(goal),
            |pos| *pos == goal,
        )
        .map(|(_, cost)| cost);
        assert_eq!(ours, reference);
    }
}

#[test]
fn grid_a_star_is_idempotent() {
    let config = GridConfig::default();
    let level = Level::generate(&config, 50, 5);
    let snapshot = Snapshot::new(level.obstacles, 0);
    let grid = build_conservative(&config, &snapshot);
    let goal = choose_goal(level.spawn, &level.goals).unwrap();
    assert_eq!(
        a_star(&grid, level.spawn, goal),
        a_star(&grid, level.spawn, goal)
    );
}

#[test]
fn vehicle_beats_platform_on_shared_cells() {
    let config = narrow_river();
    let snapshot = Snapshot::new(
        vec![
            Obstacle::platform(5, 0.0, 7.0 * TILE, 0.0),
            Obstacle::vehicle(5, 2.0 * TILE, 2.0 * TILE, 0.0),
        ],
        0,
    );
    let grid = build_reactive(&config, &snapshot);
    let blocked: Vec<i32> = (0..7)
        .filter(|col| grid.is_blocked(Position::new(*col, 5)))
        .collect();
    assert_eq!(blocked, vec![2, 3]);
}

#[test]
fn conservative_grid_is_exact_union() {
    let config = GridConfig::default();
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..25 {
        let snapshot = random_snapshot(&mut rng, &config);
        let now = build_reactive(&config, &snapshot);
        let next = build_predictive(&config, &snapshot);
        let merged = merge_conservative(&now, &next);
        assert_eq!(merged, build_conservative(&config, &snapshot));
        for row in 0..config.height as i32 {
            for col in 0..config.width as i32 {
                let pos = Position::new(col, row);
                assert_eq!(
                    merged.is_blocked(pos),
                    now.is_blocked(pos) || next.is_blocked(pos)
                );
            }
        }
    }
}

#[test]
fn oracle_answers_are_deterministic() {
    let config = GridConfig::default();
    let mut rng = StdRng::seed_from_u64(17);
    let snapshot = random_snapshot(&mut rng, &config);
    let copy = snapshot.clone();
    let first = SafetyOracle::new(&config, &snapshot);
    let second = SafetyOracle::new(&config, &copy);
    for _ in 0..500 {
        let pos = Position::new(rng.gen_range(-1..15), rng.gen_range(-1..17));
        let delta = rng.gen_range(0..120);
        assert_eq!(first.is_safe(pos, delta), first.is_safe(pos, delta));
        assert_eq!(first.is_safe(pos, delta), second.is_safe(pos, delta));
    }
}

#[test]
fn spatio_temporal_plans_replay_safely() {
    let config = GridConfig::default();
    let horizon = 100;
    let mut solved = 0;
    for seed in 0..10 {
        let level = Level::generate(&config, 50, seed);
        let snapshot = Snapshot::new(level.obstacles, seed * 13);
        let oracle = SafetyOracle::new(&config, &snapshot);
        let goal = choose_goal(level.spawn, &level.goals).unwrap();

        let Ok(path) = spatio_temporal_a_star(&oracle, level.spawn, goal, horizon) else {
            continue;
        };
        solved += 1;

        assert_eq!(path[0].position(), level.spawn);
        assert_eq!(path[0].time, 0);
        assert_eq!(path.last().map(|state| state.position()), Some(goal));
        for pair in path.windows(2) {
            assert_eq!(pair[1].time, pair[0].time + 1);
            assert!(pair[0].position().manhattan(pair[1].position()) <= 1);
        }
        for state in &path {
            assert!(state.time <= horizon);
            assert!(oracle.is_safe_at(*state), "unsafe plan step {state}");
        }
    }
    assert!(solved > 0, "no level was solvable within the horizon");
}

#[test]
fn spatio_temporal_zero_horizon_fails_away_from_goal() {
    let config = GridConfig::default();
    let snapshot = Snapshot::default();
    let mut planner = SpatioTemporalPlanner::new(0);
    let result = planner.plan(&config, &snapshot, Position::new(7, 14), Position::new(7, 13));
    assert!(matches!(result, Err(PlanError::HorizonExhausted { .. })));
    assert!(result.unwrap_err().is_recoverable());
}

#[test]
fn planners_share_the_grid_contract() {
    let config = narrow_river();
    let snapshot = stepping_stones(true);
    let start = Position::new(5, 14);
    let goal = Position::new(5, 1);

    let mut planners: Vec<Box<dyn Planner>> = vec![
        Box::new(GridPlanner::new(GridMode::Reactive)),
        Box::new(GridPlanner::new(GridMode::Predictive)),
        Box::new(GridPlanner::new(GridMode::Conservative)),
        Box::new(SpatioTemporalPlanner::new(40)),
    ];
    for planner in &mut planners {
        let plan = planner.plan(&config, &snapshot, start, goal).unwrap();
        assert_eq!(plan.get(0), Some(start), "{}", planner.name());
        assert_eq!(plan.last(), Some(goal), "{}", planner.name());
        assert_eq!(plan.moves(), 13, "{}", planner.name());
    }
}

#[test]
fn grid_a_star_matches_list_search_exactly() {
    let mut rng = StdRng::seed_from_u64(300);
    for _ in 0..200 {
        let mut grid = OccupancyGrid::new(10, 10);
        for row in 0..10 {
            for col in 0..10 {
                if rng.gen_bool(0.3) {
                    grid.set(Position::new(col, row), Cell::Blocked);
                }
            }
        }
        let start = Position::new(rng.gen_range(0..10), rng.gen_range(0..10));
        let goal = Position::new(rng.gen_range(0..10), rng.gen_range(0..10));
        grid.set(start, Cell::Safe);
        grid.set(goal, Cell::Safe);

        assert_eq!(
            a_star(&grid, start, goal).ok(),
            list_a_star(&grid, start, goal),
            "paths differ from {start} to {goal}"
        );
    }

    let config = GridConfig::default();
    for seed in 0..20 {
        let level = Level::generate(&config, 50, seed);
        let snapshot = Snapshot::new(level.obstacles, seed * 7);
        let goal = choose_goal(level.spawn, &level.goals).unwrap();
        let road_goal = Position::new(level.spawn.col, config.river_end as i32 + 1);
        for grid in [
            build_reactive(&config, &snapshot),
            build_predictive(&config, &snapshot),
            build_conservative(&config, &snapshot),
        ] {
            for target in [goal, road_goal] {
                assert_eq!(
                    a_star(&grid, level.spawn, target).ok(),
                    list_a_star(&grid, level.spawn, target),
                    "seed {seed} target {target}"
                );
            }
        }
    }
}

#[test]
fn spatio_temporal_matches_sorted_list_search_exactly() {
    let config = GridConfig::new(25, 9, 12, 3, 5).unwrap();
    let horizon = 20;
    for seed in 0..10 {
        let level = Level::generate(&config, 50, seed);
        let snapshot = Snapshot::new(level.obstacles, seed * 11);
        let oracle = SafetyOracle::new(&config, &snapshot);
        let far_bank = choose_goal(level.spawn, &level.goals).unwrap();
        let road = Position::new(level.spawn.col - 1, config.river_end as i32 + 1);

        for goal in [far_bank, road] {
            assert_eq!(
                spatio_temporal_a_star(&oracle, level.spawn, goal, horizon).ok(),
                sorted_list_spatio_temporal(&oracle, level.spawn, goal, horizon),
                "seed {seed} goal {goal}"
            );
        }
    }
}

#[test]
fn spatio_temporal_matches_sorted_list_search_on_open_roads() {
    let config = GridConfig::default();
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..15 {
        let obstacles = (0..rng.gen_range(4..10))
            .map(|_| {
                Obstacle::vehicle(
                    rng.gen_range(8..15),
                    rng.gen_range(0.0..300.0),
                    f64::from(rng.gen_range(1..3_u32)) * TILE,
                    rng.gen_range(-8.0..8.0),
                )
            })
            .collect();
        let snapshot = Snapshot::new(obstacles, 0);
        let oracle = SafetyOracle::new(&config, &snapshot);
        let start = Position::new(rng.gen_range(0..14), 15);
        let goal = Position::new(rng.gen_range(0..14), 8);

        assert_eq!(
            spatio_temporal_a_star(&oracle, start, goal, 16).ok(),
            sorted_list_spatio_temporal(&oracle, start, goal, 16),
            "from {start} to {goal}"
        );
    }
}
