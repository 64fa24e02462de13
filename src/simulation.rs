//! Headless stand-in for the game loop: a lane world that feeds snapshots to
//! a planner and moves the agent along the returned plans.

use crate::agent::{choose_goal, Agent};
use crate::algorithms::common::Planner;
use crate::algorithms::planner_for;
use crate::config::{Config, GridConfig, PlannerKind};
use crate::error::ConfigError;
use crate::grid::Position;
use crate::grid_builder::build_reactive;
use crate::obstacle::{Obstacle, ObstacleKind};
use crate::oracle::SafetyOracle;
use crate::snapshot::Snapshot;
use crate::statistics::{Statistics, TimingData};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::thread;
use std::time::{Duration, Instant};

/// Initial obstacle layout plus the agent's spawn and accepting cells.
#[derive(Debug, Clone)]
pub struct Level {
    pub obstacles: Vec<Obstacle>,
    pub spawn: Position,
    pub goals: Vec<Position>,
}

impl Level {
    /// Lays out a seeded level: logs and turtle groups on alternating river
    /// rows, vehicles of alternating direction on the road rows between the
    /// river and the spawn row.
    pub fn generate(grid: &GridConfig, dive_period: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let tile = grid.tile();
        let mut obstacles = Vec::new();

        for (lane, row) in (grid.river_start..=grid.river_end).enumerate() {
            let row = row as i32;
            if lane % 2 == 1 {
                let speed = -f64::from(rng.gen_range(4..=6_u32)) * 0.5;
                let length = rng.gen_range(2..=3);
                let slots = lane_slots(&mut rng, grid.width, length, 1..=3);
                for (group, col) in slots.into_iter().enumerate() {
                    obstacles.push(Obstacle::submersible(
                        row,
                        col as f64 * tile,
                        length as f64 * tile,
                        speed,
                        group % 3 == 0,
                        dive_period,
                    ));
                }
            } else {
                let speed = f64::from(rng.gen_range(4..=8_u32)) * 0.5;
                let length = rng.gen_range(2..=5);
                for col in lane_slots(&mut rng, grid.width, length, 1..=3) {
                    obstacles.push(Obstacle::platform(
                        row,
                        col as f64 * tile,
                        length as f64 * tile,
                        speed,
                    ));
                }
            }
        }

        let first_road = grid.river_end + 2;
        let last_road = grid.height.saturating_sub(3);
        for (lane, row) in (first_road..=last_road).enumerate() {
            let direction = if lane % 2 == 0 { -1.0 } else { 1.0 };
            let speed = f64::from(rng.gen_range(2..=6_u32)) * direction;
            let length = if rng.gen_bool(0.2) { 2 } else { 1 };
            for col in lane_slots(&mut rng, grid.width, length, 2..=4) {
                obstacles.push(Obstacle::vehicle(
                    row as i32,
                    col as f64 * tile,
                    length as f64 * tile,
                    speed,
                ));
            }
        }

        let goal_row = grid.river_start.saturating_sub(1) as i32;
        let mut goals: Vec<Position> = (1..grid.width.saturating_sub(1))
            .step_by(2)
            .map(|col| Position::new(col as i32, goal_row))
            .collect();
        if goals.is_empty() {
            goals.push(Position::new(0, goal_row));
        }

        Level {
            obstacles,
            spawn: Position::new(
                (grid.width / 2) as i32,
                grid.height.saturating_sub(2) as i32,
            ),
            goals,
        }
    }
}

/// Left columns of objects `length` tiles long separated by random gaps.
fn lane_slots(
    rng: &mut StdRng,
    width: usize,
    length: usize,
    gaps: RangeInclusive<usize>,
) -> Vec<usize> {
    let mut slots = Vec::new();
    let mut col = rng.gen_range(0..=2);
    while col < width {
        slots.push(col);
        col += length + rng.gen_range(gaps.clone());
    }
    slots
}

/// The live obstacle field. Owns the tick counter.
#[derive(Debug, Clone)]
pub struct World {
    grid: GridConfig,
    obstacles: Vec<Obstacle>,
    tick: u64,
}

impl World {
    pub fn new(grid: GridConfig, obstacles: Vec<Obstacle>) -> Self {
        World {
            grid,
            obstacles,
            tick: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.obstacles, self.tick)
    }

    /// Advances every obstacle by one tick. Objects that drift fully off one
    /// edge re-enter from the other; dive-capable turtles toggle whenever
    /// the counter reaches a multiple of their period.
    pub fn step(&mut self) {
        let screen = self.grid.screen_width();
        self.tick += 1;

        for obstacle in &mut self.obstacles {
            obstacle.span = obstacle.span.shifted(obstacle.velocity);
            let cycle = screen + obstacle.span.width();
            if obstacle.velocity > 0.0 && obstacle.span.left >= screen {
                obstacle.span = obstacle.span.shifted(-cycle);
            } else if obstacle.velocity < 0.0 && obstacle.span.right <= 0.0 {
                obstacle.span = obstacle.span.shifted(cycle);
            }

            if let ObstacleKind::Submersible(dive) = &mut obstacle.kind {
                if dive.toggles_at(self.tick) {
                    dive.submerged = !dive.submerged;
                }
            }
        }
    }
}

/// One row of the planner comparison.
#[derive(Debug, Clone)]
pub struct PlannerResult {
    pub name: String,
    pub statistics: Statistics,
    pub timing_data: TimingData,
}

/// Drives one planner through a level, tick by tick.
pub struct Simulation {
    config: Config,
    grid: GridConfig,
    world: World,
    agent: Agent,
    goals: Vec<Position>,
    planner: Box<dyn Planner>,
}

impl Simulation {
    /// Builds a simulation from CLI settings, generating the level from
    /// `config.seed` or a random seed.
    ///
    /// # Returns
    ///
    /// `ConfigError` for invalid geometry or when `config.planner` is `all`.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let grid = config.grid_config()?;
        let planner = planner_for(config.planner, config.horizon)
            .ok_or_else(|| ConfigError::NotSinglePlanner(config.planner.to_string()))?;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("generating level with seed {}", seed);
        let level = Level::generate(&grid, config.dive_period, seed);
        Ok(Self::with_level(config, grid, level, planner))
    }

    /// Builds a simulation around an existing level and planner.
    pub fn with_level(
        config: Config,
        grid: GridConfig,
        level: Level,
        planner: Box<dyn Planner>,
    ) -> Self {
        Simulation {
            world: World::new(grid.clone(), level.obstacles),
            agent: Agent::new(level.spawn),
            goals: level.goals,
            planner,
            grid,
            config,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn planner_name(&self) -> &'static str {
        self.planner.name()
    }

    /// Runs `config.ticks` ticks, rendering each one unless visualization
    /// is disabled.
    ///
    /// # Returns
    ///
    /// Outcome counters and per-call planning times.
    pub fn run(&mut self) -> (Statistics, TimingData) {
        let mut stats = Statistics::new();
        let mut timing = TimingData::new();

        if !self.config.no_visualization {
            self.render(&stats);
        }

        for _ in 0..self.config.ticks {
            self.step(&mut stats, &mut timing);

            if !self.config.no_visualization {
                self.render(&stats);
            }
        }

        (stats, timing)
    }

    /// One controller tick: plan if needed, let the world move, advance the
    /// agent one plan step, then judge where it stands.
    pub fn step(&mut self, stats: &mut Statistics, timing: &mut TimingData) {
        if self.agent.needs_plan() {
            self.replan(stats, timing);
        }

        self.world.step();

        let before = self.agent.position;
        match self.agent.advance() {
            Some(next) if next != before => stats.moves += 1,
            _ => stats.waits += 1,
        }
        stats.ticks += 1;

        let snapshot = self.world.snapshot();
        let oracle = SafetyOracle::new(&self.grid, &snapshot);
        if !oracle.is_safe(self.agent.position, 0) {
            info!(
                "agent died at {} on tick {}",
                self.agent.position,
                self.world.tick()
            );
            stats.deaths += 1;
            self.agent.die();
            self.agent.respawn();
        } else if self.reached_far_bank() {
            info!(
                "agent crossed at {} on tick {}",
                self.agent.position,
                self.world.tick()
            );
            stats.crossings += 1;
            self.agent.respawn();
        }
    }

    fn replan(&mut self, stats: &mut Statistics, timing: &mut TimingData) {
        let Some(goal) = choose_goal(self.agent.position, &self.goals) else {
            self.agent.hold();
            return;
        };

        let snapshot = self.world.snapshot();
        let started = Instant::now();
        let result = self
            .planner
            .plan(&self.grid, &snapshot, self.agent.position, goal);
        timing.plan_times.push(started.elapsed());
        stats.planning_calls += 1;

        match result {
            Ok(plan) => {
                debug!(
                    "{} planned {} moves from {} to {}",
                    self.planner.name(),
                    plan.moves(),
                    self.agent.position,
                    goal
                );
                self.agent.follow(plan);
            }
            Err(err) => {
                debug!("{}: {}, holding position", self.planner.name(), err);
                stats.failed_plans += 1;
                self.agent.hold();
            }
        }
    }

    fn reached_far_bank(&self) -> bool {
        self.goals
            .first()
            .is_some_and(|goal| self.agent.position.row <= goal.row)
    }

    fn render(&self, stats: &Statistics) {
        print!("\x1B[2J\x1B[1;1H");
        println!("=== CROSSING SIMULATION ===");
        println!(
            "Planner: {} | Tick: {} | Crossings: {} | Deaths: {}",
            self.planner.name(),
            self.world.tick(),
            stats.crossings,
            stats.deaths
        );
        println!("Agent position: {}", self.agent.position);
        let upcoming = self.agent.upcoming();
        if !upcoming.is_empty() {
            println!("Next moves: {:?}", &upcoming[..upcoming.len().min(3)]);
        }
        build_reactive(&self.grid, &self.world.snapshot())
            .print_grid(Some(self.agent.position), &self.goals);
        thread::sleep(Duration::from_millis(self.config.delay_ms));
    }

    /// Runs every concrete planner on the same seeded level.
    pub fn run_all_planners(config: Config) -> Result<Vec<PlannerResult>, ConfigError> {
        let grid = config.grid_config()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let level = Level::generate(&grid, config.dive_period, seed);

        println!(
            "Comparing {} planners on level seed {} ({} obstacles, {} ticks)",
            PlannerKind::CONCRETE.len(),
            seed,
            level.obstacles.len(),
            config.ticks
        );

        let mut results = Vec::new();
        for kind in PlannerKind::CONCRETE {
            let Some(planner) = planner_for(kind, config.horizon) else {
                continue;
            };
            let mut run_config = config.clone();
            run_config.planner = kind;
            run_config.no_visualization = true;

            let mut simulation =
                Simulation::with_level(run_config, grid.clone(), level.clone(), planner);
            let (statistics, timing_data) = simulation.run();
            if !config.quiet {
                println!(
                    "Completed: {} - crossings {}, deaths {}",
                    kind, statistics.crossings, statistics.deaths
                );
            }
            results.push(PlannerResult {
                name: kind.to_string(),
                statistics,
                timing_data,
            });
        }

        Ok(results)
    }

    /// Prints one table row per planner and names the best success rate.
    pub fn print_comparison_results(results: &[PlannerResult]) {
        println!("\n=== PLANNER COMPARISON RESULTS ===");
        println!(
            "{:<16} {:<10} {:<8} {:<10} {:<8} {:<14} {:<14}",
            "Planner", "Crossings", "Deaths", "Success", "Holds", "Avg Plan", "Slowest Plan"
        );
        println!("{}", "-".repeat(86));

        for result in results {
            println!(
                "{:<16} {:<10} {:<8} {:<10} {:<8} {:<14} {:<14}",
                result.name,
                result.statistics.crossings,
                result.statistics.deaths,
                format!("{:.1}%", result.statistics.success_rate() * 100.0),
                result.statistics.failed_plans,
                format!("{:.2?}", result.timing_data.average_plan_time()),
                format!("{:.2?}", result.timing_data.max_plan_time()),
            );
        }

        let best = results.iter().max_by(|a, b| {
            a.statistics
                .success_rate()
                .total_cmp(&b.statistics.success_rate())
                .then_with(|| a.statistics.crossings.cmp(&b.statistics.crossings))
        });
        if let Some(best) = best {
            println!();
            println!(
                "Best by success rate: {} ({:.1}%)",
                best.name,
                best.statistics.success_rate() * 100.0
            );
        }
    }
}
