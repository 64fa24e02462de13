//! Rasterizes an obstacle snapshot into occupancy grids.

use crate::config::GridConfig;
use crate::grid::{Cell, OccupancyGrid, Position};
use crate::obstacle::{Obstacle, PixelSpan};
use crate::snapshot::Snapshot;
use log::warn;

/// Occupancy `delta` ticks after the snapshot was taken.
///
/// River rows start blocked. Afloat platforms clear the cells they cover, then
/// vehicles block theirs, so a vehicle always wins a shared cell.
///
/// # Arguments
///
/// * `config` - Playfield geometry.
/// * `snapshot` - The obstacles to project.
/// * `delta` - Tick offset from the snapshot.
///
/// # Returns
///
/// A fresh `width x height` grid; obstacles are clamped to its columns.
pub fn build_grid(config: &GridConfig, snapshot: &Snapshot, delta: u32) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(config.width, config.height);

    for row in config.river_start..=config.river_end {
        grid.fill_row(row, Cell::Blocked);
    }

    for platform in snapshot.platforms() {
        if !is_paintable(config, platform) {
            continue;
        }
        let projection = platform.project(delta, snapshot.tick());
        if projection.submerged {
            continue;
        }
        paint(config, &mut grid, projection.row, &projection.span, Cell::Safe);
    }

    for vehicle in snapshot.vehicles() {
        if !is_paintable(config, vehicle) {
            continue;
        }
        let projection = vehicle.project(delta, snapshot.tick());
        paint(config, &mut grid, projection.row, &projection.span, Cell::Blocked);
    }

    grid
}

/// Occupancy at the snapshot tick.
pub fn build_reactive(config: &GridConfig, snapshot: &Snapshot) -> OccupancyGrid {
    build_grid(config, snapshot, 0)
}

/// Occupancy one tick after the snapshot.
pub fn build_predictive(config: &GridConfig, snapshot: &Snapshot) -> OccupancyGrid {
    build_grid(config, snapshot, 1)
}

/// A cell is blocked if it is blocked now or will be on the next tick.
pub fn merge_conservative(now: &OccupancyGrid, next: &OccupancyGrid) -> OccupancyGrid {
    now.union(next)
}

/// Reactive and predictive slices merged with [`merge_conservative`].
pub fn build_conservative(config: &GridConfig, snapshot: &Snapshot) -> OccupancyGrid {
    merge_conservative(
        &build_reactive(config, snapshot),
        &build_predictive(config, snapshot),
    )
}

fn is_paintable(config: &GridConfig, obstacle: &Obstacle) -> bool {
    if !obstacle.is_well_formed() || !config.contains_row(obstacle.row) {
        warn!(
            "ignoring malformed obstacle on row {} spanning {:?}",
            obstacle.row, obstacle.span
        );
        return false;
    }
    true
}

fn paint(config: &GridConfig, grid: &mut OccupancyGrid, row: i32, span: &PixelSpan, cell: Cell) {
    let Some((first, last)) = span.columns(config.tile()) else {
        return;
    };
    let first = first.max(0);
    let last = last.min(config.width as i32 - 1);
    for col in first..=last {
        grid.set(Position::new(col, row), cell);
    }
}
