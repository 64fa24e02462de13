use crate::config::GridConfig;
use crate::grid::{Position, TimedPosition};
use crate::snapshot::Snapshot;

/// Answers whether a tile is safe at a tick offset without building a grid.
///
/// Every query projects the snapshot from scratch, so queries may arrive in
/// any order.
#[derive(Debug, Clone, Copy)]
pub struct SafetyOracle<'a> {
    config: &'a GridConfig,
    snapshot: &'a Snapshot,
}

impl<'a> SafetyOracle<'a> {
    /// Creates an oracle answering queries about `snapshot`.
    pub fn new(config: &'a GridConfig, snapshot: &'a Snapshot) -> Self {
        SafetyOracle { config, snapshot }
    }

    /// Whether the agent survives standing on `pos` `delta` ticks after the
    /// snapshot.
    ///
    /// # Returns
    ///
    /// `true` when `pos` lies inside the playfield, no vehicle projected
    /// `delta` ticks ahead overlaps it, and, on a river row, an afloat
    /// platform does.
    pub fn is_safe(&self, pos: Position, delta: u32) -> bool {
        if !self.config.contains(pos) {
            return false;
        }

        let cell = self.config.cell_span(pos.col);
        let tick = self.snapshot.tick();

        let hit_by_vehicle = self
            .snapshot
            .vehicles()
            .filter(|vehicle| vehicle.is_well_formed() && vehicle.row == pos.row)
            .any(|vehicle| vehicle.projected_span(delta).overlaps(&cell));
        if hit_by_vehicle {
            return false;
        }

        if self.config.is_river_row(pos.row) {
            return self
                .snapshot
                .platforms()
                .filter(|platform| platform.is_well_formed() && platform.row == pos.row)
                .any(|platform| {
                    let projection = platform.project(delta, tick);
                    !projection.submerged && projection.span.overlaps(&cell)
                });
        }

        true
    }

    /// Same query keyed by a time-expanded state.
    pub fn is_safe_at(&self, state: TimedPosition) -> bool {
        self.is_safe(state.position(), state.time)
    }
}
