//! Moving hazards and platforms, and their constant-velocity projection.

/// Horizontal pixel interval `[left, right)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpan {
    pub left: f64,
    pub right: f64,
}

impl PixelSpan {
    pub const fn new(left: f64, right: f64) -> Self {
        PixelSpan { left, right }
    }

    /// Extent in pixels.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Finite bounds with a positive width.
    pub fn is_valid(&self) -> bool {
        self.left.is_finite() && self.right.is_finite() && self.right > self.left
    }

    /// The same span moved `dx` pixels to the right.
    pub fn shifted(&self, dx: f64) -> PixelSpan {
        PixelSpan::new(self.left + dx, self.right + dx)
    }

    /// Half-open overlap; spans that merely touch do not overlap.
    pub fn overlaps(&self, other: &PixelSpan) -> bool {
        self.left < other.right && self.right > other.left
    }

    /// First and last tile column covered by the span.
    ///
    /// The right edge is exclusive, so a span ending exactly on a tile
    /// boundary does not claim the next column.
    pub fn columns(&self, tile: f64) -> Option<(i32, i32)> {
        if !self.is_valid() || tile <= 0.0 {
            return None;
        }
        let first = (self.left / tile).floor();
        let last = (self.right / tile).ceil() - 1.0;
        Some((first as i32, last as i32))
    }
}

/// Periodic dive state of a submersible platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dive {
    pub can_dive: bool,
    pub submerged: bool,
    pub period: u32,
}

impl Dive {
    /// Whether the platform changes state when the tick counter reaches `tick`.
    pub fn toggles_at(&self, tick: u64) -> bool {
        self.can_dive && self.period > 0 && tick > 0 && tick % u64::from(self.period) == 0
    }

    /// Submerged state `delta` ticks after `tick`, counting the toggles in
    /// `(tick, tick + delta]`.
    pub fn submerged_after(&self, delta: u32, tick: u64) -> bool {
        if !self.can_dive || self.period == 0 {
            return self.submerged;
        }
        let period = u64::from(self.period);
        let toggles = (tick + u64::from(delta)) / period - tick / period;
        self.submerged ^ (toggles % 2 == 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleKind {
    Vehicle,
    Platform,
    Submersible(Dive),
}

/// One moving object on a tile-aligned row.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub row: i32,
    pub span: PixelSpan,
    /// Signed horizontal speed in pixels per tick.
    pub velocity: f64,
    pub kind: ObstacleKind,
}

/// Where an obstacle will be, and whether it can carry the agent, some ticks
/// into the future.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub row: i32,
    pub span: PixelSpan,
    pub submerged: bool,
}

impl Obstacle {
    /// A hazard occupying `width` pixels from `left` on `row`.
    pub fn vehicle(row: i32, left: f64, width: f64, velocity: f64) -> Self {
        Obstacle {
            row,
            span: PixelSpan::new(left, left + width),
            velocity,
            kind: ObstacleKind::Vehicle,
        }
    }

    /// A log the agent can stand on while crossing the river.
    pub fn platform(row: i32, left: f64, width: f64, velocity: f64) -> Self {
        Obstacle {
            row,
            span: PixelSpan::new(left, left + width),
            velocity,
            kind: ObstacleKind::Platform,
        }
    }

    /// A turtle group; starts afloat and, if `can_dive`, toggles every
    /// `period` ticks.
    pub fn submersible(
        row: i32,
        left: f64,
        width: f64,
        velocity: f64,
        can_dive: bool,
        period: u32,
    ) -> Self {
        Obstacle {
            row,
            span: PixelSpan::new(left, left + width),
            velocity,
            kind: ObstacleKind::Submersible(Dive {
                can_dive,
                submerged: false,
                period,
            }),
        }
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self.kind, ObstacleKind::Vehicle)
    }

    /// Logs and diving turtles; anything the agent may stand on when afloat.
    pub fn is_platform(&self) -> bool {
        matches!(
            self.kind,
            ObstacleKind::Platform | ObstacleKind::Submersible(_)
        )
    }

    /// Obstacles with a degenerate span or velocity contribute no occupancy.
    pub fn is_well_formed(&self) -> bool {
        self.span.is_valid() && self.velocity.is_finite()
    }

    pub fn is_submerged(&self) -> bool {
        match self.kind {
            ObstacleKind::Submersible(dive) => dive.submerged,
            ObstacleKind::Vehicle | ObstacleKind::Platform => false,
        }
    }

    /// Pixel extent at the snapshot tick.
    pub fn occupied_span(&self) -> PixelSpan {
        self.span
    }

    pub fn projected_span(&self, delta: u32) -> PixelSpan {
        self.span.shifted(self.velocity * f64::from(delta))
    }

    /// Constant-velocity extrapolation `delta` ticks after `tick`. Pure.
    pub fn project(&self, delta: u32, tick: u64) -> Projection {
        let submerged = match self.kind {
            ObstacleKind::Submersible(dive) => dive.submerged_after(delta, tick),
            ObstacleKind::Vehicle | ObstacleKind::Platform => false,
        };
        Projection {
            row: self.row,
            span: self.projected_span(delta),
            submerged,
        }
    }

    /// Whether this obstacle, projected `delta` ticks ahead, is a dry surface.
    pub fn supports_agent(&self, delta: u32, tick: u64) -> bool {
        self.is_platform() && !self.project(delta, tick).submerged
    }
}
