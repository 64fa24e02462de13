use crate::error::ConfigError;
use crate::grid::Position;
use crate::obstacle::PixelSpan;
use clap::{Parser, ValueEnum};
use std::fmt;

/// Ticks between two dive toggles of a dive-capable submersible platform.
pub const DEFAULT_DIVE_PERIOD: u32 = 50;

/// Fixed playfield geometry shared by the grid builder, the oracle and the
/// searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub tile_size: u32,
    pub width: usize,
    pub height: usize,
    pub river_start: usize,
    pub river_end: usize,
}

impl GridConfig {
    pub fn new(
        tile_size: u32,
        width: usize,
        height: usize,
        river_start: usize,
        river_end: usize,
    ) -> Result<Self, ConfigError> {
        if tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        if river_start > river_end {
            return Err(ConfigError::EmptyRiver {
                start: river_start,
                end: river_end,
            });
        }
        if river_end >= height {
            return Err(ConfigError::RiverOutOfBounds {
                end: river_end,
                height,
            });
        }

        Ok(GridConfig {
            tile_size,
            width,
            height,
            river_start,
            river_end,
        })
    }

    /// Derives the tile dimensions from a pixel extent; partial tiles are dropped.
    pub fn from_screen(
        screen_width: u32,
        screen_height: u32,
        tile_size: u32,
        river_start: usize,
        river_end: usize,
    ) -> Result<Self, ConfigError> {
        if tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        Self::new(
            tile_size,
            (screen_width / tile_size) as usize,
            (screen_height / tile_size) as usize,
            river_start,
            river_end,
        )
    }

    pub fn tile(&self) -> f64 {
        f64::from(self.tile_size)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.width
            && (pos.row as usize) < self.height
    }

    pub fn contains_row(&self, row: i32) -> bool {
        row >= 0 && (row as usize) < self.height
    }

    pub fn is_river_row(&self, row: i32) -> bool {
        row >= 0 && (self.river_start..=self.river_end).contains(&(row as usize))
    }

    /// Pixel extent of a tile column, right edge exclusive.
    pub fn cell_span(&self, col: i32) -> PixelSpan {
        let tile = self.tile();
        PixelSpan::new(f64::from(col) * tile, f64::from(col + 1) * tile)
    }

    pub fn screen_width(&self) -> f64 {
        self.width as f64 * self.tile()
    }
}

impl Default for GridConfig {
    /// The classic 350x400 playfield with 25 px tiles and a five-row river.
    fn default() -> Self {
        GridConfig {
            tile_size: 25,
            width: 14,
            height: 16,
            river_start: 3,
            river_end: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlannerKind {
    /// Grid A* on the current occupancy
    Reactive,
    /// Grid A* on the occupancy one tick ahead
    Predictive,
    /// Grid A* on the union of now and one tick ahead
    Conservative,
    /// A* over (column, row, time) against the safety oracle
    SpatioTemporal,
    /// Run every planner on the same level and compare
    All,
}

impl PlannerKind {
    pub const CONCRETE: [PlannerKind; 4] = [
        PlannerKind::Reactive,
        PlannerKind::Predictive,
        PlannerKind::Conservative,
        PlannerKind::SpatioTemporal,
    ];
}

impl fmt::Display for PlannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlannerKind::Reactive => "reactive",
            PlannerKind::Predictive => "predictive",
            PlannerKind::Conservative => "conservative",
            PlannerKind::SpatioTemporal => "spatio-temporal",
            PlannerKind::All => "all",
        };
        f.write_str(name)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 350)]
    pub screen_width: u32,

    #[arg(long, default_value_t = 400)]
    pub screen_height: u32,

    #[arg(long, default_value_t = 25)]
    pub tile_size: u32,

    #[arg(long, default_value_t = 3)]
    pub river_start: usize,

    #[arg(long, default_value_t = 7)]
    pub river_end: usize,

    #[arg(long, value_enum, default_value_t = PlannerKind::SpatioTemporal)]
    pub planner: PlannerKind,

    /// Look-ahead limit of the spatio-temporal search, in ticks
    #[arg(long, default_value_t = 100)]
    pub horizon: u32,

    #[arg(long, default_value_t = DEFAULT_DIVE_PERIOD)]
    pub dive_period: u32,

    /// Simulation length in ticks
    #[arg(long, default_value_t = 500)]
    pub ticks: u64,

    /// Level seed; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    pub fn grid_config(&self) -> Result<GridConfig, ConfigError> {
        GridConfig::from_screen(
            self.screen_width,
            self.screen_height,
            self.tile_size,
            self.river_start,
            self.river_end,
        )
    }
}
