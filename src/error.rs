use crate::grid::Position;
use thiserror::Error;

/// Failure of a single planning call.
///
/// Both variants are recoverable: the caller holds position for a tick and
/// plans again from a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("no path from {start} to {goal}")]
    NoPathFound { start: Position, goal: Position },

    #[error("no path from {start} to {goal} within {horizon} ticks")]
    HorizonExhausted {
        start: Position,
        goal: Position,
        horizon: u32,
    },
}

impl PlanError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            PlanError::NoPathFound { .. } | PlanError::HorizonExhausted { .. } => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tile size must be greater than zero")]
    ZeroTileSize,

    #[error("grid of {width}x{height} tiles has no cells")]
    EmptyGrid { width: usize, height: usize },

    #[error("river rows {start}..={end} are empty")]
    EmptyRiver { start: usize, end: usize },

    #[error("river row {end} lies outside a grid of {height} rows")]
    RiverOutOfBounds { end: usize, height: usize },

    #[error("planner `{0}` cannot drive a single simulation")]
    NotSinglePlanner(String),
}
