pub mod a_star;
pub mod common;
pub mod spatio_temporal;

use crate::config::PlannerKind;
use a_star::{GridMode, GridPlanner};
use common::Planner;
use spatio_temporal::SpatioTemporalPlanner;

/// Builds the planner for a concrete kind; `All` is a driver concern and has
/// no planner of its own.
pub fn planner_for(kind: PlannerKind, horizon: u32) -> Option<Box<dyn Planner>> {
    match kind {
        PlannerKind::Reactive => Some(Box::new(GridPlanner::new(GridMode::Reactive))),
        PlannerKind::Predictive => Some(Box::new(GridPlanner::new(GridMode::Predictive))),
        PlannerKind::Conservative => Some(Box::new(GridPlanner::new(GridMode::Conservative))),
        PlannerKind::SpatioTemporal => Some(Box::new(SpatioTemporalPlanner::new(horizon))),
        PlannerKind::All => None,
    }
}
