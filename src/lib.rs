pub mod agent;
pub mod algorithms;
pub mod config;
pub mod error;
pub mod grid;
pub mod grid_builder;
pub mod obstacle;
pub mod oracle;
pub mod simulation;
pub mod snapshot;
pub mod statistics;
