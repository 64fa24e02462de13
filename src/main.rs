use clap::Parser;

use crossing_planner::config::{Config, PlannerKind};
use crossing_planner::simulation::Simulation;

fn main() {
    env_logger::init();
    let config = Config::parse();

    if !config.quiet {
        println!("Starting crossing simulation...");
        println!(
            "Screen: {}x{} px, tile {} px, river rows {}..={}",
            config.screen_width,
            config.screen_height,
            config.tile_size,
            config.river_start,
            config.river_end
        );
        println!("Planner: {} | Horizon: {} ticks", config.planner, config.horizon);
        if config.no_visualization {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
            println!("Press Ctrl+C to stop the simulation");
        }
        println!();
    }

    if config.planner == PlannerKind::All {
        match Simulation::run_all_planners(config) {
            Ok(results) => Simulation::print_comparison_results(&results),
            Err(e) => {
                eprintln!("Error running all planners: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (stats, timing_data) = simulation.run();

    println!("\n=== FINAL RESULTS ===");
    println!("Planner: {}", simulation.planner_name());
    println!("{}", stats);
    println!("=== TIMING ANALYSIS ===");
    println!("{}", timing_data);
}
