use clap::Parser;

use std::time::Duration;
use viewport_pathfinding::config::Config;
use viewport_pathfinding::simulation::Simulation;

fn main() {
    env_logger::init();
    let config = Config::parse();

    println!("Starting viewport pathfinding simulation...");
    println!("World size: {}x{}", config.world_size, config.world_size);
    println!(
        "Viewport: {}x{}, camera speed {}",
        config.view_width, config.view_height, config.camera_speed
    );
    println!(
        "Obstacles: {}, Agents: {}, Frames: {}",
        config.num_obstacles, config.num_agents, config.frames
    );
    if let Some(seed) = config.seed {
        println!("Seed: {}", seed);
    }
    println!();

    let mut simulation = match Simulation::new(config.clone()) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let (stats, pathfinder_stats, timing_data) = simulation.run();

    println!("\n=== FINAL RESULTS ===");
    println!("Seed: {}", simulation.environment().seed);
    println!("{}", stats);
    println!("{}", pathfinder_stats);

    println!("\n=== TIMING ANALYSIS ===");
    println!("Grid resyncs: {}", timing_data.resync_times.len());
    println!(
        "Average resync time: {:.2?}",
        timing_data.average_resync_time()
    );
    println!("Total pathfinding calls: {}", timing_data.total_calls());
    println!(
        "Average find_path time: {:.2?}",
        timing_data.average_find_path_time()
    );

    if timing_data.total_calls() > 0 {
        let total_find_path_time: Duration = timing_data.find_path_times.iter().sum();
        println!(
            "Slowest find_path: {:.2?}",
            timing_data.max_find_path_time()
        );
        println!("Total time in find_path: {:.2?}", total_find_path_time);
    } else {
        println!("No agent was inside the grid long enough to ask for a path");
        println!("Try increasing --view-width/--view-height or --num-agents");
    }
}
