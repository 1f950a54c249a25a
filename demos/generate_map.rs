//! Example: Generate a settlement map
//!
//! Demonstrates the basic usage of the generation pipeline.
//! Run with `RUST_LOG=settlement_gen=debug` to see every attempt.

use settlement_gen::*;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::from_default_env()
        .add_directive("settlement_gen=info".parse().expect("valid directive"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Settlement Map Generation Example");
    println!("=================================\n");

    let config = MapConfigBuilder::new()
        .seed(42)
        .town_count(12)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Map: {}x{}", config.width, config.height);
    println!("  Towns: {}", config.town_count);
    println!("  Strategy: {}", config.strategy.name());
    println!("  Max road length: {}", config.max_road_length);
    println!();

    println!("Generating map...");
    let map = SettlementMap::generate(config).expect("Failed to generate map");
    println!(
        "Accepted after {} attempt(s): {} towns, {} roads\n",
        map.attempts(),
        map.town_count(),
        map.road_total()
    );

    println!("Towns:");
    for town in map.towns() {
        println!(
            "  Town {:>2}{}: ({:>4}, {:>4}) pop={:<5} {:<13} roads={}",
            town.id,
            if town.is_main { "*" } else { " " },
            town.position.x,
            town.position.y,
            town.population,
            town.archetype.name(),
            map.road_count(town.id)
        );
    }

    println!("\nRoads:");
    for (a, b) in map.roads() {
        let length = map.towns()[a].distance_to(&map.towns()[b]);
        println!("  {a:>2} - {b:<2} length {length:.1}");
    }

    println!("\nGeneration complete!");
}
