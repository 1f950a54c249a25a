//! Complete workflow demonstration for settlement_gen

use std::collections::HashMap;

use settlement_gen::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== settlement_gen Complete Demo ===\n");

    // Step 1: Configure map
    println!("Step 1: Configuring map...");
    let config = MapConfigBuilder::new()
        .seed(12345)
        .size(1000, 700)?
        .town_count(14)?
        .max_road_length(320.0)?
        .build()?;

    println!("  Seed: {}", config.seed);
    println!("  Size: {}x{}", config.width, config.height);
    println!("  Strategy: {}", config.strategy.name());

    // Step 2: Generate map
    println!("\nStep 2: Generating map...");
    let mut map = SettlementMap::generate(config)?;
    println!(
        "  {} towns, {} roads, {} attempt(s)",
        map.town_count(),
        map.road_total(),
        map.attempts()
    );

    // Step 3: Archetype mix
    println!("\nStep 3: Archetype distribution:");
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for town in map.towns() {
        *counts.entry(town.archetype.name()).or_insert(0) += 1;
    }
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort();
    for (name, count) in sorted {
        println!("  {name}: {count}");
    }

    // Step 4: Routes to the hub
    println!("\nStep 4: Routes to hub (town {}):", map.hub());
    for (id, route) in map.routes_to_hub().iter().enumerate() {
        match route {
            Some(route) => println!(
                "  {:>2}: {:?} cost {:.2} over {} hop(s)",
                id,
                route.towns,
                route.cost,
                route.hops()
            ),
            None => println!("  {id:>2}: unreachable"),
        }
    }

    // Step 5: Pointer hit-testing
    println!("\nStep 5: Hit-testing:");
    let probe = map.towns()[1].point() + DVec2::new(3.0, -4.0);
    match map.find_town_at(probe, 10.0) {
        Some(id) => println!("  ({:.0}, {:.0}) -> town {}", probe.x, probe.y, id),
        None => println!("  ({:.0}, {:.0}) -> nothing", probe.x, probe.y),
    }

    // Step 6: Liveness and render data
    println!("\nStep 6: Render data:");
    map.set_alive(map.town_count() - 1, false)?;
    let scene = build_scene(&map, &ArchetypeColorMapper);
    let dead = scene
        .markers
        .iter()
        .filter(|m| m.kind == MarkerKind::Dead)
        .count();
    println!("  Markers: {} ({} dead)", scene.marker_count(), dead);
    println!("  Road lines: {}", scene.road_count());

    println!("\n=== Demo Complete ===");
    Ok(())
}
