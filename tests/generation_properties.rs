//! Properties every accepted map must have, checked over many seeds

use settlement_gen::generation::{is_planar, passes_through_town, segments_cross};
use settlement_gen::*;

fn assert_valid_map(map: &SettlementMap) {
    let config = map.config();
    let towns = map.towns();
    let graph = map.graph();

    // Exactly one hub, ids match indices
    assert_eq!(towns.iter().filter(|t| t.is_main).count(), 1);
    assert!(towns[map.hub()].is_main);
    for (i, town) in towns.iter().enumerate() {
        assert_eq!(town.id, i);
    }

    // Placement invariants
    for (i, a) in towns.iter().enumerate() {
        assert!(a.position.x >= config.border_margin);
        assert!(a.position.x <= config.width - config.border_margin);
        assert!(a.position.y >= config.border_margin);
        assert!(a.position.y <= config.height - config.border_margin);
        for b in &towns[..i] {
            let delta = (a.position - b.position).abs();
            assert!(
                delta.x >= config.town_separation || delta.y >= config.town_separation,
                "towns {} and {} too close",
                a.id,
                b.id
            );
        }
    }

    // Connected from the hub
    assert!(graph.is_connected_from(map.hub()));

    // Adjacency symmetry and degree bookkeeping
    for a in 0..towns.len() {
        assert_eq!(graph.road_count(a), graph.neighbors(a).count());
        for b in graph.neighbors(a) {
            assert!(graph.has_road(b, a));
        }
    }

    // Length and pass-through limits
    let roads = map.roads();
    for &(a, b) in &roads {
        assert!(towns[a].distance_to(&towns[b]) <= config.max_road_length);
        assert!(!passes_through_town(towns, a, b, config.road_exclusion));
    }

    // Planarity, checked pairwise here rather than through the gate
    assert!(is_planar(towns, graph));
    for (i, &(a, b)) in roads.iter().enumerate() {
        for &(c, d) in &roads[i + 1..] {
            if a == c || a == d || b == c || b == d {
                continue;
            }
            assert!(
                !segments_cross(
                    towns[a].position,
                    towns[b].position,
                    towns[c].position,
                    towns[d].position
                ),
                "roads {a}-{b} and {c}-{d} cross"
            );
        }
    }
}

#[test]
fn test_delaunay_maps_over_many_seeds() {
    for seed in 0..25 {
        let config = MapConfigBuilder::new().seed(seed).build().unwrap();
        let map = SettlementMap::generate(config).unwrap();
        assert_valid_map(&map);
    }
}

#[test]
fn test_delaunay_maps_with_varied_sizes() {
    for (seed, towns, width, height) in [(1, 1, 1200, 800), (3, 3, 400, 300), (4, 8, 800, 600), (5, 20, 1200, 800)] {
        let config = MapConfigBuilder::new()
            .seed(seed)
            .size(width, height)
            .unwrap()
            .town_count(towns)
            .unwrap()
            .build()
            .unwrap();
        let map = SettlementMap::generate(config).unwrap();
        assert_eq!(map.town_count(), towns);
        assert_valid_map(&map);
    }
}

#[test]
fn test_random_strategy_small_maps() {
    for seed in 0..5 {
        let config = MapConfigBuilder::new()
            .seed(seed)
            .size(600, 400)
            .unwrap()
            .town_count(5)
            .unwrap()
            .max_road_length(1000.0)
            .unwrap()
            .road_exclusion(5.0)
            .unwrap()
            .strategy(GenerationStrategy::Random)
            .build()
            .unwrap();
        let map = SettlementMap::generate(config).unwrap();
        assert_valid_map(&map);
    }
}

#[test]
fn test_same_seed_same_map() {
    let build = || {
        let config = MapConfigBuilder::new().seed(99).town_count(15).unwrap().build().unwrap();
        SettlementMap::generate(config).unwrap()
    };
    let (a, b) = (build(), build());
    assert_eq!(a.towns(), b.towns());
    assert_eq!(a.roads(), b.roads());
}

#[test]
fn test_different_seeds_differ() {
    let generate = |seed| {
        let config = MapConfigBuilder::new().seed(seed).build().unwrap();
        SettlementMap::generate(config).unwrap()
    };
    let (a, b) = (generate(10), generate(11));
    assert_ne!(a.towns(), b.towns());
}

#[test]
fn test_every_town_routes_to_hub() {
    for seed in 0..10 {
        let config = MapConfigBuilder::new().seed(seed).build().unwrap();
        let map = SettlementMap::generate(config).unwrap();
        for route in map.routes_to_hub() {
            let route = route.expect("accepted maps are connected");
            assert_eq!(route.towns.last(), Some(&map.hub()));
            assert!(route.cost >= 0.0);
        }
    }
}

#[test]
fn test_overfull_map_reports_placement_failure() {
    let config = MapConfigBuilder::new()
        .seed(3)
        .size(200, 200)
        .unwrap()
        .border_margin(50)
        .unwrap()
        .town_separation(150)
        .unwrap()
        .town_count(30)
        .unwrap()
        .max_attempts(5)
        .unwrap()
        .build()
        .unwrap();

    match SettlementMap::generate(config) {
        Err(SettlementError::PlacementFailure { attempts, .. }) => assert_eq!(attempts, 100),
        other => panic!("expected placement failure, got {other:?}"),
    }
}

#[test]
fn test_unimplemented_strategy_is_an_error() {
    let config = MapConfigBuilder::new()
        .seed(0)
        .strategy(GenerationStrategy::Hubs)
        .build()
        .unwrap();
    assert!(matches!(
        SettlementMap::generate(config),
        Err(SettlementError::UnsupportedStrategy(GenerationStrategy::Hubs))
    ));
}
