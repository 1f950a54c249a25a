//! Road network construction
//!
//! Two interchangeable wiring strategies share the [`RoadWiring`] seam:
//!
//! - [`DelaunayWiring`] filters a Delaunay triangulation of the towns and
//!   thins it at random.
//! - [`RandomWiring`] rebuilds random graphs from scratch until one passes,
//!   within an explicit cycle and wall-clock budget.
//!
//! Both report a plain success flag. Whatever they produce must still pass
//! [`accepts`] before the orchestrator keeps it.

use std::time::Instant;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::config::MapConfig;
use crate::graph::RoadGraph;
use crate::town::Town;

use super::delaunay::delaunay_edges;
use super::geometry::{crosses_any, is_planar, passes_through_town, within_max_length};

/// Trait for strategies that wire roads between placed towns
pub trait RoadWiring {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Replace the contents of `graph` with a road network over `towns`
    ///
    /// Returns `true` if the strategy considers the network acceptable.
    /// On `false` the caller discards the towns rather than repairing roads.
    fn wire<R: Rng + ?Sized>(
        &self,
        towns: &[Town],
        hub: usize,
        graph: &mut RoadGraph,
        rng: &mut R,
    ) -> bool;
}

/// Final acceptance gate shared by every strategy
///
/// A network is accepted when it is connected from `hub`, no two roads
/// cross, every road is within the length limit and no road passes within
/// the exclusion distance of a town it does not connect.
pub fn accepts(
    towns: &[Town],
    graph: &RoadGraph,
    hub: usize,
    max_road_length: f64,
    road_exclusion: f64,
) -> bool {
    graph.len() == towns.len()
        && graph.is_connected_from(hub)
        && graph.roads().into_iter().all(|(a, b)| {
            within_max_length(&towns[a], &towns[b], max_road_length)
                && !passes_through_town(towns, a, b, road_exclusion)
        })
        && is_planar(towns, graph)
}

/// Remove one random road touching `town`, if it has any
fn drop_random_road<R: Rng + ?Sized>(graph: &mut RoadGraph, town: usize, rng: &mut R) {
    let other = graph.neighbors(town).choose(rng);
    if let Some(other) = other {
        graph.remove_road(town, other);
    }
}

/// Filtered, thinned Delaunay triangulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaunayWiring {
    /// Longest road allowed
    pub max_road_length: f64,
    /// Minimum distance between a road and any third town
    pub road_exclusion: f64,
}

impl DelaunayWiring {
    /// Take the limits from a map configuration
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            max_road_length: config.max_road_length,
            road_exclusion: config.road_exclusion,
        }
    }

    /// Add every Delaunay edge that passes the length, exclusion and
    /// crossing filters, in ascending edge order
    pub fn add_filtered_edges(&self, towns: &[Town], graph: &mut RoadGraph) {
        let points: Vec<_> = towns.iter().map(Town::point).collect();

        for (a, b) in delaunay_edges(&points) {
            if !within_max_length(&towns[a], &towns[b], self.max_road_length) {
                continue;
            }
            if passes_through_town(towns, a, b, self.road_exclusion) {
                continue;
            }
            graph.add_road(a, b);
            if crosses_any(towns, graph, a, b) {
                graph.remove_road(a, b);
            }
        }
    }

    /// Remove one random road from roughly half the towns
    ///
    /// Towns are drawn independently with replacement, so a town may lose
    /// more than one road. Connectivity is not rechecked here.
    pub fn thin<R: Rng + ?Sized>(&self, towns: &[Town], graph: &mut RoadGraph, rng: &mut R) {
        let n = towns.len();
        if n == 0 {
            return;
        }
        for _ in 0..n / 2 {
            let town = rng.gen_range(0..n);
            drop_random_road(graph, town, rng);
        }
    }
}

impl RoadWiring for DelaunayWiring {
    fn name(&self) -> &'static str {
        "delaunay"
    }

    fn wire<R: Rng + ?Sized>(
        &self,
        towns: &[Town],
        hub: usize,
        graph: &mut RoadGraph,
        rng: &mut R,
    ) -> bool {
        graph.clear();
        self.add_filtered_edges(towns, graph);
        let candidates = graph.road_total();
        self.thin(towns, graph, rng);

        let connected = graph.is_connected_from(hub);
        let planar = is_planar(towns, graph);
        tracing::debug!(
            strategy = self.name(),
            candidates,
            kept = graph.road_total(),
            connected,
            planar,
            "wiring finished"
        );
        connected && planar
    }
}

/// Randomized from-scratch wiring
///
/// Each cycle clears the graph, gives every town a random target degree,
/// connects it to random towns, deletes a few roads at random and prunes
/// roads that pass too close to a third town or exceed the length limit.
/// The first cycle that reaches the road target with a connected, planar
/// graph wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWiring {
    /// Longest road allowed
    pub max_road_length: f64,
    /// Minimum distance between a road and any third town
    pub road_exclusion: f64,
    /// Rebuild cycles before giving up
    pub cycles: usize,
    /// Give up once this instant has passed
    pub deadline: Option<Instant>,
}

impl RandomWiring {
    /// Take the limits from a map configuration
    pub fn from_config(config: &MapConfig, deadline: Option<Instant>) -> Self {
        Self {
            max_road_length: config.max_road_length,
            road_exclusion: config.road_exclusion,
            cycles: config.random_cycles,
            deadline,
        }
    }

    /// Inclusive range the per-attempt road target is drawn from
    ///
    /// `n + 2 ..= 1.3 n`, clamped so it is never empty and never asks for
    /// more roads than a simple graph on `n` towns can hold.
    pub fn road_target_range(town_count: usize) -> (usize, usize) {
        let complete = town_count * town_count.saturating_sub(1) / 2;
        let low = (town_count + 2).min(complete);
        let high = ((town_count as f64 * 1.3) as usize).clamp(low, complete.max(low));
        (low, high)
    }

    /// One clear-build-delete-prune cycle; returns how many roads were built
    fn rebuild<R: Rng + ?Sized>(
        &self,
        towns: &[Town],
        graph: &mut RoadGraph,
        target: usize,
        deletions: usize,
        rng: &mut R,
    ) -> usize {
        let n = towns.len();
        graph.clear();

        let mut built = 0;
        for town in 0..n {
            let wanted: usize = if target.saturating_sub(built) >= 8 {
                rng.gen_range(3..=4)
            } else {
                rng.gen_range(1..=3)
            };
            let wanted = wanted.min(n - 1);

            while graph.road_count(town) < wanted {
                let other = rng.gen_range(0..n);
                if graph.add_road(town, other) {
                    built += 1;
                }
            }
        }

        for _ in 0..deletions {
            let town = rng.gen_range(0..n);
            drop_random_road(graph, town, rng);
        }

        for (a, b) in graph.roads() {
            if !within_max_length(&towns[a], &towns[b], self.max_road_length)
                || passes_through_town(towns, a, b, self.road_exclusion)
            {
                graph.remove_road(a, b);
            }
        }

        built
    }
}

impl RoadWiring for RandomWiring {
    fn name(&self) -> &'static str {
        "random"
    }

    fn wire<R: Rng + ?Sized>(
        &self,
        towns: &[Town],
        hub: usize,
        graph: &mut RoadGraph,
        rng: &mut R,
    ) -> bool {
        let n = towns.len();
        graph.clear();
        if n < 2 {
            return graph.is_connected_from(hub);
        }

        let (low, high) = Self::road_target_range(n);
        let target = rng.gen_range(low..=high);
        let max_deletions = ((n + 2) / 2).max(3);

        for cycle in 0..self.cycles {
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                tracing::debug!(strategy = self.name(), cycle, "wall-clock budget spent");
                return false;
            }

            let deletions = rng.gen_range(3..=max_deletions);
            let built = self.rebuild(towns, graph, target, deletions, rng);

            if built >= target && graph.is_connected_from(hub) && is_planar(towns, graph) {
                tracing::debug!(
                    strategy = self.name(),
                    cycle,
                    target,
                    kept = graph.road_total(),
                    "wiring finished"
                );
                return true;
            }
        }

        tracing::debug!(strategy = self.name(), cycles = self.cycles, "cycle budget spent");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::Archetype;
    use glam::IVec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn town(id: usize, x: i32, y: i32) -> Town {
        Town::new(id, IVec2::new(x, y), 100, vec![], Archetype::Basic, id == 0)
    }

    fn grid_towns() -> Vec<Town> {
        // 4x3 grid, jittered so no four points are cocircular
        let mut towns = Vec::new();
        for row in 0..3 {
            for col in 0..4 {
                let id = towns.len();
                let jitter = (id as i32 * 7) % 11;
                towns.push(town(id, 100 + col * 150 + jitter, 100 + row * 150 - jitter));
            }
        }
        towns
    }

    #[test]
    fn test_filtered_edges_respect_limits() {
        let towns = grid_towns();
        let wiring = DelaunayWiring {
            max_road_length: 200.0,
            road_exclusion: 20.0,
        };
        let mut graph = RoadGraph::new(towns.len());
        wiring.add_filtered_edges(&towns, &mut graph);

        assert!(graph.road_total() > 0);
        assert!(is_planar(&towns, &graph));
        for (a, b) in graph.roads() {
            assert!(towns[a].distance_to(&towns[b]) <= 200.0);
            assert!(!passes_through_town(&towns, a, b, 20.0));
        }
    }

    #[test]
    fn test_length_filter_drops_long_edges() {
        let towns = vec![town(0, 0, 0), town(1, 100, 0), town(2, 50, 400)];
        let wiring = DelaunayWiring {
            max_road_length: 150.0,
            road_exclusion: 5.0,
        };
        let mut graph = RoadGraph::new(3);
        wiring.add_filtered_edges(&towns, &mut graph);
        assert_eq!(graph.roads(), vec![(0, 1)]);
    }

    #[test]
    fn test_exclusion_filter_drops_pass_through_edges() {
        // Town 2 sits almost on the segment 0-1
        let towns = vec![town(0, 0, 0), town(1, 200, 0), town(2, 100, 3), town(3, 100, 120)];
        let wiring = DelaunayWiring {
            max_road_length: 500.0,
            road_exclusion: 10.0,
        };
        let mut graph = RoadGraph::new(4);
        wiring.add_filtered_edges(&towns, &mut graph);
        assert!(!graph.has_road(0, 1));
    }

    #[test]
    fn test_thinning_removes_at_most_half() {
        let towns = grid_towns();
        let wiring = DelaunayWiring {
            max_road_length: 1000.0,
            road_exclusion: 0.0,
        };
        let mut graph = RoadGraph::new(towns.len());
        wiring.add_filtered_edges(&towns, &mut graph);
        let before = graph.road_total();

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        wiring.thin(&towns, &mut graph, &mut rng);
        let after = graph.road_total();
        assert!(after <= before);
        assert!(before - after <= towns.len() / 2);
    }

    #[test]
    fn test_delaunay_wiring_is_deterministic() {
        let towns = grid_towns();
        let wiring = DelaunayWiring {
            max_road_length: 350.0,
            road_exclusion: 20.0,
        };

        let mut graph_a = RoadGraph::new(towns.len());
        let mut graph_b = RoadGraph::new(towns.len());
        let ok_a = wiring.wire(&towns, 0, &mut graph_a, &mut ChaCha8Rng::seed_from_u64(11));
        let ok_b = wiring.wire(&towns, 0, &mut graph_b, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(ok_a, ok_b);
        assert_eq!(graph_a, graph_b);
        if ok_a {
            assert!(accepts(&towns, &graph_a, 0, 350.0, 20.0));
        }
    }

    #[test]
    fn test_road_target_range() {
        assert_eq!(RandomWiring::road_target_range(12), (14, 15));
        assert_eq!(RandomWiring::road_target_range(4), (6, 6));
        assert_eq!(RandomWiring::road_target_range(2), (1, 1));
        let (low, high) = RandomWiring::road_target_range(5);
        assert!(low <= high);
    }

    #[test]
    fn test_random_wiring_small_map() {
        let towns = vec![town(0, 100, 100), town(1, 300, 120), town(2, 180, 300), town(3, 420, 330)];
        let wiring = RandomWiring {
            max_road_length: 1000.0,
            road_exclusion: 5.0,
            cycles: 5_000,
            deadline: None,
        };
        let mut graph = RoadGraph::new(towns.len());
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        assert!(wiring.wire(&towns, 0, &mut graph, &mut rng));
        assert!(accepts(&towns, &graph, 0, 1000.0, 5.0));
    }

    #[test]
    fn test_random_wiring_respects_cycle_budget() {
        // Every road is longer than the limit, so no cycle can succeed.
        let towns = vec![town(0, 0, 0), town(1, 200, 0), town(2, 100, 150)];
        let wiring = RandomWiring {
            max_road_length: 10.0,
            road_exclusion: 5.0,
            cycles: 50,
            deadline: None,
        };
        let mut graph = RoadGraph::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(!wiring.wire(&towns, 0, &mut graph, &mut rng));
    }

    #[test]
    fn test_random_wiring_respects_deadline() {
        let towns = grid_towns();
        let wiring = RandomWiring {
            max_road_length: 10.0,
            road_exclusion: 5.0,
            cycles: usize::MAX,
            deadline: Some(Instant::now()),
        };
        let mut graph = RoadGraph::new(towns.len());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(!wiring.wire(&towns, 0, &mut graph, &mut rng));
    }

    #[test]
    fn test_accepts_rejects_disconnected() {
        let towns = vec![town(0, 0, 0), town(1, 100, 0), town(2, 0, 100)];
        let mut graph = RoadGraph::new(3);
        graph.add_road(0, 1);
        assert!(!accepts(&towns, &graph, 0, 500.0, 5.0));
        graph.add_road(0, 2);
        assert!(accepts(&towns, &graph, 0, 500.0, 5.0));
        assert!(!accepts(&towns, &graph, 0, 50.0, 5.0), "roads too long");
    }
}
