//! SettlementMap main structure
//!
//! Owns the bounded retry loop that turns a [`MapConfig`] into an accepted
//! town and road layout, and exposes that layout as a read-only snapshot.

use std::time::Instant;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{GenerationStrategy, MapConfig};
use crate::error::{Result, SettlementError};
use crate::generation::{accepts, place_towns, DelaunayWiring, RandomWiring, RoadWiring};
use crate::graph::RoadGraph;
use crate::routing::{find_route, Route};
use crate::town::Town;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// The hub is always the first town placed
const HUB: usize = 0;

/// A generated settlement map
///
/// Towns, roads and the hub are frozen once generation succeeds. The only
/// change allowed afterwards is flipping a town's liveness.
///
/// # Examples
///
/// ```
/// use settlement_gen::*;
///
/// let config = MapConfigBuilder::new().seed(42).build().unwrap();
/// let map = SettlementMap::generate(config).unwrap();
///
/// assert_eq!(map.town_count(), 12);
/// assert!(map.route_to_hub(map.town_count() - 1).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SettlementMap {
    /// Configuration used to generate this map
    config: MapConfig,

    /// All towns, indexed by id
    towns: Vec<Town>,

    /// Accepted road network
    graph: RoadGraph,

    /// Id of the hub town
    hub: usize,

    /// Outer attempts spent before acceptance
    attempts: usize,

    /// Nearest-town lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl SettlementMap {
    /// Generate a map from `config`, seeding the RNG with `config.seed`
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration fails validation
    /// - `UnsupportedStrategy` for `Hubs` and `Line`
    /// - `PlacementFailure` if no attempt managed to place every town
    /// - `WiringExhausted` if towns were placed but no road network passed
    ///   within the attempt or wall-clock budget
    pub fn generate(config: MapConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generate a map drawing every random number from `rng`
    ///
    /// # Example
    ///
    /// ```
    /// use settlement_gen::*;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = MapConfigBuilder::new().town_count(6).unwrap().build().unwrap();
    /// let mut rng = ChaCha8Rng::seed_from_u64(7);
    /// let map = SettlementMap::generate_with_rng(config, &mut rng).unwrap();
    /// assert_eq!(map.town_count(), 6);
    /// ```
    pub fn generate_with_rng<R: Rng + ?Sized>(config: MapConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let deadline = config.time_budget.map(|budget| Instant::now() + budget);
        match config.strategy {
            GenerationStrategy::Delaunay => {
                let wiring = DelaunayWiring::from_config(&config);
                Self::retry(config, &wiring, deadline, rng)
            }
            GenerationStrategy::Random => {
                let wiring = RandomWiring::from_config(&config, deadline);
                Self::retry(config, &wiring, deadline, rng)
            }
            unsupported => Err(SettlementError::UnsupportedStrategy(unsupported)),
        }
    }

    /// Outer loop: place, wire, gate; restart from scratch on any failure
    fn retry<W, R>(
        config: MapConfig,
        wiring: &W,
        deadline: Option<Instant>,
        rng: &mut R,
    ) -> Result<Self>
    where
        W: RoadWiring,
        R: Rng + ?Sized,
    {
        let mut placement_failure = None;
        let mut placed_any = false;

        for attempt in 1..=config.max_attempts {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                tracing::warn!(attempt, strategy = wiring.name(), placed_any, "wall-clock budget spent");
                return Err(Self::exhausted(
                    placement_failure,
                    placed_any,
                    attempt - 1,
                    "wall-clock budget spent",
                ));
            }

            let towns = match place_towns(&config, rng) {
                Ok(towns) => towns,
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "placement failed");
                    placement_failure = Some(err);
                    continue;
                }
            };
            placed_any = true;

            let mut graph = RoadGraph::new(towns.len());
            let wired = wiring.wire(&towns, HUB, &mut graph, rng);
            if !wired
                || !accepts(
                    &towns,
                    &graph,
                    HUB,
                    config.max_road_length,
                    config.road_exclusion,
                )
            {
                tracing::debug!(attempt, strategy = wiring.name(), wired, "road network rejected");
                continue;
            }

            tracing::info!(
                attempt,
                strategy = wiring.name(),
                towns = towns.len(),
                roads = graph.road_total(),
                "settlement map accepted"
            );
            return Ok(Self::assemble(config, towns, graph, HUB, attempt));
        }

        let attempts = config.max_attempts;
        tracing::warn!(attempts, strategy = wiring.name(), placed_any, "attempt budget spent");
        Err(Self::exhausted(
            placement_failure,
            placed_any,
            attempts,
            "no road network passed the acceptance gate",
        ))
    }

    /// Error for a spent budget: placement failure if no attempt ever placed
    /// every town, wiring exhaustion otherwise
    fn exhausted(
        placement_failure: Option<SettlementError>,
        placed_any: bool,
        attempts: usize,
        reason: &str,
    ) -> SettlementError {
        match placement_failure {
            Some(err) if !placed_any => err,
            _ => SettlementError::WiringExhausted {
                attempts,
                reason: reason.to_string(),
            },
        }
    }

    fn assemble(
        config: MapConfig,
        towns: Vec<Town>,
        graph: RoadGraph,
        hub: usize,
        attempts: usize,
    ) -> Self {
        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let points: Vec<DVec2> = towns.iter().map(Town::point).collect();
            SpatialIndex::new(&points)
        };

        Self {
            config,
            towns,
            graph,
            hub,
            attempts,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// Build a map from a known layout
    ///
    /// Town ids must equal their index and exactly one town must be the hub.
    /// The roads go through the same acceptance gate as generated ones, using
    /// the limits in `config`.
    ///
    /// # Errors
    ///
    /// - `TownNotFound` if a road names a town that does not exist
    /// - `InvalidConfig` for malformed towns or a layout the gate rejects
    pub fn from_parts(config: MapConfig, towns: Vec<Town>, roads: &[(usize, usize)]) -> Result<Self> {
        config.validate()?;

        if let Some(town) = towns.iter().enumerate().find(|(i, t)| t.id != *i) {
            return Err(SettlementError::InvalidConfig(format!(
                "town at index {} has id {}",
                town.0, town.1.id
            )));
        }
        let hubs: Vec<usize> = towns.iter().filter(|t| t.is_main).map(|t| t.id).collect();
        let &[hub] = hubs.as_slice() else {
            return Err(SettlementError::InvalidConfig(format!(
                "exactly one hub is required (got {})",
                hubs.len()
            )));
        };

        let mut graph = RoadGraph::new(towns.len());
        for &(a, b) in roads {
            if let Some(&missing) = [a, b].iter().find(|&&id| id >= towns.len()) {
                return Err(SettlementError::TownNotFound(missing));
            }
            if a == b {
                return Err(SettlementError::InvalidConfig(format!(
                    "road from town {a} to itself"
                )));
            }
            graph.add_road(a, b);
        }

        if !accepts(&towns, &graph, hub, config.max_road_length, config.road_exclusion) {
            return Err(SettlementError::InvalidConfig(
                "roads are disconnected, crossing, too long or pass through a town".to_string(),
            ));
        }

        Ok(Self::assemble(config, towns, graph, hub, 0))
    }

    /// Configuration used to generate this map
    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// All towns, indexed by id
    #[inline]
    pub fn towns(&self) -> &[Town] {
        &self.towns
    }

    /// Town by id, or `None` if out of range
    #[inline]
    pub fn town(&self, id: usize) -> Option<&Town> {
        self.towns.get(id)
    }

    /// Id of the hub town
    #[inline]
    pub fn hub(&self) -> usize {
        self.hub
    }

    /// Number of towns
    #[inline]
    pub fn town_count(&self) -> usize {
        self.towns.len()
    }

    /// The accepted road network
    #[inline]
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Towns directly connected to `id`; empty for unknown ids
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.neighbors(id)
    }

    /// Number of roads touching `id`
    #[inline]
    pub fn road_count(&self, id: usize) -> usize {
        self.graph.road_count(id)
    }

    /// Every road once, as sorted `(low, high)` pairs
    pub fn roads(&self) -> Vec<(usize, usize)> {
        self.graph.roads()
    }

    /// Total number of roads
    pub fn road_total(&self) -> usize {
        self.graph.road_total()
    }

    /// Outer attempts generation needed; zero for maps built from parts
    #[inline]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Cheapest route between two towns
    pub fn route(&self, origin: usize, target: usize) -> Option<Route> {
        find_route(&self.towns, &self.graph, origin, target)
    }

    /// Cheapest route from `origin` to the hub
    ///
    /// # Example
    ///
    /// ```
    /// # use settlement_gen::*;
    /// # let map = SettlementMap::generate(MapConfigBuilder::new().seed(1).build().unwrap()).unwrap();
    /// let route = map.route_to_hub(3).unwrap();
    /// assert_eq!(route.towns.first(), Some(&3));
    /// assert_eq!(route.towns.last(), Some(&map.hub()));
    /// ```
    pub fn route_to_hub(&self, origin: usize) -> Option<Route> {
        self.route(origin, self.hub)
    }

    /// Route to the hub for every town, indexed by town id
    pub fn routes_to_hub(&self) -> Vec<Option<Route>> {
        (0..self.towns.len())
            .map(|id| self.route_to_hub(id))
            .collect()
    }

    /// Nearest town within `pick_radius` of `point`
    ///
    /// Uses the KD-tree index when the `spatial-index` feature is enabled and
    /// a linear scan otherwise.
    pub fn find_town_at(&self, point: DVec2, pick_radius: f64) -> Option<usize> {
        let (id, distance) = self.nearest_town(point)?;
        (distance <= pick_radius).then_some(id)
    }

    #[cfg(feature = "spatial-index")]
    fn nearest_town(&self, point: DVec2) -> Option<(usize, f64)> {
        self.spatial_index.find_nearest(point)
    }

    #[cfg(not(feature = "spatial-index"))]
    fn nearest_town(&self, point: DVec2) -> Option<(usize, f64)> {
        self.towns
            .iter()
            .map(|t| (t.id, t.point().distance(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Mark a town as alive or dead
    ///
    /// Roads and positions are untouched.
    pub fn set_alive(&mut self, id: usize, alive: bool) -> Result<()> {
        let town = self
            .towns
            .get_mut(id)
            .ok_or(SettlementError::TownNotFound(id))?;
        town.is_alive = alive;
        Ok(())
    }
}
