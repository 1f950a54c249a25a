//! Map configuration and builder
//!
//! A [`MapConfig`] is an immutable value that fully determines a generation
//! run: the same configuration (seed included) always produces the same map.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::error::{Result, SettlementError};

/// How roads are wired between placed towns
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenerationStrategy {
    /// Randomized from-scratch wiring with a bounded rebuild loop
    Random,
    /// Hub-and-spoke layout (not implemented)
    Hubs,
    /// Single chain of towns (not implemented)
    Line,
    /// Filtered and thinned Delaunay triangulation
    #[default]
    Delaunay,
}

impl GenerationStrategy {
    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            GenerationStrategy::Random => "random",
            GenerationStrategy::Hubs => "hubs",
            GenerationStrategy::Line => "line",
            GenerationStrategy::Delaunay => "delaunay",
        }
    }
}

/// Reject town counts no wiring strategy can connect
///
/// Two towns share a single road, and both strategies always delete at
/// least one road before the connectivity check.
fn check_town_count(count: usize) -> Result<()> {
    match count {
        0 => Err(SettlementError::InvalidConfig(
            "at least one town is required".to_string(),
        )),
        2 => Err(SettlementError::InvalidConfig(
            "two towns cannot form an accepted road network; use 1 or at least 3".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Configuration for deterministic settlement map generation
///
/// Distances are in map units. Build one with [`MapConfigBuilder`], which
/// validates every limit.
///
/// # Example
///
/// ```rust
/// use settlement_gen::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(7)
///     .town_count(10)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.town_count, 10);
/// assert_eq!(config.strategy, GenerationStrategy::Delaunay);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Map width; towns live in `[0, width]`
    pub width: i32,
    /// Map height; towns live in `[0, height]`
    pub height: i32,
    /// Number of towns to place
    pub town_count: usize,
    /// Base population before deviation is applied
    pub start_population: u32,
    /// Starting warehouse contents, copied into every town
    pub start_warehouse: Vec<i64>,
    /// Population deviation coefficient `c`: population = base ± base × U(-c, c)
    pub population_deviation: f64,
    /// Axis-wise neighbour zone between towns
    pub town_separation: i32,
    /// Minimum distance between a town and every map edge
    pub border_margin: i32,
    /// Minimum distance between a road and any town it does not connect
    pub road_exclusion: f64,
    /// Maximum road length
    pub max_road_length: f64,
    /// Road wiring strategy
    pub strategy: GenerationStrategy,
    /// Outer attempts (placement + wiring) before giving up
    pub max_attempts: usize,
    /// Rebuild cycles per attempt for the randomized strategy
    pub random_cycles: usize,
    /// Wall-clock budget for the whole generation run
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_budget: Option<Duration>,
    /// Random seed
    pub seed: u64,
}

impl MapConfig {
    /// Parse a configuration from a JSON settings document
    ///
    /// The parsed values go through the same validation as the builder.
    #[cfg(feature = "serde")]
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(text)
            .map_err(|err| SettlementError::InvalidConfig(format!("malformed settings: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON settings file
    #[cfg(feature = "serde")]
    pub fn load_json(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            SettlementError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Serialize the configuration as pretty-printed JSON
    #[cfg(feature = "serde")]
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| SettlementError::InvalidConfig(err.to_string()))
    }

    /// Check every limit the generator relies on
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SettlementError::InvalidConfig(format!(
                "map size must be positive (got {}x{})",
                self.width, self.height
            )));
        }
        check_town_count(self.town_count)?;
        if self.town_separation < 0 || self.border_margin < 0 {
            return Err(SettlementError::InvalidConfig(format!(
                "separation and border margin must be >= 0 (got {} and {})",
                self.town_separation, self.border_margin
            )));
        }
        if !(0.0..1.0).contains(&self.population_deviation) {
            return Err(SettlementError::InvalidConfig(format!(
                "population deviation must be in [0, 1) (got {})",
                self.population_deviation
            )));
        }
        if self.road_exclusion.is_nan() || self.road_exclusion < 0.0 {
            return Err(SettlementError::InvalidConfig(format!(
                "road exclusion must be >= 0 (got {})",
                self.road_exclusion
            )));
        }
        if self.max_road_length.is_nan() || self.max_road_length <= 0.0 {
            return Err(SettlementError::InvalidConfig(format!(
                "max road length must be positive (got {})",
                self.max_road_length
            )));
        }
        if self.max_attempts == 0 || self.random_cycles == 0 {
            return Err(SettlementError::InvalidConfig(
                "retry budgets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfigBuilder::new().seed(0).into_config()
    }
}

/// Builder for creating [`MapConfig`] with validation
///
/// Defaults:
/// - 1200 × 800 map, 12 towns
/// - population 1000 ± 10%, warehouse `[1000, 0]` (food, goods)
/// - town separation 40, border margin 50
/// - road exclusion 20, max road length 350
/// - Delaunay strategy, 200 outer attempts, 20 000 random cycles, 10 s budget
/// - seed: random unless set
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    width: i32,
    height: i32,
    town_count: usize,
    start_population: u32,
    start_warehouse: Vec<i64>,
    population_deviation: f64,
    town_separation: i32,
    border_margin: i32,
    road_exclusion: f64,
    max_road_length: f64,
    strategy: GenerationStrategy,
    max_attempts: usize,
    random_cycles: usize,
    time_budget: Option<Duration>,
    seed: Option<u64>,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            width: 1200,
            height: 800,
            town_count: 12,
            start_population: 1000,
            start_warehouse: vec![1000, 0],
            population_deviation: 0.1,
            town_separation: 40,
            border_margin: 50,
            road_exclusion: 20.0,
            max_road_length: 350.0,
            strategy: GenerationStrategy::Delaunay,
            max_attempts: 200,
            random_cycles: 20_000,
            time_budget: Some(Duration::from_secs(10)),
            seed: None,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map dimensions
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive
    pub fn size(mut self, width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(SettlementError::InvalidConfig(format!(
                "map size must be positive (got {width}x{height})"
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Set the number of towns
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is zero or two
    pub fn town_count(mut self, count: usize) -> Result<Self> {
        check_town_count(count)?;
        self.town_count = count;
        Ok(self)
    }

    /// Set the base population
    pub fn start_population(mut self, population: u32) -> Self {
        self.start_population = population;
        self
    }

    /// Set the starting warehouse vector copied into every town
    pub fn start_warehouse(mut self, warehouse: Vec<i64>) -> Self {
        self.start_warehouse = warehouse;
        self
    }

    /// Set the population deviation coefficient
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `0 <= coefficient < 1`
    pub fn population_deviation(mut self, coefficient: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&coefficient) {
            return Err(SettlementError::InvalidConfig(format!(
                "population deviation must be in [0, 1) (got {coefficient})"
            )));
        }
        self.population_deviation = coefficient;
        Ok(self)
    }

    /// Set the axis-wise neighbour zone between towns
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `separation` is negative
    pub fn town_separation(mut self, separation: i32) -> Result<Self> {
        if separation < 0 {
            return Err(SettlementError::InvalidConfig(format!(
                "town separation must be >= 0 (got {separation})"
            )));
        }
        self.town_separation = separation;
        Ok(self)
    }

    /// Set the border margin
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `margin` is negative
    pub fn border_margin(mut self, margin: i32) -> Result<Self> {
        if margin < 0 {
            return Err(SettlementError::InvalidConfig(format!(
                "border margin must be >= 0 (got {margin})"
            )));
        }
        self.border_margin = margin;
        Ok(self)
    }

    /// Set the road exclusion distance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `distance` is negative or NaN
    pub fn road_exclusion(mut self, distance: f64) -> Result<Self> {
        if distance.is_nan() || distance < 0.0 {
            return Err(SettlementError::InvalidConfig(format!(
                "road exclusion must be >= 0 (got {distance})"
            )));
        }
        self.road_exclusion = distance;
        Ok(self)
    }

    /// Set the maximum road length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `length` is not positive
    pub fn max_road_length(mut self, length: f64) -> Result<Self> {
        if length.is_nan() || length <= 0.0 {
            return Err(SettlementError::InvalidConfig(format!(
                "max road length must be positive (got {length})"
            )));
        }
        self.max_road_length = length;
        Ok(self)
    }

    /// Set the road wiring strategy
    pub fn strategy(mut self, strategy: GenerationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the outer retry budget
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `attempts` is zero
    pub fn max_attempts(mut self, attempts: usize) -> Result<Self> {
        if attempts == 0 {
            return Err(SettlementError::InvalidConfig(
                "max attempts must be at least 1".to_string(),
            ));
        }
        self.max_attempts = attempts;
        Ok(self)
    }

    /// Set the rebuild-cycle budget of the randomized strategy
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `cycles` is zero
    pub fn random_cycles(mut self, cycles: usize) -> Result<Self> {
        if cycles == 0 {
            return Err(SettlementError::InvalidConfig(
                "random cycles must be at least 1".to_string(),
            ));
        }
        self.random_cycles = cycles;
        Ok(self)
    }

    /// Set or clear the wall-clock budget
    pub fn time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, draws one from the thread RNG.
    pub fn build(self) -> Result<MapConfig> {
        let config = self.into_config();
        config.validate()?;
        Ok(config)
    }

    fn into_config(self) -> MapConfig {
        let seed = self.seed.unwrap_or_else(rand::random);
        MapConfig {
            width: self.width,
            height: self.height,
            town_count: self.town_count,
            start_population: self.start_population,
            start_warehouse: self.start_warehouse,
            population_deviation: self.population_deviation,
            town_separation: self.town_separation,
            border_margin: self.border_margin,
            road_exclusion: self.road_exclusion,
            max_road_length: self.max_road_length,
            strategy: self.strategy,
            max_attempts: self.max_attempts,
            random_cycles: self.random_cycles,
            time_budget: self.time_budget,
            seed,
        }
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
