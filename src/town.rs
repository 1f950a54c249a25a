//! Town Structure
//!
//! Represents a single settlement site: position, population, stock and
//! behavioural archetype. Road connectivity lives in [`RoadGraph`], keyed by
//! the town's `id`.
//!
//! [`RoadGraph`]: crate::graph::RoadGraph

use glam::{DVec2, IVec2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{Result, SettlementError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Behavioural category of a town, fixed at creation
///
/// Determines the toll a route pays when it enters the town.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Taxes heavily
    Collector,
    /// Barely taxes
    LaissezFaire,
    /// Moderate taxation
    Basic,
}

impl Archetype {
    /// All archetypes, in the order of [`Archetype::WEIGHTS`]
    pub const ALL: [Archetype; 3] = [
        Archetype::Collector,
        Archetype::LaissezFaire,
        Archetype::Basic,
    ];

    /// Draw probabilities for each archetype
    pub const WEIGHTS: [f64; 3] = [0.1, 0.3, 0.6];

    /// Toll paid by a route entering a town of this archetype
    pub fn toll(self) -> f64 {
        match self {
            Archetype::Collector => 0.9,
            Archetype::Basic => 0.4,
            Archetype::LaissezFaire => 0.1,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Archetype::Collector => "Collector",
            Archetype::LaissezFaire => "Laissez-Faire",
            Archetype::Basic => "Basic",
        }
    }
}

/// Weighted categorical distribution over [`Archetype`]
///
/// Build it once per placement run and draw from it for every town.
#[derive(Debug, Clone)]
pub struct ArchetypeWeights {
    index: WeightedIndex<f64>,
}

impl ArchetypeWeights {
    /// Distribution using [`Archetype::WEIGHTS`]
    pub fn new() -> Result<Self> {
        Self::with_weights(Archetype::WEIGHTS)
    }

    /// Distribution with custom weights, in the order of [`Archetype::ALL`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a weight is negative or all are zero
    pub fn with_weights(weights: [f64; 3]) -> Result<Self> {
        let index = WeightedIndex::new(weights).map_err(|err| {
            SettlementError::InvalidConfig(format!("bad archetype weights {weights:?}: {err}"))
        })?;
        Ok(Self { index })
    }
}

impl Distribution<Archetype> for ArchetypeWeights {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Archetype {
        Archetype::ALL[self.index.sample(rng)]
    }
}

/// A town on the settlement map
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Town {
    /// Stable identifier, equal to the town's index in the map
    pub id: usize,

    /// Integer map position
    pub position: IVec2,

    /// Population, sampled once at placement
    pub population: u32,

    /// Resource stock owned by this town alone
    pub warehouse: Vec<i64>,

    /// Behavioural archetype
    pub archetype: Archetype,

    /// Whether this town is the hub every route targets
    pub is_main: bool,

    /// Liveness flag; only the economy layer flips it
    pub is_alive: bool,
}

impl Town {
    /// Create a living town
    pub fn new(
        id: usize,
        position: IVec2,
        population: u32,
        warehouse: Vec<i64>,
        archetype: Archetype,
        is_main: bool,
    ) -> Self {
        Self {
            id,
            position,
            population,
            warehouse,
            archetype,
            is_main,
            is_alive: true,
        }
    }

    /// Position as floating point coordinates
    #[inline]
    pub fn point(&self) -> DVec2 {
        self.position.as_dvec2()
    }

    /// Euclidean distance to another town
    #[inline]
    pub fn distance_to(&self, other: &Town) -> f64 {
        self.point().distance(other.point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_town_creation() {
        let town = Town::new(3, IVec2::new(10, 20), 950, vec![1000, 0], Archetype::Basic, false);

        assert_eq!(town.id, 3);
        assert!(town.is_alive);
        assert!(!town.is_main);
        assert_eq!(town.point(), DVec2::new(10.0, 20.0));
    }

    #[test]
    fn test_distance_to() {
        let a = Town::new(0, IVec2::new(0, 0), 1, vec![], Archetype::Basic, true);
        let b = Town::new(1, IVec2::new(3, 4), 1, vec![], Archetype::Basic, false);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_tolls() {
        assert_eq!(Archetype::Collector.toll(), 0.9);
        assert_eq!(Archetype::Basic.toll(), 0.4);
        assert_eq!(Archetype::LaissezFaire.toll(), 0.1);
    }

    #[test]
    fn test_archetype_distribution() {
        let weights = ArchetypeWeights::new().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            let drawn = weights.sample(&mut rng);
            let index = Archetype::ALL.iter().position(|&a| a == drawn).unwrap();
            counts[index] += 1;
        }

        // Roughly 10% / 30% / 60%
        assert!((700..1300).contains(&counts[0]), "collectors: {}", counts[0]);
        assert!((2600..3400).contains(&counts[1]), "laissez-faire: {}", counts[1]);
        assert!((5500..6500).contains(&counts[2]), "basic: {}", counts[2]);
    }

    #[test]
    fn test_warehouses_are_not_shared() {
        let start = vec![1000, 0];
        let mut a = Town::new(0, IVec2::ZERO, 1, start.clone(), Archetype::Basic, true);
        let b = Town::new(1, IVec2::ONE, 1, start.clone(), Archetype::Basic, false);
        a.warehouse[0] -= 500;
        assert_eq!(b.warehouse, start);
    }

    #[test]
    fn test_custom_weights() {
        let only_collectors = ArchetypeWeights::with_weights([1.0, 0.0, 0.0]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!((0..100).all(|_| only_collectors.sample(&mut rng) == Archetype::Collector));
    }

    #[test]
    fn test_bad_weights_are_rejected() {
        assert!(matches!(
            ArchetypeWeights::with_weights([0.0, 0.0, 0.0]),
            Err(SettlementError::InvalidConfig(_))
        ));
        assert!(ArchetypeWeights::with_weights([-1.0, 1.0, 1.0]).is_err());
    }
}
