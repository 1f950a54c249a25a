//! Town placement inside a bordered rectangle

use glam::IVec2;
use rand::distributions::Distribution;
use rand::Rng;

use crate::config::MapConfig;
use crate::error::{Result, SettlementError};
use crate::town::{ArchetypeWeights, Town};

/// Coordinate draws allowed per town before placement fails
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Whether `candidate` keeps its distance from every placed town
///
/// The check is axis-wise: a pair is fine when their x-separation OR their
/// y-separation reaches `separation`. This is not a Euclidean test.
fn clear_of_towns(candidate: IVec2, towns: &[Town], separation: i32) -> bool {
    towns.iter().all(|other| {
        let delta = (candidate - other.position).abs();
        delta.x >= separation || delta.y >= separation
    })
}

/// Whether `candidate` is at least `margin` away from all four map edges
fn inside_border(candidate: IVec2, width: i32, height: i32, margin: i32) -> bool {
    candidate.x >= margin
        && candidate.x <= width - margin
        && candidate.y >= margin
        && candidate.y <= height - margin
}

/// Sample the population of a single town: `base ± base × U(-c, c)`
fn sample_population<R: Rng + ?Sized>(base: u32, deviation: f64, rng: &mut R) -> u32 {
    let base = base as f64;
    let offset = if deviation > 0.0 {
        base * rng.gen_range(-deviation..deviation)
    } else {
        0.0
    };
    (base + offset).max(0.0) as u32
}

/// Place `config.town_count` towns
///
/// Each town gets up to [`PLACEMENT_ATTEMPTS`] uniform integer draws over
/// `[0, width] × [0, height]`. The first town placed becomes the hub.
///
/// # Errors
///
/// Returns `PlacementFailure` for the first town that exhausts its draws;
/// no partial town list is returned.
pub fn place_towns<R: Rng + ?Sized>(config: &MapConfig, rng: &mut R) -> Result<Vec<Town>> {
    let archetypes = ArchetypeWeights::new()?;
    let mut towns: Vec<Town> = Vec::with_capacity(config.town_count);

    for id in 0..config.town_count {
        let population =
            sample_population(config.start_population, config.population_deviation, rng);

        let position = (0..PLACEMENT_ATTEMPTS)
            .map(|_| {
                IVec2::new(
                    rng.gen_range(0..=config.width),
                    rng.gen_range(0..=config.height),
                )
            })
            .find(|&candidate| {
                clear_of_towns(candidate, &towns, config.town_separation)
                    && inside_border(candidate, config.width, config.height, config.border_margin)
            })
            .ok_or(SettlementError::PlacementFailure {
                town: id,
                attempts: PLACEMENT_ATTEMPTS,
            })?;

        let archetype = archetypes.sample(rng);
        towns.push(Town::new(
            id,
            position,
            population,
            config.start_warehouse.clone(),
            archetype,
            id == 0,
        ));
    }

    Ok(towns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfigBuilder;
    use crate::town::Archetype;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_place_towns() {
        let config = MapConfigBuilder::new().seed(3).build().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let towns = place_towns(&config, &mut rng).unwrap();

        assert_eq!(towns.len(), config.town_count);
        assert_eq!(towns.iter().filter(|t| t.is_main).count(), 1);
        assert!(towns[0].is_main);

        for (i, town) in towns.iter().enumerate() {
            assert_eq!(town.id, i);
            assert!(town.is_alive);
            assert!(inside_border(town.position, config.width, config.height, config.border_margin));
            assert!((900..=1100).contains(&town.population));
            assert_eq!(town.warehouse, config.start_warehouse);
            assert!(clear_of_towns(town.position, &towns[..i], config.town_separation));
        }
    }

    #[test]
    fn test_axis_wise_separation() {
        let towns = vec![Town::new(0, IVec2::new(100, 100), 1, vec![], Archetype::Basic, true)];

        // Close on x, far on y: allowed
        assert!(clear_of_towns(IVec2::new(105, 200), &towns, 40));
        // Close on both axes: rejected
        assert!(!clear_of_towns(IVec2::new(120, 120), &towns, 40));
        // Exactly on the threshold counts as clear
        assert!(clear_of_towns(IVec2::new(140, 100), &towns, 40));
    }

    #[test]
    fn test_border() {
        assert!(inside_border(IVec2::new(50, 50), 200, 200, 50));
        assert!(inside_border(IVec2::new(150, 150), 200, 200, 50));
        assert!(!inside_border(IVec2::new(49, 100), 200, 200, 50));
        assert!(!inside_border(IVec2::new(100, 151), 200, 200, 50));
    }

    #[test]
    fn test_overfull_map_fails() {
        // A separation wider than the map leaves room for exactly one town.
        let config = MapConfigBuilder::new()
            .seed(9)
            .size(100, 100)
            .unwrap()
            .border_margin(0)
            .unwrap()
            .town_separation(101)
            .unwrap()
            .town_count(5)
            .unwrap()
            .build()
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        match place_towns(&config, &mut rng) {
            Err(SettlementError::PlacementFailure { town, attempts }) => {
                assert_eq!(town, 1);
                assert_eq!(attempts, PLACEMENT_ATTEMPTS);
            }
            other => panic!("expected placement failure, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_deviation_keeps_base_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(sample_population(1000, 0.0, &mut rng), 1000);
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        let config = MapConfigBuilder::new().seed(77).build().unwrap();
        let a = place_towns(&config, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
        let b = place_towns(&config, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }
}
