//! Color mapping for town markers

use crate::town::Archetype;

/// RGBA color type, channels in `[0, 1]`
pub type MarkerColor = [f32; 4];

/// Hub fill, gold
pub const HUB_COLOR: MarkerColor = [1.0, 215.0 / 255.0, 0.0, 1.0];

/// Outline used for dead towns
pub const DEAD_COLOR: MarkerColor = [0.0, 0.0, 0.0, 1.0];

/// Road stroke, mid gray
pub const ROAD_COLOR: MarkerColor = [122.0 / 255.0, 122.0 / 255.0, 122.0 / 255.0, 1.0];

const MIN_INTENSITY: f32 = 100.0;
const MAX_INTENSITY: f32 = 255.0;

/// Channel intensity for a population ratio in `[0, 1]`
///
/// Smallest town maps to 100/255, largest to full brightness.
#[inline]
pub fn intensity(ratio: f32) -> f32 {
    (MIN_INTENSITY + (MAX_INTENSITY - MIN_INTENSITY) * ratio.clamp(0.0, 1.0)) / MAX_INTENSITY
}

/// Trait for mapping towns to marker colors
pub trait ColorMapper {
    /// Color of a living non-hub town
    ///
    /// `ratio` is the town's population rank among living non-hub towns,
    /// 0 for the smallest and 1 for the largest.
    fn map_color(&self, archetype: Archetype, ratio: f32) -> MarkerColor;

    /// Color of the hub
    fn hub_color(&self) -> MarkerColor {
        HUB_COLOR
    }

    /// Color of a dead town
    fn dead_color(&self) -> MarkerColor {
        DEAD_COLOR
    }
}

/// Default mapper: archetype picks the channel, population its brightness
///
/// Collectors are red, laissez-faire towns blue and basic towns green.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchetypeColorMapper;

impl ColorMapper for ArchetypeColorMapper {
    fn map_color(&self, archetype: Archetype, ratio: f32) -> MarkerColor {
        let i = intensity(ratio);
        match archetype {
            Archetype::Collector => [i, 0.0, 0.0, 1.0],
            Archetype::LaissezFaire => [0.0, 0.0, i, 1.0],
            Archetype::Basic => [0.0, i, 0.0, 1.0],
        }
    }
}

/// Mapper with user-chosen base colors per archetype
///
/// The RGB channels of the base color are scaled by the population
/// intensity; alpha is kept as given.
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    /// Base color for collector towns
    pub collector: MarkerColor,
    /// Base color for laissez-faire towns
    pub laissez_faire: MarkerColor,
    /// Base color for basic towns
    pub basic: MarkerColor,
    /// Hub fill
    pub hub: MarkerColor,
    /// Dead town outline
    pub dead: MarkerColor,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        Self {
            collector: [1.0, 0.0, 0.0, 1.0],
            laissez_faire: [0.0, 0.0, 1.0, 1.0],
            basic: [0.0, 1.0, 0.0, 1.0],
            hub: HUB_COLOR,
            dead: DEAD_COLOR,
        }
    }
}

impl ColorMapper for CustomColorMapper {
    fn map_color(&self, archetype: Archetype, ratio: f32) -> MarkerColor {
        let [r, g, b, a] = match archetype {
            Archetype::Collector => self.collector,
            Archetype::LaissezFaire => self.laissez_faire,
            Archetype::Basic => self.basic,
        };
        let i = intensity(ratio);
        [r * i, g * i, b * i, a]
    }

    fn hub_color(&self) -> MarkerColor {
        self.hub
    }

    fn dead_color(&self) -> MarkerColor {
        self.dead
    }
}
