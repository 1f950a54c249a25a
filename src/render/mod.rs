//! Draw data for a SettlementMap
//!
//! Produces engine-agnostic markers and line segments. Nothing here touches
//! a window or a GPU; a frontend only has to draw circles and lines.

mod colors;

pub use colors::{
    intensity, ArchetypeColorMapper, ColorMapper, CustomColorMapper, MarkerColor, DEAD_COLOR,
    HUB_COLOR, ROAD_COLOR,
};

use glam::Vec2;

use crate::map::SettlementMap;
use crate::town::Town;

/// Marker radius for living towns and the hub
pub const TOWN_RADIUS: f32 = 10.0;

/// Outline radius for dead towns
pub const DEAD_RADIUS: f32 = 12.0;

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// The hub town, drawn as a filled square
    Hub,
    /// A living town, filled by archetype and population
    Alive,
    /// A dead town, drawn as an outline only
    Dead,
}

/// One town as drawn
#[derive(Debug, Clone, PartialEq)]
pub struct TownMarker {
    /// Id of the town this marker stands for
    pub town: usize,
    /// Marker centre in map units
    pub position: Vec2,
    /// Hub, living or dead
    pub kind: MarkerKind,
    /// Fill color (outline color for dead towns)
    pub color: MarkerColor,
    /// Radius, or half the side length for the hub square
    pub radius: f32,
}

/// One road as drawn
#[derive(Debug, Clone, PartialEq)]
pub struct RoadLine {
    /// Start point, at the lower-id town
    pub from: Vec2,
    /// End point, at the higher-id town
    pub to: Vec2,
    /// Stroke color
    pub color: MarkerColor,
}

/// Everything needed to draw a map
#[derive(Debug, Clone, Default)]
pub struct SceneData {
    /// One marker per town, in town id order
    pub markers: Vec<TownMarker>,
    /// One line per road, in road order
    pub roads: Vec<RoadLine>,
}

impl SceneData {
    /// Number of town markers
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Number of road lines
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    /// Check if the scene is empty
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.roads.is_empty()
    }
}

/// Population bounds over living non-hub towns
fn population_bounds(towns: &[Town]) -> Option<(u32, u32)> {
    towns
        .iter()
        .filter(|t| t.is_alive && !t.is_main)
        .map(|t| t.population)
        .fold(None, |bounds, p| match bounds {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
}

/// Build draw data for `map`
///
/// # Example
///
/// ```
/// use settlement_gen::*;
///
/// let map = SettlementMap::generate(MapConfigBuilder::new().seed(3).build().unwrap()).unwrap();
/// let scene = build_scene(&map, &ArchetypeColorMapper);
/// assert_eq!(scene.marker_count(), map.town_count());
/// assert_eq!(scene.road_count(), map.road_total());
/// ```
pub fn build_scene<C: ColorMapper>(map: &SettlementMap, color_mapper: &C) -> SceneData {
    let towns = map.towns();
    let bounds = population_bounds(towns);

    let markers = towns
        .iter()
        .map(|town| {
            let (kind, color, radius) = if town.is_main {
                (MarkerKind::Hub, color_mapper.hub_color(), TOWN_RADIUS)
            } else if !town.is_alive {
                (MarkerKind::Dead, color_mapper.dead_color(), DEAD_RADIUS)
            } else {
                let ratio = match bounds {
                    Some((lo, hi)) if hi > lo => (town.population - lo) as f32 / (hi - lo) as f32,
                    _ => 1.0,
                };
                (
                    MarkerKind::Alive,
                    color_mapper.map_color(town.archetype, ratio),
                    TOWN_RADIUS,
                )
            };
            TownMarker {
                town: town.id,
                position: town.position.as_vec2(),
                kind,
                color,
                radius,
            }
        })
        .collect();

    let roads = map
        .roads()
        .into_iter()
        .map(|(a, b)| RoadLine {
            from: towns[a].position.as_vec2(),
            to: towns[b].position.as_vec2(),
            color: ROAD_COLOR,
        })
        .collect();

    SceneData { markers, roads }
}
