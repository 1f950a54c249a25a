//! Procedural settlement maps
//!
//! Places towns on a bounded plane and connects them with a road network that
//! is connected from a hub town, planar, length-bounded and never passes
//! through a town it does not serve. Generation is a bounded retry search
//! that either returns a complete map or a typed error.
//!
//! # Quick Start
//!
//! ```rust
//! use settlement_gen::*;
//!
//! // Generate a map
//! let config = MapConfigBuilder::new()
//!     .seed(42)
//!     .town_count(10).unwrap()
//!     .build().unwrap();
//!
//! let map = SettlementMap::generate(config).unwrap();
//!
//! // Route every town to the hub
//! for route in map.routes_to_hub().into_iter().flatten() {
//!     println!("{:?} costs {:.2}", route.towns, route.cost);
//! }
//!
//! // Draw data for a renderer
//! let scene = build_scene(&map, &ArchetypeColorMapper);
//! println!("{} markers, {} roads", scene.marker_count(), scene.road_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) pointer hit-testing using a KD-tree
//! - `serde`: Serialization for configuration, towns and routes, plus JSON
//!   settings files

#![warn(missing_docs)]

// Modules
pub mod error;
pub mod config;
pub mod town;
pub mod graph;
pub mod generation;
pub mod routing;
pub mod map;
pub mod render;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{SettlementError, Result};
pub use config::{GenerationStrategy, MapConfig, MapConfigBuilder};
pub use town::{Archetype, ArchetypeWeights, Town};
pub use graph::RoadGraph;
pub use routing::Route;
pub use map::SettlementMap;
pub use render::{
    build_scene, ArchetypeColorMapper, ColorMapper, CustomColorMapper, MarkerColor, MarkerKind,
    RoadLine, SceneData, TownMarker,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam vector types for convenience
pub use glam::{DVec2, IVec2};
