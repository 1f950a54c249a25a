//! Core generation algorithms
//!
//! Places towns, triangulates them and wires them into a planar road
//! network. The orchestration loop that retries these stages lives in
//! [`SettlementMap::generate`](crate::SettlementMap::generate).

mod delaunay;
mod geometry;
mod placement;
mod roads;

pub use delaunay::{delaunay_edges, triangulate};
pub use geometry::{
    crosses_any, is_planar, passes_through_town, point_segment_distance, segments_cross,
    within_exclusion, within_max_length,
};
pub use placement::{place_towns, PLACEMENT_ATTEMPTS};
pub use roads::{accepts, DelaunayWiring, RandomWiring, RoadWiring};
