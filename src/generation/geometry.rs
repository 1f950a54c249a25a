//! Planar geometry predicates shared by both wiring strategies
//!
//! Crossing tests run on exact integer coordinates; distances are computed in
//! `f64`. Degenerate inputs (zero-length segments, collinear points) are
//! ordinary cases, never errors.

use glam::{DVec2, IVec2};

use crate::graph::RoadGraph;
use crate::town::Town;

/// Z component of `(a - o) × (b - o)`
#[inline]
fn cross(o: IVec2, a: IVec2, b: IVec2) -> i64 {
    let (ox, oy) = (o.x as i64, o.y as i64);
    (a.x as i64 - ox) * (b.y as i64 - oy) - (a.y as i64 - oy) * (b.x as i64 - ox)
}

/// Whether segments `p1p2` and `p3p4` properly cross
///
/// Strict sign test on both diagonals: touching, collinear overlap and
/// shared endpoints do not count as a crossing.
pub fn segments_cross(p1: IVec2, p2: IVec2, p3: IVec2, p4: IVec2) -> bool {
    let d1 = cross(p1, p2, p3).signum() * cross(p1, p2, p4).signum();
    let d2 = cross(p3, p4, p1).signum() * cross(p3, p4, p2).signum();
    d1 < 0 && d2 < 0
}

/// Distance from `point` to the segment `ab`
///
/// Projects onto the segment, clamps the parameter to `[0, 1]` and measures
/// to the clamped point. A zero-length segment reduces to point distance.
pub fn point_segment_distance(point: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let denom = ab.length_squared();
    if denom == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / denom).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Whether `point` lies within `exclusion` of the segment `ab` (inclusive)
#[inline]
pub fn within_exclusion(point: DVec2, a: DVec2, b: DVec2, exclusion: f64) -> bool {
    point_segment_distance(point, a, b) <= exclusion
}

/// Whether the road between `a` and `b` respects the length limit (inclusive)
#[inline]
pub fn within_max_length(a: &Town, b: &Town, max_length: f64) -> bool {
    a.distance_to(b) <= max_length
}

/// Whether any town other than `a` and `b` lies within `exclusion` of road `ab`
pub fn passes_through_town(towns: &[Town], a: usize, b: usize, exclusion: f64) -> bool {
    let (pa, pb) = (towns[a].point(), towns[b].point());
    towns
        .iter()
        .filter(|t| t.id != a && t.id != b)
        .any(|t| within_exclusion(t.point(), pa, pb, exclusion))
}

/// Whether road `ab` crosses any road already in `graph`
///
/// Roads sharing an endpoint with `ab` are skipped.
pub fn crosses_any(towns: &[Town], graph: &RoadGraph, a: usize, b: usize) -> bool {
    let (pa, pb) = (towns[a].position, towns[b].position);
    graph.roads().into_iter().any(|(c, d)| {
        if c == a || c == b || d == a || d == b {
            return false;
        }
        segments_cross(pa, pb, towns[c].position, towns[d].position)
    })
}

/// Whether no two roads in `graph` cross
///
/// Exhaustive pairwise scan; pairs sharing an endpoint are skipped.
pub fn is_planar(towns: &[Town], graph: &RoadGraph) -> bool {
    let roads = graph.roads();
    for (i, &(a1, a2)) in roads.iter().enumerate() {
        for &(b1, b2) in &roads[i + 1..] {
            if a1 == b1 || a1 == b2 || a2 == b1 || a2 == b2 {
                continue;
            }
            if segments_cross(
                towns[a1].position,
                towns[a2].position,
                towns[b1].position,
                towns[b2].position,
            ) {
                return false;
            }
        }
    }
    true
}
