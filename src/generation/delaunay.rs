//! Delaunay triangulation via Bowyer-Watson insertion
//!
//! Points are inserted one at a time into a triangulation seeded with an
//! oversized super-triangle. Each insertion removes every triangle whose
//! circumcircle contains the new point and re-triangulates the resulting
//! cavity. Triangles touching the super-triangle are discarded at the end.

use std::collections::BTreeSet;

use glam::DVec2;

/// Slack added to the squared circumradius in the inclusion test
const CIRCUMCIRCLE_EPSILON: f64 = 1e-8;

/// Circumcentre determinants below this magnitude are treated as degenerate
const DEGENERATE_DETERMINANT: f64 = 1e-12;

/// Triangle as three indices into the working point list
type Triangle = [usize; 3];

/// Circumcentre of triangle `abc`, or `None` if the points are (nearly) collinear
fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> Option<DVec2> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < DEGENERATE_DETERMINANT {
        return None;
    }
    let (a2, b2, c2) = (a.length_squared(), b.length_squared(), c.length_squared());
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    Some(DVec2::new(ux, uy))
}

/// Whether `point` lies inside (or on) the circumcircle of `triangle`
///
/// Degenerate triangles have no circumcircle and contain nothing.
fn in_circumcircle(point: DVec2, triangle: Triangle, points: &[DVec2]) -> bool {
    let [a, b, c] = triangle.map(|i| points[i]);
    match circumcenter(a, b, c) {
        Some(center) => {
            let radius_sq = center.distance_squared(a);
            center.distance_squared(point) <= radius_sq + CIRCUMCIRCLE_EPSILON
        }
        None => false,
    }
}

/// Super-triangle vertices enclosing every point strictly
fn super_triangle(points: &[DVec2]) -> [DVec2; 3] {
    let (min, max) = points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );
    let extent = max - min;
    let delta = extent.x.max(extent.y) * 10.0 + 1.0;
    let center = (min + max) / 2.0;

    [
        DVec2::new(center.x - 2.0 * delta, center.y - delta),
        DVec2::new(center.x, center.y + 2.0 * delta),
        DVec2::new(center.x + 2.0 * delta, center.y - delta),
    ]
}

/// Compute the Delaunay triangles of `points`
///
/// Returns index triples into `points`. Triangles touching the super-triangle
/// and degenerate (collinear) triangles are excluded.
pub fn triangulate(points: &[DVec2]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut all_points = points.to_vec();
    all_points.extend(super_triangle(points));

    let mut triangles: Vec<Triangle> = vec![[n, n + 1, n + 2]];

    for i in 0..n {
        let point = all_points[i];

        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|&tri| in_circumcircle(point, tri, &all_points));

        // Cavity boundary: edges of exactly one bad triangle. Shared edges
        // appear once in each orientation and cancel.
        let mut polygon: Vec<(usize, usize)> = Vec::new();
        for tri in &bad {
            for edge in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if let Some(pos) = polygon.iter().position(|&e| e == (edge.1, edge.0)) {
                    polygon.swap_remove(pos);
                } else {
                    polygon.push(edge);
                }
            }
        }

        triangles = good;
        triangles.extend(polygon.into_iter().map(|(a, b)| [a, b, i]));
    }

    triangles
        .into_iter()
        .filter(|tri| tri.iter().all(|&v| v < n))
        .filter(|tri| {
            let [a, b, c] = tri.map(|v| all_points[v]);
            circumcenter(a, b, c).is_some()
        })
        .collect()
}

/// Delaunay edge set of `points` as sorted `(low, high)` index pairs
///
/// Zero or one point yields no edges; two points yield the single segment
/// between them.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use settlement_gen::generation::delaunay_edges;
///
/// let points = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0), DVec2::new(5.0, 8.0)];
/// let edges = delaunay_edges(&points);
/// assert_eq!(edges.len(), 3);
/// ```
pub fn delaunay_edges(points: &[DVec2]) -> BTreeSet<(usize, usize)> {
    let n = points.len();
    if n < 2 {
        return BTreeSet::new();
    }
    if n == 2 {
        return BTreeSet::from([(0, 1)]);
    }

    let mut edges = BTreeSet::new();
    for tri in triangulate(points) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            edges.insert((a.min(b), a.max(b)));
        }
    }
    edges
}
