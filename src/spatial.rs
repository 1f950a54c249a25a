//! Spatial indexing for pointer hit-testing
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around a 2D KD-tree of town positions
///
/// Answers "which town is closest to this point" in O(log n), which is what
/// a renderer needs to turn a mouse position into a town id.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
}

impl SpatialIndex {
    /// Build the index from town positions, indexed by town id
    ///
    /// # Example
    ///
    /// ```
    /// use settlement_gen::*;
    /// use glam::DVec2;
    ///
    /// let points = vec![DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0)];
    /// let index = SpatialIndex::new(&points);
    /// assert_eq!(index.find_nearest(DVec2::new(90.0, 5.0)).map(|(id, _)| id), Some(1));
    /// ```
    pub fn new(points: &[DVec2]) -> Self {
        if points.is_empty() {
            return Self { tree: None };
        }
        let entries: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&entries)),
        }
    }

    /// Nearest indexed point to `position`, with its Euclidean distance
    ///
    /// Returns `None` only for an empty index.
    pub fn find_nearest(&self, position: DVec2) -> Option<(usize, f64)> {
        let tree = self.tree.as_ref()?;
        let nearest = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some((nearest.item, nearest.distance.sqrt()))
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("populated", &self.tree.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let points = vec![
            DVec2::new(100.0, 100.0),
            DVec2::new(400.0, 120.0),
            DVec2::new(250.0, 380.0),
            DVec2::new(600.0, 500.0),
        ];
        let index = SpatialIndex::new(&points);

        assert_eq!(index.find_nearest(DVec2::new(110.0, 95.0)).map(|r| r.0), Some(0));
        assert_eq!(index.find_nearest(DVec2::new(390.0, 140.0)).map(|r| r.0), Some(1));
        assert_eq!(index.find_nearest(DVec2::new(260.0, 360.0)).map(|r| r.0), Some(2));
        assert_eq!(index.find_nearest(DVec2::new(900.0, 900.0)).map(|r| r.0), Some(3));
    }

    #[test]
    fn test_spatial_index_distance() {
        let index = SpatialIndex::new(&[DVec2::new(0.0, 0.0)]);
        let (id, distance) = index.find_nearest(DVec2::new(3.0, 4.0)).unwrap();
        assert_eq!(id, 0);
        assert!((distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(&[]);
        assert!(index.find_nearest(DVec2::ZERO).is_none());
    }
}
