//! Spatial indexing for fast position-to-center lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around a 2D KD-tree over center positions
///
/// The nearest center to a point is the center whose Voronoi cell contains
/// it, so this answers "which cell is under the cursor" without decomposing.
/// Positions change every tick, so an index is a snapshot and is rebuilt per query batch.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build an index from center positions
    ///
    /// # Example
    ///
    /// ```
    /// use soap_cells::*;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let centers = vec![DVec2::new(10.0, 10.0), DVec2::new(90.0, 90.0)];
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(DVec2::new(20.0, 5.0)), Some(0));
    /// # }
    /// ```
    pub fn new(centers: &[DVec2]) -> Self {
        if centers.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f64; 2]> = centers.iter().map(|c| [c.x, c.y]).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Index of the center nearest to `position`, or `None` for an empty index
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let query = [position.x, position.y];
        Some(tree.nearest_one::<SquaredEuclidean>(&query).item as usize)
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_quadrants() {
        let centers = vec![
            DVec2::new(10.0, 10.0),
            DVec2::new(10.0, 90.0),
            DVec2::new(90.0, 10.0),
            DVec2::new(90.0, 90.0),
        ];
        let index = SpatialIndex::new(&centers);

        assert_eq!(index.find_nearest(DVec2::new(40.0, 45.0)), Some(0));
        assert_eq!(index.find_nearest(DVec2::new(5.0, 60.0)), Some(1));
        assert_eq!(index.find_nearest(DVec2::new(70.0, 0.0)), Some(2));
        assert_eq!(index.find_nearest(DVec2::new(99.0, 99.0)), Some(3));
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let centers = vec![DVec2::new(3.0, 4.0), DVec2::new(30.0, 40.0)];
        let index = SpatialIndex::new(&centers);
        assert_eq!(index.find_nearest(centers[1]), Some(1));
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(&[]);
        assert_eq!(index.find_nearest(DVec2::ZERO), None);
    }
}
