//! Per-frame planar decomposition
//!
//! Turns a snapshot of center positions into renderable polygons, either
//! Voronoi cells (sampled at their owning center) or Delaunay triangles
//! (sampled at their truncated centroid).

mod clip;
mod delaunay;
mod voronoi;

pub use clip::{clip_to_bisector, clipped_cell};
pub use delaunay::{centroid_sample, compute_delaunay, triangle_polygons};
pub use voronoi::{is_renderable_region, VoronoiDiagram, MIN_VORONOI_SITES};

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which decomposition is drawn
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecompositionMode {
    /// One polygon per center
    #[default]
    Voronoi,
    /// One triangle per Delaunay simplex
    Delaunay,
}

impl DecompositionMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            DecompositionMode::Voronoi => DecompositionMode::Delaunay,
            DecompositionMode::Delaunay => DecompositionMode::Voronoi,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            DecompositionMode::Voronoi => "Voronoi",
            DecompositionMode::Delaunay => "Delaunay",
        }
    }
}

/// How Voronoi cells that extend to infinity are handled
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionPolicy {
    /// Keep a region only if it has more than 3 entries, or exactly 3 finite
    /// vertices; open-edge markers are dropped from what is kept
    #[default]
    DropOpen,
    /// Close every cell by intersecting it with the simulation bounds
    ClipToBounds,
}

/// A polygon ready to be filled, with the point its color is sampled at
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPolygon {
    /// Where the fill color is looked up
    pub sample_point: DVec2,
    /// Ordered polygon outline
    pub vertices: Vec<DVec2>,
}

impl RenderPolygon {
    /// Number of outline vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Unsigned area (shoelace formula)
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for i in 0..self.vertices.len() {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % self.vertices.len()];
            twice_area += a.perp_dot(b);
        }
        twice_area.abs() * 0.5
    }
}

/// Computes renderable polygons from center positions
///
/// # Example
///
/// ```
/// use soap_cells::{DecompositionMode, DVec2, PlanarDecomposer, RegionPolicy};
///
/// let decomposer = PlanarDecomposer::new(RegionPolicy::DropOpen, DVec2::new(100.0, 100.0));
/// let points = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0), DVec2::new(0.0, 7.0)];
///
/// let triangles = decomposer.decompose(&points, DecompositionMode::Delaunay);
/// assert_eq!(triangles.len(), 1);
/// assert_eq!(triangles[0].sample_point, DVec2::new(3.0, 2.0));
///
/// // Two points cannot be decomposed; the frame is simply empty.
/// assert!(decomposer.decompose(&points[..2], DecompositionMode::Voronoi).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarDecomposer {
    policy: RegionPolicy,
    bounds: DVec2,
}

impl PlanarDecomposer {
    /// Create a decomposer; `bounds` is only used by [`RegionPolicy::ClipToBounds`]
    pub fn new(policy: RegionPolicy, bounds: DVec2) -> Self {
        Self { policy, bounds }
    }

    /// Open-region policy in effect
    #[inline]
    pub fn policy(&self) -> RegionPolicy {
        self.policy
    }

    /// Bounds used for clipping
    #[inline]
    pub fn bounds(&self) -> DVec2 {
        self.bounds
    }

    /// Decompose `points`, reporting degenerate input as an error
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` when there are too few distinct points or
    /// they are all collinear.
    pub fn try_decompose(
        &self,
        points: &[DVec2],
        mode: DecompositionMode,
    ) -> Result<Vec<RenderPolygon>> {
        match mode {
            DecompositionMode::Voronoi => {
                let diagram = VoronoiDiagram::compute(points)?;
                Ok(match self.policy {
                    RegionPolicy::DropOpen => diagram.cell_polygons(),
                    RegionPolicy::ClipToBounds => diagram.clipped_polygons(self.bounds),
                })
            }
            DecompositionMode::Delaunay => {
                let triangulation = compute_delaunay(points)?;
                Ok(triangle_polygons(points, &triangulation))
            }
        }
    }

    /// Decompose `points`; degenerate input yields an empty frame
    pub fn decompose(&self, points: &[DVec2], mode: DecompositionMode) -> Vec<RenderPolygon> {
        match self.try_decompose(points, mode) {
            Ok(polygons) => polygons,
            Err(err) => {
                tracing::debug!(error = %err, mode = mode.name(), points = points.len(), "frame skipped");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decomposer() -> PlanarDecomposer {
        PlanarDecomposer::new(RegionPolicy::DropOpen, DVec2::new(100.0, 100.0))
    }

    #[test]
    fn test_mode_toggle_round_trip() {
        assert_eq!(DecompositionMode::Voronoi.toggled(), DecompositionMode::Delaunay);
        assert_eq!(DecompositionMode::Voronoi.toggled().toggled(), DecompositionMode::Voronoi);
    }

    #[test]
    fn test_degenerate_inputs_are_empty_in_both_modes() {
        let p = DVec2::new(42.0, 17.0);
        let cases: Vec<Vec<DVec2>> = vec![vec![], vec![p], vec![p, p], vec![p, p, p]];

        for points in &cases {
            for mode in [DecompositionMode::Voronoi, DecompositionMode::Delaunay] {
                assert!(decomposer().decompose(points, mode).is_empty());
                assert!(decomposer().try_decompose(points, mode).is_err());
            }
        }
    }

    #[test]
    fn test_collinear_points_are_empty() {
        let points: Vec<DVec2> = (0..10).map(|i| DVec2::new(i as f64 * 5.0, 20.0)).collect();
        assert!(decomposer().decompose(&points, DecompositionMode::Voronoi).is_empty());
        assert!(decomposer().decompose(&points, DecompositionMode::Delaunay).is_empty());
    }

    #[test]
    fn test_render_polygon_area() {
        let square = RenderPolygon {
            sample_point: DVec2::ZERO,
            vertices: vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(2.0, 2.0),
                DVec2::new(0.0, 2.0),
            ],
        };
        assert_eq!(square.area(), 4.0);
        assert_eq!(square.vertex_count(), 4);
    }

    #[test]
    fn test_corner_scenario_with_clipping() {
        let points = [
            DVec2::new(10.0, 10.0),
            DVec2::new(10.0, 90.0),
            DVec2::new(90.0, 10.0),
            DVec2::new(90.0, 90.0),
        ];
        let clipper = PlanarDecomposer::new(RegionPolicy::ClipToBounds, DVec2::new(100.0, 100.0));
        let cells = clipper.decompose(&points, DecompositionMode::Voronoi);

        assert_eq!(cells.len(), 4);
        for cell in &cells {
            assert!(points.contains(&cell.sample_point));
            assert_eq!(cell.vertex_count(), 4);
            assert!((cell.area() - 2500.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_corner_scenario_drops_open_cells() {
        // Every cell of four cocircular points is unbounded with too few finite vertices.
        let points = [
            DVec2::new(10.0, 10.0),
            DVec2::new(10.0, 90.0),
            DVec2::new(90.0, 10.0),
            DVec2::new(90.0, 90.0),
        ];
        assert!(decomposer().decompose(&points, DecompositionMode::Voronoi).is_empty());
        assert_eq!(decomposer().decompose(&points, DecompositionMode::Delaunay).len(), 2);
    }
}
