//! Delaunay triangulation of the center snapshot
//!
//! A thin wrapper around `delaunator`. The triangulation drives both the
//! triangle view and the Voronoi construction.

use delaunator::{triangulate, Point, Triangulation};
use glam::DVec2;

use super::RenderPolygon;
use crate::error::{Result, SoapError};

/// Triangulate `points`
///
/// Triangle `t` is `triangles[3t..3t + 3]`, indexing into `points`.
/// Exact duplicates are left out of the triangulation.
///
/// # Errors
///
/// Returns `DegenerateGeometry` for fewer than 3 points, or when no triangle
/// can be formed (all points coincident or collinear).
pub fn compute_delaunay(points: &[DVec2]) -> Result<Triangulation> {
    if points.len() < 3 {
        return Err(SoapError::DegenerateGeometry(format!(
            "{} points, need at least 3",
            points.len()
        )));
    }

    let input: Vec<Point> = points.iter().map(|p| Point { x: p.x, y: p.y }).collect();
    let triangulation = triangulate(&input);

    if triangulation.triangles.is_empty() {
        return Err(SoapError::DegenerateGeometry(
            "points are coincident or collinear".to_string(),
        ));
    }
    Ok(triangulation)
}

/// Color sample point of a triangle: its centroid, truncated toward zero
#[inline]
pub fn centroid_sample(a: DVec2, b: DVec2, c: DVec2) -> DVec2 {
    ((a + b + c) / 3.0).trunc()
}

/// One polygon per triangle, sampled at its truncated centroid
pub fn triangle_polygons(points: &[DVec2], triangulation: &Triangulation) -> Vec<RenderPolygon> {
    triangulation
        .triangles
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (points[t[0]], points[t[1]], points[t[2]]);
            RenderPolygon {
                sample_point: centroid_sample(a, b, c),
                vertices: vec![a, b, c],
            }
        })
        .collect()
}
