//! Half-plane clipping of Voronoi cells
//!
//! A bounded cell is the bounds rectangle intersected with, for every
//! Delaunay neighbor, the half-plane on the site's side of their bisector.

use glam::DVec2;

/// Consecutive outline points closer than this collapse into one
const DEDUP_TOLERANCE: f64 = 1e-7;

/// Clip a convex `polygon` to the half-plane closer to `site` than to `neighbor`
///
/// Sutherland–Hodgman against the perpendicular bisector of `site`–`neighbor`.
/// Points exactly on the bisector are kept.
pub fn clip_to_bisector(polygon: &[DVec2], site: DVec2, neighbor: DVec2) -> Vec<DVec2> {
    let Some(&last) = polygon.last() else {
        return Vec::new();
    };

    let midpoint = (site + neighbor) * 0.5;
    let direction = neighbor - site;
    let signed = |p: DVec2| (p - midpoint).dot(direction);

    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    let mut prev = last;
    let mut prev_dist = signed(prev);

    for &current in polygon {
        let curr_dist = signed(current);
        let prev_inside = prev_dist <= 0.0;
        let curr_inside = curr_dist <= 0.0;

        if prev_inside != curr_inside {
            let t = prev_dist / (prev_dist - curr_dist);
            push_distinct(&mut clipped, prev.lerp(current, t));
        }
        if curr_inside {
            push_distinct(&mut clipped, current);
        }

        prev = current;
        prev_dist = curr_dist;
    }

    while clipped.len() > 1 && clipped[0].abs_diff_eq(clipped[clipped.len() - 1], DEDUP_TOLERANCE) {
        clipped.pop();
    }
    clipped
}

/// The Voronoi cell of `site` closed against `[0, bounds.x] × [0, bounds.y]`
///
/// # Example
///
/// ```
/// use soap_cells::{clipped_cell, DVec2};
///
/// let cell = clipped_cell(
///     DVec2::new(25.0, 50.0),
///     [DVec2::new(75.0, 50.0)],
///     DVec2::new(100.0, 100.0),
/// );
/// // Left half of the square
/// assert_eq!(cell.len(), 4);
/// assert!(cell.iter().all(|v| v.x <= 50.0));
/// ```
pub fn clipped_cell(
    site: DVec2,
    neighbors: impl IntoIterator<Item = DVec2>,
    bounds: DVec2,
) -> Vec<DVec2> {
    let mut outline = vec![
        DVec2::ZERO,
        DVec2::new(bounds.x, 0.0),
        bounds,
        DVec2::new(0.0, bounds.y),
    ];

    for neighbor in neighbors {
        if neighbor == site {
            continue;
        }
        outline = clip_to_bisector(&outline, site, neighbor);
        if outline.is_empty() {
            break;
        }
    }
    outline
}

fn push_distinct(outline: &mut Vec<DVec2>, point: DVec2) {
    if outline
        .last()
        .map_or(true, |last| !last.abs_diff_eq(point, DEDUP_TOLERANCE))
    {
        outline.push(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(100.0, 100.0),
            DVec2::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_clip_halves_square() {
        let clipped = clip_to_bisector(&square(), DVec2::new(20.0, 50.0), DVec2::new(80.0, 50.0));
        assert_eq!(clipped.len(), 4);
        assert!(clipped.iter().all(|v| v.x <= 50.0 + 1e-9));
        assert!(clipped.iter().any(|v| v.abs_diff_eq(DVec2::new(50.0, 0.0), 1e-9)));
        assert!(clipped.iter().any(|v| v.abs_diff_eq(DVec2::new(50.0, 100.0), 1e-9)));
    }

    #[test]
    fn test_clip_through_corners_has_no_duplicates() {
        // Bisector of (10,10)-(90,90) passes exactly through two corners.
        let clipped = clip_to_bisector(&square(), DVec2::new(10.0, 10.0), DVec2::new(90.0, 90.0));
        assert_eq!(clipped.len(), 3);
    }

    #[test]
    fn test_clip_keeps_polygon_on_near_side() {
        let clipped = clip_to_bisector(&square(), DVec2::new(50.0, 50.0), DVec2::new(500.0, 50.0));
        assert_eq!(clipped, square());
    }

    #[test]
    fn test_clip_empty_polygon() {
        assert!(clip_to_bisector(&[], DVec2::ZERO, DVec2::ONE).is_empty());
    }

    #[test]
    fn test_clipped_cell_quadrant() {
        let cell = clipped_cell(
            DVec2::new(10.0, 10.0),
            [
                DVec2::new(10.0, 90.0),
                DVec2::new(90.0, 10.0),
                DVec2::new(90.0, 90.0),
            ],
            DVec2::new(100.0, 100.0),
        );
        assert_eq!(cell.len(), 4);
        for corner in [(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (0.0, 50.0)] {
            let corner = DVec2::new(corner.0, corner.1);
            assert!(cell.iter().any(|v| v.abs_diff_eq(corner, 1e-9)), "missing {:?}", corner);
        }
    }

    #[test]
    fn test_clipped_cell_ignores_coincident_neighbor() {
        let site = DVec2::new(30.0, 30.0);
        let cell = clipped_cell(site, [site], DVec2::new(100.0, 100.0));
        assert_eq!(cell.len(), 4);
    }
}
