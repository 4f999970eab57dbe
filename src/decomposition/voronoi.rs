//! Voronoi regions from the Delaunay triangulation
//!
//! Voronoi vertices are the circumcenters of Delaunay triangles, and the
//! region of a point is the fan of triangles around it. Points on the convex
//! hull own an unbounded region, marked by a single `None` entry.

use std::collections::BTreeSet;

use delaunator::{next_halfedge, Triangulation, EMPTY};
use glam::DVec2;

use super::clip::clipped_cell;
use super::delaunay::compute_delaunay;
use super::RenderPolygon;
use crate::error::{Result, SoapError};

/// Fewer distinct sites than this cannot be turned into a Voronoi diagram
pub const MIN_VORONOI_SITES: usize = 4;

/// Circumcenters closer than this are the same Voronoi vertex
const MERGE_TOLERANCE: f64 = 1e-9;

/// A Voronoi diagram in region/vertex-index form
///
/// `regions` and `point_region` are deliberately decoupled: points dropped by
/// the triangulation (exact duplicates) own no region, so region `i` does not
/// generally belong to point `i`.
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    /// Input points, in input order
    pub points: Vec<DVec2>,
    /// Finite Voronoi vertices
    pub vertices: Vec<DVec2>,
    /// Ordered vertex indices per region; `None` marks an edge running to infinity
    pub regions: Vec<Vec<Option<usize>>>,
    /// Region owned by each input point
    pub point_region: Vec<Option<usize>>,
    /// Delaunay neighbors of each input point, sorted
    pub neighbors: Vec<Vec<usize>>,
}

impl VoronoiDiagram {
    /// Compute the diagram of `points`
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if fewer than [`MIN_VORONOI_SITES`] distinct
    /// points survive triangulation, or if the points are collinear.
    pub fn compute(points: &[DVec2]) -> Result<Self> {
        let triangulation = compute_delaunay(points)?;

        let inedges = build_inedges(points.len(), &triangulation);
        let sites = inedges.iter().filter(|&&e| e != EMPTY).count();
        if sites < MIN_VORONOI_SITES {
            return Err(SoapError::DegenerateGeometry(format!(
                "{} distinct sites, need at least {}",
                sites, MIN_VORONOI_SITES
            )));
        }

        // One circumcenter per triangle; a sliver with no finite circumcenter
        // behaves like a vertex at infinity.
        let mut vertices = Vec::with_capacity(triangulation.triangles.len() / 3);
        let triangle_vertex: Vec<Option<usize>> = triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| {
                circumcenter(points[t[0]], points[t[1]], points[t[2]]).map(|c| {
                    vertices.push(c);
                    vertices.len() - 1
                })
            })
            .collect();

        let mut regions = Vec::with_capacity(sites);
        let mut point_region = vec![None; points.len()];

        for (point_idx, &start) in inedges.iter().enumerate() {
            if start == EMPTY {
                continue;
            }

            let mut region: Vec<Option<usize>> = Vec::new();
            if triangulation.halfedges[start] == EMPTY {
                region.push(None);
            }

            let mut incoming = start;
            loop {
                push_merged(&mut region, triangle_vertex[incoming / 3], &vertices);
                incoming = triangulation.halfedges[next_halfedge(incoming)];
                if incoming == EMPTY || incoming == start {
                    break;
                }
            }
            close_merged(&mut region, &vertices);

            point_region[point_idx] = Some(regions.len());
            regions.push(region);
        }

        Ok(Self {
            points: points.to_vec(),
            vertices,
            regions,
            point_region,
            neighbors: build_neighbors(points.len(), &triangulation),
        })
    }

    /// Number of regions
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// For each region, the first input point that owns it
    pub fn region_owners(&self) -> Vec<Option<usize>> {
        let mut owners = vec![None; self.regions.len()];
        for (point_idx, region) in self.point_region.iter().enumerate() {
            if let Some(region_idx) = *region {
                owners[region_idx].get_or_insert(point_idx);
            }
        }
        owners
    }

    /// Finite vertex coordinates of a region, open-edge markers removed
    pub fn region_vertices(&self, region_idx: usize) -> Vec<DVec2> {
        self.regions
            .get(region_idx)
            .map(|region| region.iter().flatten().map(|&v| self.vertices[v]).collect())
            .unwrap_or_default()
    }

    /// Renderable cells under the drop-open policy
    ///
    /// Each kept region is sampled at the input point that owns it.
    pub fn cell_polygons(&self) -> Vec<RenderPolygon> {
        self.region_owners()
            .into_iter()
            .enumerate()
            .filter(|(region_idx, _)| is_renderable_region(&self.regions[*region_idx]))
            .filter_map(|(region_idx, owner)| {
                owner.map(|point_idx| RenderPolygon {
                    sample_point: self.points[point_idx],
                    vertices: self.region_vertices(region_idx),
                })
            })
            .collect()
    }

    /// Every cell closed against the rectangle `[0, bounds.x] × [0, bounds.y]`
    pub fn clipped_polygons(&self, bounds: DVec2) -> Vec<RenderPolygon> {
        self.region_owners()
            .into_iter()
            .flatten()
            .filter_map(|point_idx| {
                let site = self.points[point_idx];
                let neighbors = self.neighbors[point_idx].iter().map(|&n| self.points[n]);
                let outline = clipped_cell(site, neighbors, bounds);
                (outline.len() >= 3).then(|| RenderPolygon {
                    sample_point: site,
                    vertices: outline,
                })
            })
            .collect()
    }
}

/// Whether a region can be filled as-is
///
/// A region is kept when it has more than 3 entries, or exactly 3 entries
/// none of which is an open-edge marker.
pub fn is_renderable_region(region: &[Option<usize>]) -> bool {
    region.len() > 3 || (region.len() == 3 && region.iter().all(Option::is_some))
}

/// One incoming halfedge per triangulated point, hull edges preferred
///
/// Starting the walk on a hull edge makes it cover the whole fan of a hull point.
fn build_inedges(point_count: usize, triangulation: &Triangulation) -> Vec<usize> {
    let mut inedges = vec![EMPTY; point_count];
    for edge in 0..triangulation.halfedges.len() {
        let endpoint = triangulation.triangles[next_halfedge(edge)];
        if triangulation.halfedges[edge] == EMPTY || inedges[endpoint] == EMPTY {
            inedges[endpoint] = edge;
        }
    }
    inedges
}

fn build_neighbors(point_count: usize, triangulation: &Triangulation) -> Vec<Vec<usize>> {
    let mut sets = vec![BTreeSet::new(); point_count];
    for t in triangulation.triangles.chunks_exact(3) {
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            sets[a].insert(b);
            sets[b].insert(a);
        }
    }
    sets.into_iter().map(|s| s.into_iter().collect()).collect()
}

fn same_vertex(a: Option<usize>, b: Option<usize>, vertices: &[DVec2]) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(i), Some(j)) => i == j || vertices[i].abs_diff_eq(vertices[j], MERGE_TOLERANCE),
        _ => false,
    }
}

fn push_merged(region: &mut Vec<Option<usize>>, entry: Option<usize>, vertices: &[DVec2]) {
    if let Some(&last) = region.last() {
        if same_vertex(last, entry, vertices) {
            return;
        }
    }
    region.push(entry);
}

fn close_merged(region: &mut Vec<Option<usize>>, vertices: &[DVec2]) {
    while region.len() > 1 && same_vertex(region[0], region[region.len() - 1], vertices) {
        region.pop();
    }
}

/// Circumcenter of triangle `abc`, or `None` for a degenerate triangle
fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> Option<DVec2> {
    let d = b - a;
    let e = c - a;
    let det = d.perp_dot(e);
    if det == 0.0 {
        return None;
    }

    let bl = d.length_squared();
    let cl = e.length_squared();
    let offset = DVec2::new(e.y * bl - d.y * cl, d.x * cl - e.x * bl) * (0.5 / det);
    let center = a + offset;
    center.is_finite().then_some(center)
}
