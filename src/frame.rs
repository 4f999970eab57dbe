//! Frame generation for the cell simulation
//!
//! Produces backend-agnostic fill commands; the display layer only needs to
//! clear the window and fill flat-colored polygons.

use glam::DVec2;

use crate::decomposition::PlanarDecomposer;
use crate::sampler::{ColorSampler, Rgb};
use crate::world::SimulationWorld;

/// Drawing surface provided by the windowing layer
pub trait Canvas {
    /// Fill the whole surface with `color`
    fn clear(&mut self, color: Rgb);

    /// Fill a polygon with a single flat color
    fn fill_polygon(&mut self, vertices: &[DVec2], color: Rgb);

    /// Show what has been drawn since the last clear
    fn present(&mut self) {}
}

/// A polygon with its resolved fill color
#[derive(Debug, Clone, PartialEq)]
pub struct FilledPolygon {
    /// Fill color
    pub color: Rgb,
    /// Ordered outline
    pub vertices: Vec<DVec2>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameData {
    /// Clear color
    pub background: Rgb,
    /// Polygons, drawn in order
    pub polygons: Vec<FilledPolygon>,
}

impl FrameData {
    /// Number of polygons
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Check if the frame only shows the background
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Clear `canvas`, fill every polygon, then present
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear(self.background);
        for polygon in &self.polygons {
            canvas.fill_polygon(&polygon.vertices, polygon.color);
        }
        canvas.present();
    }
}

/// Decompose the world's current positions and color every polygon
///
/// A degenerate layout yields a frame with no polygons.
pub fn build_frame<S>(world: &SimulationWorld, decomposer: &PlanarDecomposer, sampler: &S) -> FrameData
where
    S: ColorSampler + ?Sized,
{
    let polygons = decomposer
        .decompose(&world.positions(), world.mode())
        .into_iter()
        .map(|polygon| FilledPolygon {
            color: sampler.sample(polygon.sample_point),
            vertices: polygon.vertices,
        })
        .collect();

    FrameData {
        background: world.config().background,
        polygons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SoapConfigBuilder;
    use crate::decomposition::{DecompositionMode, RegionPolicy};
    use crate::sampler::{ReferenceImage, UniformColor};

    /// Records draw calls instead of rasterizing
    #[derive(Default)]
    struct RecordingCanvas {
        cleared: Vec<Rgb>,
        fills: Vec<(usize, Rgb)>,
        presents: usize,
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self, color: Rgb) {
            self.cleared.push(color);
        }

        fn fill_polygon(&mut self, vertices: &[DVec2], color: Rgb) {
            self.fills.push((vertices.len(), color));
        }

        fn present(&mut self) {
            self.presents += 1;
        }
    }

    fn quadrant_image() -> ReferenceImage {
        // 100x100: left half red, right half blue
        let mut pixels = Vec::with_capacity(100 * 100 * 3);
        for _row in 0..100 {
            for col in 0..100 {
                let rgb: Rgb = if col < 50 { [255, 0, 0] } else { [0, 0, 255] };
                pixels.extend_from_slice(&rgb);
            }
        }
        ReferenceImage::from_rgb(100, 100, pixels).unwrap()
    }

    fn corner_world() -> SimulationWorld {
        let config = SoapConfigBuilder::new()
            .seed(1)
            .region_policy(RegionPolicy::ClipToBounds)
            .build()
            .unwrap();
        SimulationWorld::with_positions(
            config,
            DVec2::new(100.0, 100.0),
            &[
                DVec2::new(10.0, 10.0),
                DVec2::new(10.0, 90.0),
                DVec2::new(90.0, 10.0),
                DVec2::new(90.0, 90.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_frame_colors_follow_sample_points() {
        let world = corner_world();
        let decomposer = PlanarDecomposer::new(world.config().region_policy, world.bounds());
        let frame = build_frame(&world, &decomposer, &quadrant_image());

        assert_eq!(frame.polygon_count(), 4);
        assert_eq!(frame.background, [63, 63, 63]);
        let red = frame.polygons.iter().filter(|p| p.color == [255, 0, 0]).count();
        let blue = frame.polygons.iter().filter(|p| p.color == [0, 0, 255]).count();
        assert_eq!((red, blue), (2, 2));
        for polygon in &frame.polygons {
            let left = polygon.vertices.iter().all(|v| v.x <= 50.0 + 1e-9);
            assert_eq!(left, polygon.color == [255, 0, 0]);
        }
    }

    #[test]
    fn test_draw_clears_then_fills() {
        let mut world = corner_world();
        world.set_mode(DecompositionMode::Delaunay);
        let decomposer = PlanarDecomposer::new(RegionPolicy::DropOpen, world.bounds());
        let frame = build_frame(&world, &decomposer, &UniformColor([1, 2, 3]));

        let mut canvas = RecordingCanvas::default();
        frame.draw(&mut canvas);

        assert_eq!(canvas.cleared, vec![[63, 63, 63]]);
        assert_eq!(canvas.fills, vec![(3, [1, 2, 3]), (3, [1, 2, 3])]);
        assert_eq!(canvas.presents, 1);
    }

    #[test]
    fn test_degenerate_world_draws_background_only() {
        let config = SoapConfigBuilder::new().seed(3).build().unwrap();
        let world = SimulationWorld::with_positions(
            config,
            DVec2::new(10.0, 10.0),
            &[DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)],
        )
        .unwrap();
        let decomposer = PlanarDecomposer::new(RegionPolicy::DropOpen, world.bounds());
        let frame = build_frame(&world, &decomposer, &UniformColor::default());

        assert!(frame.is_empty());
        let mut canvas = RecordingCanvas::default();
        frame.draw(&mut canvas);
        assert_eq!(canvas.cleared.len(), 1);
        assert!(canvas.fills.is_empty());
    }
}
