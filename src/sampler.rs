//! Color sampling from a reference image
//!
//! Simulation coordinates are `(x, y)`; the image is stored row-major, so a
//! lookup goes through [`ReferenceImage::pixel_index`], which truncates,
//! swaps to `(row = y, col = x)` and clamps into the image.

use std::path::Path;

use glam::DVec2;

use crate::error::{Result, SoapError};

/// 8-bit RGB color
pub type Rgb = [u8; 3];

/// Trait for mapping a simulation position to a fill color
pub trait ColorSampler {
    /// Color at `point`
    fn sample(&self, point: DVec2) -> Rgb;
}

/// Row/column address of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelIndex {
    /// Image row, from the `y` coordinate
    pub row: usize,
    /// Image column, from the `x` coordinate
    pub col: usize,
}

/// A decoded RGB image held in memory for the whole run
///
/// # Example
///
/// ```
/// use soap_cells::{ColorSampler, DVec2, ReferenceImage};
///
/// // 2x1 image: red, then blue
/// let image = ReferenceImage::from_rgb(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
/// assert_eq!(image.sample(DVec2::new(0.9, 0.5)), [255, 0, 0]);
/// assert_eq!(image.sample(DVec2::new(1.2, 0.0)), [0, 0, 255]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl ReferenceImage {
    /// Wrap a row-major `width × height × 3` buffer
    ///
    /// # Errors
    ///
    /// Returns `ImageLoad` if either dimension is zero or the buffer length
    /// does not match.
    pub fn from_rgb(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SoapError::ImageLoad(format!(
                "image must not be empty (got {}x{})",
                width, height
            )));
        }
        if pixels.len() != width * height * 3 {
            return Err(SoapError::ImageLoad(format!(
                "expected {} bytes for {}x{} RGB, got {}",
                width * height * 3,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Open and decode an image file, converting it to RGB8
    ///
    /// # Errors
    ///
    /// Returns `ImageLoad` if the file is missing, unreadable or not a
    /// supported image.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .map_err(|err| SoapError::ImageLoad(format!("{}: {}", path.display(), err)))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        tracing::info!(path = %path.display(), width, height, "reference image loaded");
        Self::from_rgb(width as usize, height as usize, decoded.into_raw())
    }

    /// Image width in pixels
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Simulation bounds `(W, H)` matching this image
    #[inline]
    pub fn bounds(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }

    /// Convert a simulation point to the pixel it falls in
    ///
    /// Coordinates truncate toward zero; anything outside the image (or NaN)
    /// is clamped to the nearest edge pixel.
    pub fn pixel_index(&self, point: DVec2) -> PixelIndex {
        PixelIndex {
            row: clamp_axis(point.y, self.height),
            col: clamp_axis(point.x, self.width),
        }
    }

    /// Color stored at a pixel
    #[inline]
    pub fn pixel(&self, index: PixelIndex) -> Rgb {
        let offset = (index.row * self.width + index.col) * 3;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ]
    }
}

impl ColorSampler for ReferenceImage {
    fn sample(&self, point: DVec2) -> Rgb {
        self.pixel(self.pixel_index(point))
    }
}

/// Sampler that returns the same color everywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UniformColor(pub Rgb);

impl ColorSampler for UniformColor {
    fn sample(&self, _point: DVec2) -> Rgb {
        self.0
    }
}

// `as usize` saturates negatives and NaN to 0.
#[inline]
fn clamp_axis(coordinate: f64, len: usize) -> usize {
    (coordinate.trunc() as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 wide, 2 tall; each pixel encodes its own (row, col)
    fn gradient() -> ReferenceImage {
        let mut pixels = Vec::new();
        for row in 0..2u8 {
            for col in 0..3u8 {
                pixels.extend_from_slice(&[row, col, 100]);
            }
        }
        ReferenceImage::from_rgb(3, 2, pixels).unwrap()
    }

    #[test]
    fn test_axis_swap() {
        let image = gradient();
        assert_eq!(image.pixel_index(DVec2::new(2.0, 1.0)), PixelIndex { row: 1, col: 2 });
        assert_eq!(image.sample(DVec2::new(2.0, 1.0)), [1, 2, 100]);
        assert_eq!(image.sample(DVec2::new(1.0, 0.0)), [0, 1, 100]);
    }

    #[test]
    fn test_truncation_not_rounding() {
        let image = gradient();
        assert_eq!(image.sample(DVec2::new(1.99, 0.99)), [0, 1, 100]);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let image = gradient();
        assert_eq!(image.pixel_index(DVec2::new(-4.0, 50.0)), PixelIndex { row: 1, col: 0 });
        assert_eq!(image.pixel_index(DVec2::new(3.0, 2.0)), PixelIndex { row: 1, col: 2 });
        assert_eq!(image.pixel_index(DVec2::new(f64::NAN, f64::NAN)), PixelIndex { row: 0, col: 0 });
    }

    #[test]
    fn test_bounds_match_dimensions() {
        let image = gradient();
        assert_eq!(image.bounds(), DVec2::new(3.0, 2.0));
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
    }

    #[test]
    fn test_from_rgb_validates() {
        assert!(ReferenceImage::from_rgb(0, 2, vec![]).is_err());
        assert!(ReferenceImage::from_rgb(2, 2, vec![0; 11]).is_err());
        assert!(ReferenceImage::from_rgb(2, 2, vec![0; 12]).is_ok());
    }

    #[test]
    fn test_missing_file_is_image_load_error() {
        let err = ReferenceImage::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, SoapError::ImageLoad(_)));
        assert!(err.to_string().contains("not/here.png"));
    }

    #[test]
    fn test_uniform_color() {
        let sampler = UniformColor([9, 8, 7]);
        assert_eq!(sampler.sample(DVec2::new(1e9, -1e9)), [9, 8, 7]);
    }
}
