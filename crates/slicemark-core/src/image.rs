use ndarray::Array2;

use crate::error::{Result, SlicemarkError};

/// A single grayscale slice with physical geometry.
///
/// Pixel values are signed integers so CT-style intensity ranges survive
/// unchanged. The buffer is immutable for the lifetime of a load; a new
/// import replaces the whole image.
#[derive(Clone, Debug)]
pub struct BaseImage {
    /// Pixel data, row-major, shape = (height, width)
    pixels: Array2<i32>,
    /// Physical units per pixel (x, y)
    spacing: (f64, f64),
    /// World position of index (0, 0)
    origin: (f64, f64),
    /// Min/max sample value, computed once at construction
    intensity_range: (i32, i32),
}

/// Source-to-axis and source-to-detector distances reported by projection
/// modalities. Detector-plane spacing is rescaled to the isocenter plane by
/// `sad / sid`, once, at import.
#[derive(Clone, Copy, Debug)]
pub struct ProjectionGeometry {
    pub sad: f64,
    pub sid: f64,
}

impl ProjectionGeometry {
    pub fn rescale(&self, spacing: (f64, f64)) -> (f64, f64) {
        let ratio = self.sad / self.sid;
        (spacing.0 * ratio, spacing.1 * ratio)
    }
}

impl BaseImage {
    pub fn new(pixels: Array2<i32>, spacing: (f64, f64), origin: (f64, f64)) -> Result<Self> {
        let (h, w) = pixels.dim();
        if h == 0 || w == 0 {
            return Err(SlicemarkError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        // Also rejects NaN; every coordinate mapping divides by spacing
        if !(spacing.0 > 0.0) || !(spacing.1 > 0.0) {
            return Err(SlicemarkError::InvalidSpacing(spacing.0, spacing.1));
        }

        let mut min = i32::MAX;
        let mut max = i32::MIN;
        for &v in pixels.iter() {
            min = min.min(v);
            max = max.max(v);
        }

        Ok(Self {
            pixels,
            spacing,
            origin,
            intensity_range: (min, max),
        })
    }

    /// Import an image, applying the projection spacing rescale when the
    /// modality reports source distances.
    pub fn import(
        pixels: Array2<i32>,
        spacing: (f64, f64),
        origin: (f64, f64),
        geometry: Option<ProjectionGeometry>,
    ) -> Result<Self> {
        let spacing = match geometry {
            Some(g) => g.rescale(spacing),
            None => spacing,
        };
        Self::new(pixels, spacing, origin)
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn spacing(&self) -> (f64, f64) {
        self.spacing
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn intensity_range(&self) -> (i32, i32) {
        self.intensity_range
    }

    pub fn pixels(&self) -> &Array2<i32> {
        &self.pixels
    }

    /// Bounds-checked sample read.
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        self.pixels.get((y, x)).copied()
    }

    /// Default contrast window: level at the midpoint of the intensity
    /// range, width spanning the full range.
    pub fn default_window(&self) -> (f64, f64) {
        let (min, max) = self.intensity_range;
        let level = (min as f64 + max as f64) / 2.0;
        let width = ((max - min) as f64).max(1.0);
        (level, width)
    }
}
