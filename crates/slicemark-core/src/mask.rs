use ndarray::Array2;

use crate::error::{Result, SlicemarkError};

/// A single-channel binary mask with the same dimensions as the base image.
///
/// Values are constrained to {0, 1}. The elliptical stamp is the sole
/// mutation primitive: value 1 paints, value 0 erases.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterMask {
    data: Array2<u8>,
}

impl RasterMask {
    /// A zeroed mask of the given dimensions.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    /// Rebuild a mask from raw row-major bytes, e.g. from the codec.
    pub fn from_raw(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self> {
        let data = Array2::from_shape_vec((height, width), bytes)
            .map_err(|e| SlicemarkError::Codec(format!("mask buffer size mismatch: {e}")))?;
        Ok(Self {
            data: data.mapv(|v| if v != 0 { 1 } else { 0 }),
        })
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Bounds-checked read; out of bounds reads as background (0).
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 {
            return 0;
        }
        self.data
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Fill every in-bounds cell inside the ellipse
    /// `(i/radius_x)^2 + (j/radius_y)^2 <= 1` centered at (cx, cy).
    ///
    /// Radii may differ per axis so the brush stays circular in world units
    /// under anisotropic pixel spacing. The stamp uses the radii passed for
    /// this call only; nothing is interpolated here.
    pub fn set_circle(&mut self, cx: i64, cy: i64, radius_x: f64, radius_y: f64, value: u8) {
        let value = if value != 0 { 1 } else { 0 };
        let rx = radius_x.max(0.0);
        let ry = radius_y.max(0.0);
        let ri = rx.floor() as i64;
        let rj = ry.floor() as i64;

        for j in -rj..=rj {
            for i in -ri..=ri {
                let nx = if rx > 0.0 { i as f64 / rx } else { 0.0 };
                let ny = if ry > 0.0 { j as f64 / ry } else { 0.0 };
                if nx * nx + ny * ny <= 1.0 {
                    let x = cx + i;
                    let y = cy + j;
                    if x >= 0 && y >= 0 {
                        if let Some(cell) = self.data.get_mut((y as usize, x as usize)) {
                            *cell = value;
                        }
                    }
                }
            }
        }
    }

    /// Set every cell to the given value (clamped to {0, 1}).
    pub fn fill(&mut self, value: u8) {
        let value = if value != 0 { 1 } else { 0 };
        self.data.fill(value);
    }

    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn data(&self) -> &Array2<u8> {
        &self.data
    }

    /// Row-major byte view for the codec.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice().expect("mask buffer is contiguous")
    }
}
