use serde::{Deserialize, Serialize};

use crate::error::{Result, SlicemarkError};
use crate::mask::RasterMask;
use crate::view::WorldPoint;

/// Characters that would break the per-layer file naming on common
/// filesystems. Rejected by `validate_name`.
const RESERVED_NAME_CHARS: &str = "<>:\"/\\|?*";

/// File stems the workspace data directory claims for its own files; a
/// layer with one of these names would overwrite them on save.
const RESERVED_NAMES: [&str; 1] = ["input_image"];

/// An RGB render color. Stored as three 0-255 channels; serialized as a
/// 3-integer array in the workspace manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Build from unclamped channel values; out-of-range input is clamped,
    /// not rejected.
    pub fn clamped(r: i32, g: i32, b: i32) -> Self {
        Self([
            r.clamp(0, 255) as u8,
            g.clamp(0, 255) as u8,
            b.clamp(0, 255) as u8,
        ])
    }
}

/// Reject empty names, names containing reserved path characters, and
/// names reserved for workspace files.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SlicemarkError::InvalidName(name.to_string()));
    }
    if name.chars().any(|c| RESERVED_NAME_CHARS.contains(c)) {
        return Err(SlicemarkError::InvalidName(name.to_string()));
    }
    // Case-insensitive: layer files land on case-insensitive filesystems
    if RESERVED_NAMES.iter().any(|r| name.eq_ignore_ascii_case(r)) {
        return Err(SlicemarkError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A binary region mask over the base image.
#[derive(Clone, Debug)]
pub struct SegmentationLayer {
    pub name: String,
    pub mask: RasterMask,
    pub visible: bool,
    pub color: Rgb,
    alpha: f64,
    pub modified: bool,
}

impl SegmentationLayer {
    pub fn new(name: String, mask: RasterMask, color: Rgb) -> Self {
        Self {
            name,
            mask,
            visible: true,
            color,
            alpha: 0.5,
            modified: false,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Alpha is always a valid blend factor; input is clamped to [0, 1].
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
        self.modified = true;
    }
}

/// A labeled world-space point.
#[derive(Clone, Debug)]
pub struct PointEntity {
    pub name: String,
    pub position: WorldPoint,
    pub color: Rgb,
    pub visible: bool,
    pub modified: bool,
}

impl PointEntity {
    pub fn new(name: String, position: WorldPoint, color: Rgb) -> Self {
        Self {
            name,
            position,
            color,
            visible: true,
            modified: false,
        }
    }
}

/// A measurement line between two world-space endpoints.
#[derive(Clone, Debug)]
pub struct LineEntity {
    pub name: String,
    pub point1: WorldPoint,
    pub point2: WorldPoint,
    pub color: Rgb,
    width: f64,
    pub visible: bool,
    pub modified: bool,
}

impl LineEntity {
    pub fn new(name: String, point1: WorldPoint, point2: WorldPoint, color: Rgb) -> Self {
        Self {
            name,
            point1,
            point2,
            color,
            width: 1.0,
            visible: true,
            modified: false,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width.max(f64::MIN_POSITIVE);
        self.modified = true;
    }

    /// Physical length of the line.
    pub fn length(&self) -> f64 {
        self.point1.distance(&self.point2)
    }
}

/// An axis-aligned rectangle defined by two opposite corners.
#[derive(Clone, Debug)]
pub struct RectEntity {
    pub name: String,
    corner1: WorldPoint,
    corner2: WorldPoint,
    pub color: Rgb,
    pub visible: bool,
    pub modified: bool,
    min_size: (f64, f64),
}

impl RectEntity {
    pub fn new(name: String, corner1: WorldPoint, corner2: WorldPoint, color: Rgb) -> Self {
        let mut rect = Self {
            name,
            corner1,
            corner2,
            color,
            visible: true,
            modified: false,
            min_size: (1.0, 1.0),
        };
        rect.normalize();
        rect
    }

    pub fn min_size(&self) -> (f64, f64) {
        self.min_size
    }

    /// Corner with the smaller x/y after normalization.
    pub fn corner1(&self) -> WorldPoint {
        self.corner1
    }

    /// Corner with the larger x/y after normalization.
    pub fn corner2(&self) -> WorldPoint {
        self.corner2
    }

    /// Replace both corners. The minimum-size constraint is re-applied on
    /// every resize by expanding the short axis around its center.
    pub fn set_corners(&mut self, corner1: WorldPoint, corner2: WorldPoint) {
        self.corner1 = corner1;
        self.corner2 = corner2;
        self.normalize();
        self.modified = true;
    }

    fn normalize(&mut self) {
        let (mut x_min, mut x_max) = ordered(self.corner1.x, self.corner2.x);
        let (mut y_min, mut y_max) = ordered(self.corner1.y, self.corner2.y);

        if x_max - x_min < self.min_size.0 {
            let center = (x_min + x_max) / 2.0;
            x_min = center - self.min_size.0 / 2.0;
            x_max = center + self.min_size.0 / 2.0;
        }
        if y_max - y_min < self.min_size.1 {
            let center = (y_min + y_max) / 2.0;
            y_min = center - self.min_size.1 / 2.0;
            y_max = center + self.min_size.1 / 2.0;
        }

        self.corner1 = WorldPoint::new(x_min, y_min);
        self.corner2 = WorldPoint::new(x_max, y_max);
    }

    pub fn width(&self) -> f64 {
        self.corner2.x - self.corner1.x
    }

    pub fn height(&self) -> f64 {
        self.corner2.y - self.corner1.y
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_rejects_reserved_chars() {
        assert!(validate_name("tumor/left").is_err());
        assert!(validate_name("a:b").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Layer 1").is_ok());
    }

    #[test]
    fn validate_name_rejects_workspace_file_stems() {
        assert!(validate_name("input_image").is_err());
        assert!(validate_name("Input_Image").is_err());
        assert!(validate_name("input_image 2").is_ok());
    }

    #[test]
    fn rgb_clamps_out_of_range_channels() {
        assert_eq!(Rgb::clamped(-10, 300, 128), Rgb([0, 255, 128]));
    }

    #[test]
    fn alpha_is_clamped_to_unit_interval() {
        let mut layer =
            SegmentationLayer::new("a".into(), RasterMask::zeros(4, 4), Rgb([255, 0, 0]));
        layer.set_alpha(1.5);
        assert_eq!(layer.alpha(), 1.0);
        layer.set_alpha(-0.5);
        assert_eq!(layer.alpha(), 0.0);
    }

    #[test]
    fn rect_enforces_min_size_around_center() {
        let mut rect = RectEntity::new(
            "r".into(),
            WorldPoint::new(10.0, 10.0),
            WorldPoint::new(10.2, 30.0),
            Rgb([255, 0, 0]),
        );
        assert!((rect.width() - 1.0).abs() < 1e-9);
        assert!((rect.height() - 20.0).abs() < 1e-9);
        // Center of the short axis is preserved
        assert!((rect.corner1().x + rect.corner2().x - 20.2).abs() < 1e-9);

        rect.set_corners(WorldPoint::new(0.0, 0.0), WorldPoint::new(5.0, 0.1));
        assert!((rect.height() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rect_normalizes_swapped_corners() {
        let rect = RectEntity::new(
            "r".into(),
            WorldPoint::new(20.0, 5.0),
            WorldPoint::new(2.0, 40.0),
            Rgb([0, 255, 0]),
        );
        assert_eq!(rect.corner1(), WorldPoint::new(2.0, 5.0));
        assert_eq!(rect.corner2(), WorldPoint::new(20.0, 40.0));
    }
}
