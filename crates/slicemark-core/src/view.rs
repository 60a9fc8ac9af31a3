use crate::image::BaseImage;

/// A point in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

/// A point in physical units, derived from image spacing/origin and
/// independent of zoom/pan.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &WorldPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Discrete image-pixel indices. Signed so positions outside the image
/// extent are representable; callers decide whether to ignore them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexPoint {
    pub x: i64,
    pub y: i64,
}

impl IndexPoint {
    pub fn within(&self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }
}

/// Current zoom/pan of the viewport.
///
/// display = (world - pan) * zoom, so pan is the world point shown at the
/// viewport's top-left corner.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan: (f64, f64),
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: (0.0, 0.0),
        }
    }
}

impl ViewTransform {
    pub fn display_to_world(&self, p: DisplayPoint) -> WorldPoint {
        WorldPoint {
            x: p.x / self.zoom + self.pan.0,
            y: p.y / self.zoom + self.pan.1,
        }
    }

    pub fn world_to_display(&self, p: WorldPoint) -> DisplayPoint {
        DisplayPoint {
            x: (p.x - self.pan.0) * self.zoom,
            y: (p.y - self.pan.1) * self.zoom,
        }
    }
}

/// Nearest image index for a world point.
pub fn world_to_index(p: WorldPoint, image: &BaseImage) -> IndexPoint {
    let (sx, sy) = image.spacing();
    let (ox, oy) = image.origin();
    IndexPoint {
        x: ((p.x - ox) / sx).round() as i64,
        y: ((p.y - oy) / sy).round() as i64,
    }
}

/// World position of an image index (exact inverse of `world_to_index`
/// up to floating-point rounding).
pub fn index_to_world(p: IndexPoint, image: &BaseImage) -> WorldPoint {
    let (sx, sy) = image.spacing();
    let (ox, oy) = image.origin();
    WorldPoint {
        x: ox + p.x as f64 * sx,
        y: oy + p.y as f64 * sy,
    }
}

/// Map a viewport position straight to image indices.
pub fn display_to_index(p: DisplayPoint, view: &ViewTransform, image: &BaseImage) -> IndexPoint {
    world_to_index(view.display_to_world(p), image)
}
