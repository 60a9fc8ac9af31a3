use serde::{Deserialize, Serialize};

use crate::layer::Rgb;
use crate::view::WorldPoint;

/// Current workspace document format version.
pub const MANIFEST_VERSION: u32 = 1;

/// The workspace metadata document (`workspace.json`). Raster layers
/// reference sibling .mha files; vector layers are stored inline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub input_image: InputImageEntry,
    pub window_settings: WindowEntry,
    #[serde(default)]
    pub palette_cursor: usize,
    #[serde(default)]
    pub segmentation_layers: Vec<SegmentationEntry>,
    #[serde(default)]
    pub points: Vec<PointEntry>,
    #[serde(default)]
    pub lines: Vec<LineEntry>,
    #[serde(default)]
    pub rects: Vec<RectEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputImageEntry {
    pub file: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WindowEntry {
    pub level: f64,
    pub width: f64,
    pub range_min: i32,
    pub range_max: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentationEntry {
    pub name: String,
    pub file: String,
    pub color: Rgb,
    pub alpha: f64,
    pub visible: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointEntry {
    pub name: String,
    pub coordinates: WorldPoint,
    pub color: Rgb,
    pub visible: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineEntry {
    pub name: String,
    pub point1: WorldPoint,
    pub point2: WorldPoint,
    pub color: Rgb,
    pub width: f64,
    pub visible: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RectEntry {
    pub name: String,
    pub corner1: WorldPoint,
    pub corner2: WorldPoint,
    pub color: Rgb,
    pub visible: bool,
}
