pub mod overlay;
pub mod vector;
pub mod window_level;

use ndarray::Array3;

use crate::image::BaseImage;
use crate::paint::BrushMode;
use crate::store::LayerStore;
use crate::view::IndexPoint;

pub use window_level::apply_window_level;

const PAINT_PREVIEW_COLOR: [u8; 3] = [0, 255, 0];
const ERASE_PREVIEW_COLOR: [u8; 3] = [255, 0, 0];

/// One displayable RGB frame, shape = (height, width, 3).
#[derive(Clone, Debug, PartialEq)]
pub struct RgbFrame {
    data: Array3<u8>,
}

impl RgbFrame {
    pub fn width(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    pub(crate) fn put(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        for c in 0..3 {
            self.data[[y, x, c]] = rgb[c];
        }
    }

    /// Write a pixel, silently clipping positions outside the frame.
    pub(crate) fn put_clipped(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width() && y < self.height() {
            self.put(x, y, rgb);
        }
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// Convert to an `image` buffer for PNG export.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let (w, h) = (self.width(), self.height());
        let mut img = image::RgbImage::new(w as u32, h as u32);
        for y in 0..h {
            for x in 0..w {
                img.put_pixel(x as u32, y as u32, image::Rgb(self.get(x, y)));
            }
        }
        img
    }
}

/// The brush cursor overlay: an outline ellipse at the cursor's mapped
/// pixel position, green for paint, red for erase. Drawing it never touches
/// any mask.
#[derive(Clone, Copy, Debug)]
pub struct BrushPreview {
    pub center: IndexPoint,
    pub radius_x: f64,
    pub radius_y: f64,
    pub mode: BrushMode,
}

/// Composite the window/level-mapped base image with every visible layer
/// into one RGB frame.
///
/// Pure function of its inputs: identical inputs produce bit-identical
/// frames, and neither the layers nor the base image are mutated.
pub fn composite(
    image: &BaseImage,
    level: f64,
    width: f64,
    store: &LayerStore,
    preview: Option<&BrushPreview>,
) -> RgbFrame {
    let gray = window_level::apply_window_level(image, level, width);
    let (h, w) = gray.dim();

    let mut data = Array3::zeros((h, w, 3));
    for ((y, x), &v) in gray.indexed_iter() {
        data[[y, x, 0]] = v;
        data[[y, x, 1]] = v;
        data[[y, x, 2]] = v;
    }
    let mut frame = RgbFrame { data };

    overlay::blend_segmentations(&mut frame, store.segmentations());

    vector::draw_points(
        &mut frame,
        image,
        store.points(),
        store.active_point().map(|p| p.name.as_str()),
    );
    vector::draw_lines(
        &mut frame,
        image,
        store.lines(),
        store.active_line().map(|l| l.name.as_str()),
    );
    vector::draw_rects(
        &mut frame,
        image,
        store.rects(),
        store.active_rect().map(|r| r.name.as_str()),
    );

    if let Some(p) = preview {
        let color = match p.mode {
            BrushMode::Paint => PAINT_PREVIEW_COLOR,
            BrushMode::Erase => ERASE_PREVIEW_COLOR,
        };
        vector::outline_ellipse(&mut frame, p.center, p.radius_x, p.radius_y, color);
    }

    frame
}
