use ndarray::Array2;
use tracing::info;

use crate::error::{Result, SlicemarkError};
use crate::image::{BaseImage, ProjectionGeometry};
use crate::paint::{BrushSettings, PaintController, StampOutcome};
use crate::render::{composite, BrushPreview, RgbFrame};
use crate::store::LayerStore;
use crate::view::{display_to_index, DisplayPoint, IndexPoint, ViewTransform};

/// The contrast window applied to the base image at render time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowSettings {
    pub level: f64,
    pub width: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            level: 127.5,
            width: 255.0,
        }
    }
}

/// The annotation workspace root: one base image, the layer store, view
/// contrast settings, and the paint tools.
///
/// Single-threaded and event-driven; every mutation runs synchronously on
/// the caller's thread, so a save never observes a layer mid-stamp.
#[derive(Debug, Default)]
pub struct Session {
    base: Option<BaseImage>,
    pub store: LayerStore,
    window: WindowSettings,
    pub brush: BrushSettings,
    pub paint: PaintController,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the base image wholesale: existing layers are cleared, the
    /// contrast window resets to the image default, and a first empty
    /// segmentation layer is seeded.
    pub fn import_image(
        &mut self,
        pixels: Array2<i32>,
        spacing: (f64, f64),
        origin: (f64, f64),
        geometry: Option<ProjectionGeometry>,
    ) -> Result<()> {
        let image = BaseImage::import(pixels, spacing, origin, geometry)?;
        let (level, width) = image.default_window();

        self.store.clear();
        self.window = WindowSettings { level, width };
        let (w, h) = (image.width(), image.height());
        self.base = Some(image);
        self.store.add_segmentation(w, h);
        info!(width = w, height = h, "Imported base image");
        Ok(())
    }

    /// Install an already-built base image, used by workspace load.
    pub(crate) fn set_base(&mut self, image: BaseImage) {
        self.base = Some(image);
    }

    pub fn base(&self) -> Option<&BaseImage> {
        self.base.as_ref()
    }

    fn require_base(&self) -> Result<&BaseImage> {
        self.base.as_ref().ok_or(SlicemarkError::MissingBaseImage)
    }

    pub fn window(&self) -> WindowSettings {
        self.window
    }

    pub(crate) fn set_window_unchecked(&mut self, window: WindowSettings) {
        self.window = window;
    }

    /// Update the contrast window. Width must be positive; invalid input is
    /// rejected here, at the settings boundary, so the compositor never
    /// sees it.
    pub fn set_window(&mut self, level: f64, width: f64) -> Result<()> {
        if width <= 0.0 {
            return Err(SlicemarkError::InvalidWindow(width));
        }
        self.window = WindowSettings { level, width };
        self.store.request_render();
        Ok(())
    }

    /// Add an empty segmentation layer sized to the base image.
    pub fn add_layer(&mut self) -> Result<String> {
        let (w, h) = {
            let base = self.require_base()?;
            (base.width(), base.height())
        };
        Ok(self.store.add_segmentation(w, h))
    }

    // -- pointer events ------------------------------------------------------

    pub fn on_press(&mut self, pos: DisplayPoint, view: &ViewTransform) -> StampOutcome {
        let Some(base) = self.base.as_ref() else {
            return StampOutcome::Ignored("no image loaded");
        };
        self.paint
            .on_press(pos, view, base, &mut self.store, &self.brush)
    }

    pub fn on_move(&mut self, pos: DisplayPoint, view: &ViewTransform) -> StampOutcome {
        let Some(base) = self.base.as_ref() else {
            return StampOutcome::Ignored("no image loaded");
        };
        self.paint
            .on_move(pos, view, base, &mut self.store, &self.brush)
    }

    pub fn on_release(&mut self) {
        self.paint.on_release();
    }

    // -- rendering -----------------------------------------------------------

    /// Composite the current state into one RGB frame. When a cursor
    /// position is given and a brush tool is active, the brush outline is
    /// drawn at the cursor's mapped pixel position.
    pub fn render(
        &self,
        view: &ViewTransform,
        cursor: Option<DisplayPoint>,
    ) -> Result<RgbFrame> {
        let base = self.require_base()?;

        let preview = match cursor {
            Some(pos) if self.paint.enabled() => {
                let center = display_to_index(pos, view, base);
                let (rx, ry) = self.brush.index_radii(base);
                Some(BrushPreview {
                    center,
                    radius_x: rx,
                    radius_y: ry,
                    mode: self.paint.mode(),
                })
            }
            _ => None,
        };

        Ok(composite(
            base,
            self.window.level,
            self.window.width,
            &self.store,
            preview.as_ref(),
        ))
    }

    /// One-shot flag raised by mutations; the front end polls it once per
    /// event batch and re-renders when set.
    pub fn take_render_request(&mut self) -> bool {
        self.store.take_render_request()
    }

    /// Image index and raw sample under a display position, for status-bar
    /// style readouts. None when no image is loaded or the cursor is
    /// outside the image.
    pub fn probe(&self, pos: DisplayPoint, view: &ViewTransform) -> Option<(IndexPoint, i32)> {
        let base = self.base.as_ref()?;
        let index = display_to_index(pos, view, base);
        let value = base.get(index.x.try_into().ok()?, index.y.try_into().ok()?)?;
        Some((index, value))
    }

    // -- lifecycle -----------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    /// Drop the base image and every layer.
    pub fn close(&mut self) {
        self.base = None;
        self.store.clear();
        self.store.clear_dirty();
        self.window = WindowSettings::default();
        self.paint.on_release();
        info!("Workspace closed");
    }
}
