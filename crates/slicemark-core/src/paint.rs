use tracing::debug;

use crate::image::BaseImage;
use crate::store::LayerStore;
use crate::view::{display_to_index, DisplayPoint, IndexPoint, ViewTransform};

/// Brush radius in world units, shared between the paint controller and the
/// brush preview. Read at the moment of each stamp, so a mid-stroke change
/// takes effect on the next dab.
#[derive(Clone, Copy, Debug)]
pub struct BrushSettings {
    radius: f64,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self { radius: 10.0 }
    }
}

impl BrushSettings {
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radius must stay positive; non-positive input is clamped.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(f64::MIN_POSITIVE);
    }

    /// Per-axis radii in index units, so the stamp is circular in world
    /// units under anisotropic spacing.
    pub fn index_radii(&self, image: &BaseImage) -> (f64, f64) {
        let (sx, sy) = image.spacing();
        (self.radius / sx, self.radius / sy)
    }
}

/// Paint fills mask cells with 1, erase clears them to 0. The two tools are
/// mutually exclusive; enabling one disables the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushMode {
    Paint,
    Erase,
}

impl BrushMode {
    pub fn stamp_value(&self) -> u8 {
        match self {
            BrushMode::Paint => 1,
            BrushMode::Erase => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PaintState {
    Idle,
    Painting,
}

/// What a pointer event did. `Ignored` carries a status message for the
/// front end; it is never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StampOutcome {
    /// Stamps applied to the active layer (interpolated dabs included).
    Applied { dabs: usize },
    Ignored(&'static str),
}

/// Translates pointer press/move/release events into mask edits.
///
/// Any front end, framework-bound or headless, drives this by calling
/// `on_press`/`on_move`/`on_release` directly. Stamps mutate the active
/// segmentation layer synchronously and raise a render request; compositing
/// happens later, once per event batch.
#[derive(Debug)]
pub struct PaintController {
    state: PaintState,
    mode: BrushMode,
    enabled: bool,
    /// Index of the previous dab within the current stroke, used to
    /// interpolate across sparse move events.
    last_stamp: Option<IndexPoint>,
}

impl Default for PaintController {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintController {
    pub fn new() -> Self {
        Self {
            state: PaintState::Idle,
            mode: BrushMode::Paint,
            enabled: false,
            last_stamp: None,
        }
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_painting(&self) -> bool {
        self.state == PaintState::Painting
    }

    /// Toggle the paint tool; enabling it displaces the erase tool.
    /// Returns the new enabled state.
    pub fn toggle_paint(&mut self) -> bool {
        self.toggle(BrushMode::Paint)
    }

    /// Toggle the erase tool; enabling it displaces the paint tool.
    pub fn toggle_erase(&mut self) -> bool {
        self.toggle(BrushMode::Erase)
    }

    fn toggle(&mut self, mode: BrushMode) -> bool {
        if self.enabled && self.mode == mode {
            self.enabled = false;
        } else {
            self.mode = mode;
            self.enabled = true;
        }
        if !self.enabled {
            self.state = PaintState::Idle;
            self.last_stamp = None;
        }
        self.enabled
    }

    /// Pointer pressed: one stamp at the press location, then enter the
    /// painting state.
    pub fn on_press(
        &mut self,
        pos: DisplayPoint,
        view: &ViewTransform,
        image: &BaseImage,
        store: &mut LayerStore,
        brush: &BrushSettings,
    ) -> StampOutcome {
        if !self.enabled {
            return StampOutcome::Ignored("no brush tool active");
        }
        if store.active_segmentation().is_none() {
            return StampOutcome::Ignored("no active layer");
        }

        self.state = PaintState::Painting;
        self.last_stamp = None;
        self.stamp_at(pos, view, image, store, brush)
    }

    /// Pointer moved while painting: stamps interpolated from the previous
    /// dab to the current position, closing the gaps sparse move events
    /// would otherwise leave.
    pub fn on_move(
        &mut self,
        pos: DisplayPoint,
        view: &ViewTransform,
        image: &BaseImage,
        store: &mut LayerStore,
        brush: &BrushSettings,
    ) -> StampOutcome {
        if self.state != PaintState::Painting {
            return StampOutcome::Ignored("not painting");
        }
        if store.active_segmentation().is_none() {
            return StampOutcome::Ignored("no active layer");
        }
        self.stamp_at(pos, view, image, store, brush)
    }

    /// Pointer released: the stroke ends. The only stroke terminator.
    pub fn on_release(&mut self) {
        self.state = PaintState::Idle;
        self.last_stamp = None;
    }

    fn stamp_at(
        &mut self,
        pos: DisplayPoint,
        view: &ViewTransform,
        image: &BaseImage,
        store: &mut LayerStore,
        brush: &BrushSettings,
    ) -> StampOutcome {
        let target = display_to_index(pos, view, image);
        let (w, h) = (image.width(), image.height());

        if !target.within(w, h) {
            // Out-of-bounds targets are ignored, not failed. The stroke
            // stays live; the anchor resets so re-entry does not sweep a
            // line across the image border.
            self.last_stamp = None;
            return StampOutcome::Ignored("outside image bounds");
        }

        let (rx, ry) = brush.index_radii(image);
        let value = self.mode.stamp_value();

        let dabs = {
            let Some(layer) = store.active_segmentation_mut() else {
                return StampOutcome::Ignored("no active layer");
            };

            let mut dabs = 0;
            if let Some(last) = self.last_stamp {
                for p in interpolate(last, target, rx.min(ry)) {
                    layer.mask.set_circle(p.x, p.y, rx, ry, value);
                    dabs += 1;
                }
            }
            layer.mask.set_circle(target.x, target.y, rx, ry, value);
            dabs += 1;
            layer.modified = true;
            dabs
        };

        self.last_stamp = Some(target);
        store.request_render();
        debug!(x = target.x, y = target.y, dabs, "Stamp applied");
        StampOutcome::Applied { dabs }
    }
}

/// Intermediate dab centers strictly between `from` and `to`, spaced at
/// most half the smaller radius apart (at least one pixel).
fn interpolate(from: IndexPoint, to: IndexPoint, radius: f64) -> Vec<IndexPoint> {
    let dx = (to.x - from.x) as f64;
    let dy = (to.y - from.y) as f64;
    let dist = (dx * dx + dy * dy).sqrt();
    let step = (radius / 2.0).max(1.0);
    if dist <= step {
        return Vec::new();
    }

    let count = (dist / step).ceil() as i64;
    let mut dabs = Vec::with_capacity(count as usize);
    for k in 1..count {
        let t = k as f64 / count as f64;
        dabs.push(IndexPoint {
            x: from.x + (dx * t).round() as i64,
            y: from.y + (dy * t).round() as i64,
        });
    }
    dabs
}
