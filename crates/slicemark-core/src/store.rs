use tracing::info;

use crate::error::{Result, SlicemarkError};
use crate::layer::{
    validate_name, LineEntity, PointEntity, RectEntity, Rgb, SegmentationLayer,
};
use crate::mask::RasterMask;
use crate::view::WorldPoint;

/// The fixed rotation of preset layer hues. New layers cycle through these
/// in order; the cursor lives in the store, not in a process-wide global.
pub const PALETTE: [Rgb; 10] = [
    Rgb([255, 0, 0]),
    Rgb([0, 255, 0]),
    Rgb([0, 0, 255]),
    Rgb([255, 255, 0]),
    Rgb([0, 255, 255]),
    Rgb([255, 0, 255]),
    Rgb([170, 255, 0]),
    Rgb([255, 165, 0]),
    Rgb([170, 255, 9]),
    Rgb([0, 128, 0]),
];

/// Workspace-level dirty tracking, bumped by every mutating call and
/// cleared on save/load.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirtyTracker {
    edits: u64,
}

impl DirtyTracker {
    pub fn mark(&mut self) {
        self.edits += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.edits > 0
    }

    pub fn clear(&mut self) {
        self.edits = 0;
    }
}

trait Named {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
    fn mark_modified(&mut self);
}

macro_rules! impl_named {
    ($ty:ty) => {
        impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
            fn set_name(&mut self, name: String) {
                self.name = name;
            }
            fn mark_modified(&mut self) {
                self.modified = true;
            }
        }
    };
}

impl_named!(SegmentationLayer);
impl_named!(PointEntity);
impl_named!(LineEntity);
impl_named!(RectEntity);

/// Ordered, named collections of annotation layers.
///
/// Each collection preserves insertion order, enforces name uniqueness, and
/// carries at most one active entity -- the exclusive target of paint/erase
/// and drag edits. Every mutating operation marks the target modified, bumps
/// the dirty tracker, and raises a render request; nothing here blocks or
/// renders synchronously.
#[derive(Debug, Default)]
pub struct LayerStore {
    segmentations: Vec<SegmentationLayer>,
    points: Vec<PointEntity>,
    lines: Vec<LineEntity>,
    rects: Vec<RectEntity>,

    active_segmentation: Option<String>,
    active_point: Option<String>,
    active_line: Option<String>,
    active_rect: Option<String>,

    palette_cursor: usize,
    dirty: DirtyTracker,
    render_requested: bool,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_color(&mut self) -> Rgb {
        let color = PALETTE[self.palette_cursor % PALETTE.len()];
        self.palette_cursor = (self.palette_cursor + 1) % PALETTE.len();
        color
    }

    pub fn palette_cursor(&self) -> usize {
        self.palette_cursor
    }

    /// Restore the palette position, e.g. after a workspace load.
    pub fn set_palette_cursor(&mut self, cursor: usize) {
        self.palette_cursor = cursor % PALETTE.len();
    }

    fn touch(&mut self) {
        self.dirty.mark();
        self.render_requested = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
        for layer in &mut self.segmentations {
            layer.modified = false;
        }
        for p in &mut self.points {
            p.modified = false;
        }
        for l in &mut self.lines {
            l.modified = false;
        }
        for r in &mut self.rects {
            r.modified = false;
        }
    }

    /// One-shot render flag: raised by mutations, consumed by the render
    /// loop between event batches.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    // -- segmentation layers -------------------------------------------------

    /// Add a zeroed segmentation layer named `"Layer {n}"` with the lowest
    /// unused n, colored from the palette. The new layer becomes active.
    pub fn add_segmentation(&mut self, width: usize, height: usize) -> String {
        let name = generate_name("Layer", &self.segmentations);
        let color = self.next_color();
        let layer = SegmentationLayer::new(name.clone(), RasterMask::zeros(width, height), color);
        self.segmentations.push(layer);
        self.active_segmentation = Some(name.clone());
        self.touch();
        info!(layer = %name, "Added segmentation layer");
        name
    }

    pub fn segmentations(&self) -> &[SegmentationLayer] {
        &self.segmentations
    }

    pub fn segmentation(&self, name: &str) -> Option<&SegmentationLayer> {
        self.segmentations.iter().find(|l| l.name == name)
    }

    pub fn segmentation_mut(&mut self, name: &str) -> Option<&mut SegmentationLayer> {
        self.render_requested = true;
        self.segmentations.iter_mut().find(|l| l.name == name)
    }

    pub fn rename_segmentation(&mut self, old: &str, new: &str) -> Result<()> {
        rename_in(&mut self.segmentations, old, new)?;
        if self.active_segmentation.as_deref() == Some(old) {
            self.active_segmentation = Some(new.to_string());
        }
        self.touch();
        Ok(())
    }

    /// Detach a layer from rendering and serialization. Removal is
    /// irreversible within a session; a missing name is reported, not an
    /// error.
    pub fn remove_segmentation(&mut self, name: &str) -> bool {
        let Some(idx) = self.segmentations.iter().position(|l| l.name == name) else {
            info!(layer = %name, "Remove requested for unknown layer");
            return false;
        };
        self.segmentations.remove(idx);
        if self.active_segmentation.as_deref() == Some(name) {
            self.active_segmentation = None;
        }
        self.touch();
        info!(layer = %name, "Removed segmentation layer");
        true
    }

    /// Make one layer the exclusive paint/erase target, or none.
    pub fn set_active_segmentation(&mut self, name: Option<&str>) -> bool {
        match name {
            Some(n) if self.segmentation(n).is_none() => false,
            _ => {
                self.active_segmentation = name.map(str::to_string);
                self.render_requested = true;
                true
            }
        }
    }

    pub fn active_segmentation(&self) -> Option<&SegmentationLayer> {
        self.active_segmentation
            .as_deref()
            .and_then(|n| self.segmentations.iter().find(|l| l.name == n))
    }

    pub fn active_segmentation_mut(&mut self) -> Option<&mut SegmentationLayer> {
        let name = self.active_segmentation.clone()?;
        self.segmentations.iter_mut().find(|l| l.name == name)
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        let Some(layer) = self.segmentations.iter_mut().find(|l| l.name == name) else {
            return false;
        };
        layer.visible = visible;
        layer.modified = true;
        self.touch();
        true
    }

    pub fn set_color(&mut self, name: &str, color: Rgb) -> bool {
        let Some(layer) = self.segmentations.iter_mut().find(|l| l.name == name) else {
            return false;
        };
        layer.color = color;
        layer.modified = true;
        self.touch();
        true
    }

    pub fn set_alpha(&mut self, name: &str, alpha: f64) -> bool {
        let Some(layer) = self.segmentations.iter_mut().find(|l| l.name == name) else {
            return false;
        };
        layer.set_alpha(alpha);
        self.touch();
        true
    }

    // -- points --------------------------------------------------------------

    pub fn add_point(&mut self, position: WorldPoint) -> String {
        let name = generate_name("Point", &self.points);
        let color = self.next_color();
        self.points
            .push(PointEntity::new(name.clone(), position, color));
        self.active_point = Some(name.clone());
        self.touch();
        name
    }

    pub fn points(&self) -> &[PointEntity] {
        &self.points
    }

    pub fn point_mut(&mut self, name: &str) -> Option<&mut PointEntity> {
        self.render_requested = true;
        self.points.iter_mut().find(|p| p.name == name)
    }

    pub fn rename_point(&mut self, old: &str, new: &str) -> Result<()> {
        rename_in(&mut self.points, old, new)?;
        if self.active_point.as_deref() == Some(old) {
            self.active_point = Some(new.to_string());
        }
        self.touch();
        Ok(())
    }

    pub fn remove_point(&mut self, name: &str) -> bool {
        let Some(idx) = self.points.iter().position(|p| p.name == name) else {
            return false;
        };
        self.points.remove(idx);
        if self.active_point.as_deref() == Some(name) {
            self.active_point = None;
        }
        self.touch();
        true
    }

    pub fn set_active_point(&mut self, name: Option<&str>) -> bool {
        match name {
            Some(n) if !self.points.iter().any(|p| p.name == n) => false,
            _ => {
                self.active_point = name.map(str::to_string);
                self.render_requested = true;
                true
            }
        }
    }

    pub fn active_point(&self) -> Option<&PointEntity> {
        self.active_point
            .as_deref()
            .and_then(|n| self.points.iter().find(|p| p.name == n))
    }

    pub fn active_point_mut(&mut self) -> Option<&mut PointEntity> {
        let name = self.active_point.clone()?;
        self.render_requested = true;
        self.points.iter_mut().find(|p| p.name == name)
    }

    // -- lines ---------------------------------------------------------------

    pub fn add_line(&mut self, point1: WorldPoint, point2: WorldPoint) -> String {
        let name = generate_name("Line", &self.lines);
        let color = self.next_color();
        self.lines
            .push(LineEntity::new(name.clone(), point1, point2, color));
        self.active_line = Some(name.clone());
        self.touch();
        name
    }

    pub fn lines(&self) -> &[LineEntity] {
        &self.lines
    }

    pub fn line_mut(&mut self, name: &str) -> Option<&mut LineEntity> {
        self.render_requested = true;
        self.lines.iter_mut().find(|l| l.name == name)
    }

    pub fn rename_line(&mut self, old: &str, new: &str) -> Result<()> {
        rename_in(&mut self.lines, old, new)?;
        if self.active_line.as_deref() == Some(old) {
            self.active_line = Some(new.to_string());
        }
        self.touch();
        Ok(())
    }

    pub fn remove_line(&mut self, name: &str) -> bool {
        let Some(idx) = self.lines.iter().position(|l| l.name == name) else {
            return false;
        };
        self.lines.remove(idx);
        if self.active_line.as_deref() == Some(name) {
            self.active_line = None;
        }
        self.touch();
        true
    }

    pub fn set_active_line(&mut self, name: Option<&str>) -> bool {
        match name {
            Some(n) if !self.lines.iter().any(|l| l.name == n) => false,
            _ => {
                self.active_line = name.map(str::to_string);
                self.render_requested = true;
                true
            }
        }
    }

    pub fn active_line(&self) -> Option<&LineEntity> {
        self.active_line
            .as_deref()
            .and_then(|n| self.lines.iter().find(|l| l.name == n))
    }

    // -- rects ---------------------------------------------------------------

    pub fn add_rect(&mut self, corner1: WorldPoint, corner2: WorldPoint) -> String {
        let name = generate_name("Rect", &self.rects);
        let color = self.next_color();
        self.rects
            .push(RectEntity::new(name.clone(), corner1, corner2, color));
        self.active_rect = Some(name.clone());
        self.touch();
        name
    }

    pub fn rects(&self) -> &[RectEntity] {
        &self.rects
    }

    pub fn rect_mut(&mut self, name: &str) -> Option<&mut RectEntity> {
        self.render_requested = true;
        self.rects.iter_mut().find(|r| r.name == name)
    }

    pub fn rename_rect(&mut self, old: &str, new: &str) -> Result<()> {
        rename_in(&mut self.rects, old, new)?;
        if self.active_rect.as_deref() == Some(old) {
            self.active_rect = Some(new.to_string());
        }
        self.touch();
        Ok(())
    }

    pub fn remove_rect(&mut self, name: &str) -> bool {
        let Some(idx) = self.rects.iter().position(|r| r.name == name) else {
            return false;
        };
        self.rects.remove(idx);
        if self.active_rect.as_deref() == Some(name) {
            self.active_rect = None;
        }
        self.touch();
        true
    }

    pub fn set_active_rect(&mut self, name: Option<&str>) -> bool {
        match name {
            Some(n) if !self.rects.iter().any(|r| r.name == n) => false,
            _ => {
                self.active_rect = name.map(str::to_string);
                self.render_requested = true;
                true
            }
        }
    }

    pub fn active_rect(&self) -> Option<&RectEntity> {
        self.active_rect
            .as_deref()
            .and_then(|n| self.rects.iter().find(|r| r.name == n))
    }

    // -- lifecycle -----------------------------------------------------------

    /// Drop every layer and reset selection state. Used on workspace close
    /// and before a load repopulates the store.
    pub fn clear(&mut self) {
        self.segmentations.clear();
        self.points.clear();
        self.lines.clear();
        self.rects.clear();
        self.active_segmentation = None;
        self.active_point = None;
        self.active_line = None;
        self.active_rect = None;
        self.palette_cursor = 0;
        self.render_requested = true;
    }

    pub fn is_empty(&self) -> bool {
        self.segmentations.is_empty()
            && self.points.is_empty()
            && self.lines.is_empty()
            && self.rects.is_empty()
    }

    /// Direct insertion used by workspace load; preserves the stored name
    /// and bypasses the palette.
    pub(crate) fn insert_segmentation(&mut self, layer: SegmentationLayer) -> Result<()> {
        validate_name(&layer.name)?;
        if self.segmentation(&layer.name).is_some() {
            return Err(SlicemarkError::DuplicateName(layer.name.clone()));
        }
        self.segmentations.push(layer);
        self.render_requested = true;
        Ok(())
    }

    pub(crate) fn insert_point(&mut self, point: PointEntity) -> Result<()> {
        validate_name(&point.name)?;
        if self.points.iter().any(|p| p.name == point.name) {
            return Err(SlicemarkError::DuplicateName(point.name.clone()));
        }
        self.points.push(point);
        self.render_requested = true;
        Ok(())
    }

    pub(crate) fn insert_line(&mut self, line: LineEntity) -> Result<()> {
        validate_name(&line.name)?;
        if self.lines.iter().any(|l| l.name == line.name) {
            return Err(SlicemarkError::DuplicateName(line.name.clone()));
        }
        self.lines.push(line);
        self.render_requested = true;
        Ok(())
    }

    pub(crate) fn insert_rect(&mut self, rect: RectEntity) -> Result<()> {
        validate_name(&rect.name)?;
        if self.rects.iter().any(|r| r.name == rect.name) {
            return Err(SlicemarkError::DuplicateName(rect.name.clone()));
        }
        self.rects.push(rect);
        self.render_requested = true;
        Ok(())
    }
}

/// Lowest unused `"{base} {n}"`, n starting at 1.
fn generate_name<T: Named>(base: &str, existing: &[T]) -> String {
    let mut n = 1;
    loop {
        let candidate = format!("{base} {n}");
        if !existing.iter().any(|e| e.name() == candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Atomic rename: on any failure the old name stays in effect.
fn rename_in<T: Named>(items: &mut [T], old: &str, new: &str) -> Result<()> {
    validate_name(new)?;
    if old == new {
        return Ok(());
    }
    if items.iter().any(|e| e.name() == new) {
        return Err(SlicemarkError::DuplicateName(new.to_string()));
    }
    let Some(item) = items.iter_mut().find(|e| e.name() == old) else {
        return Err(SlicemarkError::UnknownLayer(old.to_string()));
    };
    item.set_name(new.to_string());
    item.mark_modified();
    Ok(())
}
