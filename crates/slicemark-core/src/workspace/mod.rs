pub mod manifest;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, SlicemarkError};
use crate::io::{load_base_image, load_mask, save_base_image, save_mask};
use crate::layer::{LineEntity, PointEntity, RectEntity, SegmentationLayer};
use crate::session::{Session, WindowSettings};

use manifest::{
    InputImageEntry, LineEntry, Manifest, PointEntry, RectEntry, SegmentationEntry, WindowEntry,
    MANIFEST_VERSION,
};

const INPUT_IMAGE_FILE: &str = "input_image.mha";

/// One layer that could not be restored. The rest of the workspace loads
/// anyway; these are surfaced to the caller as diagnostics.
#[derive(Clone, Debug)]
pub struct LayerFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of a workspace load: which layers were skipped and why.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub skipped: Vec<LayerFailure>,
}

impl LoadReport {
    fn skip(&mut self, name: &str, reason: impl ToString) {
        warn!(layer = %name, reason = %reason.to_string(), "Skipping layer");
        self.skipped.push(LayerFailure {
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Sibling data directory for a manifest path: `<path>.data/`.
pub fn data_dir_for(path: &Path) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_os_string();
    s.push(".data");
    PathBuf::from(s)
}

/// Write the whole annotated state: the base image and one .mha per
/// segmentation layer into `<path>.data/`, plus the metadata document at
/// `path`. Clears the dirty state on success.
///
/// Fails with `MissingBaseImage` before touching the filesystem when no
/// image is loaded.
pub fn save(session: &mut Session, path: &Path) -> Result<()> {
    let base = session.base().ok_or(SlicemarkError::MissingBaseImage)?;

    let data_dir = data_dir_for(path);
    fs::create_dir_all(&data_dir)?;

    save_base_image(base, &data_dir.join(INPUT_IMAGE_FILE))?;

    let mut segmentation_layers = Vec::new();
    for layer in session.store.segmentations() {
        let file = format!("{}.mha", layer.name);
        save_mask(&layer.mask, base, &data_dir.join(&file))?;
        segmentation_layers.push(SegmentationEntry {
            name: layer.name.clone(),
            file,
            color: layer.color,
            alpha: layer.alpha(),
            visible: layer.visible,
        });
    }

    let (range_min, range_max) = base.intensity_range();
    let window = session.window();
    let manifest = Manifest {
        version: MANIFEST_VERSION,
        input_image: InputImageEntry {
            file: INPUT_IMAGE_FILE.to_string(),
        },
        window_settings: WindowEntry {
            level: window.level,
            width: window.width,
            range_min,
            range_max,
        },
        palette_cursor: session.store.palette_cursor(),
        segmentation_layers,
        points: session
            .store
            .points()
            .iter()
            .map(|p| PointEntry {
                name: p.name.clone(),
                coordinates: p.position,
                color: p.color,
                visible: p.visible,
            })
            .collect(),
        lines: session
            .store
            .lines()
            .iter()
            .map(|l| LineEntry {
                name: l.name.clone(),
                point1: l.point1,
                point2: l.point2,
                color: l.color,
                width: l.width(),
                visible: l.visible,
            })
            .collect(),
        rects: session
            .store
            .rects()
            .iter()
            .map(|r| RectEntry {
                name: r.name.clone(),
                corner1: r.corner1(),
                corner2: r.corner2(),
                color: r.color,
                visible: r.visible,
            })
            .collect(),
    };

    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &manifest)
        .map_err(|e| SlicemarkError::MetadataParse(e.to_string()))?;

    session.store.clear_dirty();
    info!(path = %path.display(), "Workspace saved");
    Ok(())
}

/// Restore a workspace from its metadata document.
///
/// A malformed document aborts the whole load; a missing or unreadable
/// layer file skips only that layer and is reported in the `LoadReport`.
pub fn load(path: &Path) -> Result<(Session, LoadReport)> {
    let text = fs::read_to_string(path)?;
    let manifest: Manifest =
        serde_json::from_str(&text).map_err(|e| SlicemarkError::MetadataParse(e.to_string()))?;

    if manifest.version != MANIFEST_VERSION {
        return Err(SlicemarkError::MetadataParse(format!(
            "unsupported workspace version: {}",
            manifest.version
        )));
    }
    if manifest.window_settings.width <= 0.0 {
        return Err(SlicemarkError::MetadataParse(format!(
            "invalid window width: {}",
            manifest.window_settings.width
        )));
    }

    let data_dir = data_dir_for(path);
    let base_path = data_dir.join(&manifest.input_image.file);
    if !base_path.exists() {
        return Err(SlicemarkError::LayerFileNotFound(base_path));
    }
    let base = load_base_image(&base_path)?;
    let (base_w, base_h) = (base.width(), base.height());

    let mut session = Session::new();
    session.set_base(base);
    session.set_window_unchecked(WindowSettings {
        level: manifest.window_settings.level,
        width: manifest.window_settings.width,
    });

    let mut report = LoadReport::default();

    for entry in &manifest.segmentation_layers {
        let mask_path = data_dir.join(&entry.file);
        if !mask_path.exists() {
            report.skip(
                &entry.name,
                SlicemarkError::LayerFileNotFound(mask_path),
            );
            continue;
        }
        let mask = match load_mask(&mask_path) {
            Ok(mask) => mask,
            Err(e) => {
                report.skip(&entry.name, e);
                continue;
            }
        };
        if mask.dimensions() != (base_w, base_h) {
            report.skip(
                &entry.name,
                format!(
                    "mask is {}x{} but base image is {}x{}",
                    mask.width(),
                    mask.height(),
                    base_w,
                    base_h
                ),
            );
            continue;
        }

        let mut layer = SegmentationLayer::new(entry.name.clone(), mask, entry.color);
        layer.visible = entry.visible;
        layer.set_alpha(entry.alpha);
        layer.modified = false;
        if let Err(e) = session.store.insert_segmentation(layer) {
            report.skip(&entry.name, e);
        }
    }

    for entry in &manifest.points {
        let mut point = PointEntity::new(entry.name.clone(), entry.coordinates, entry.color);
        point.visible = entry.visible;
        if let Err(e) = session.store.insert_point(point) {
            report.skip(&entry.name, e);
        }
    }

    for entry in &manifest.lines {
        let mut line = LineEntity::new(entry.name.clone(), entry.point1, entry.point2, entry.color);
        line.set_width(entry.width);
        line.visible = entry.visible;
        line.modified = false;
        if let Err(e) = session.store.insert_line(line) {
            report.skip(&entry.name, e);
        }
    }

    for entry in &manifest.rects {
        let mut rect = RectEntity::new(entry.name.clone(), entry.corner1, entry.corner2, entry.color);
        rect.visible = entry.visible;
        rect.modified = false;
        if let Err(e) = session.store.insert_rect(rect) {
            report.skip(&entry.name, e);
        }
    }

    session.store.set_palette_cursor(manifest.palette_cursor);
    session.store.clear_dirty();
    info!(
        path = %path.display(),
        layers = session.store.segmentations().len(),
        skipped = report.skipped.len(),
        "Workspace loaded"
    );
    Ok((session, report))
}
