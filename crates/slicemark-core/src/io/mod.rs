pub mod meta_image;

use std::path::Path;

use ndarray::Array2;

use crate::error::{Result, SlicemarkError};
use crate::image::{BaseImage, ProjectionGeometry};
use crate::mask::RasterMask;

use meta_image::{ElementType, MetaImage};

/// Persist a base image as .mha, choosing the narrowest element type that
/// holds its intensity range.
pub fn save_base_image(image: &BaseImage, path: &Path) -> Result<()> {
    let (min, max) = image.intensity_range();
    let element_type = if min >= 0 && max <= 255 {
        ElementType::UChar
    } else if min >= 0 && max <= u16::MAX as i32 {
        ElementType::UShort
    } else if min >= i16::MIN as i32 && max <= i16::MAX as i32 {
        ElementType::Short
    } else {
        ElementType::Int
    };

    let meta = MetaImage {
        width: image.width(),
        height: image.height(),
        spacing: image.spacing(),
        origin: image.origin(),
        element_type,
        samples: image.pixels().iter().copied().collect(),
    };
    meta.write(path)
}

/// Load a base image from .mha. Spacing and origin come from the file; no
/// projection rescale is applied here (that happens once, at import).
pub fn load_base_image(path: &Path) -> Result<BaseImage> {
    let meta = MetaImage::read(path)?;
    let pixels = Array2::from_shape_vec((meta.height, meta.width), meta.samples)
        .map_err(|e| SlicemarkError::Codec(format!("sample buffer mismatch: {e}")))?;
    BaseImage::new(pixels, meta.spacing, meta.origin)
}

/// Persist a mask as .mha, carrying the base image's geometry so the file
/// stands alone in external viewers.
pub fn save_mask(mask: &RasterMask, base: &BaseImage, path: &Path) -> Result<()> {
    let meta = MetaImage {
        width: mask.width(),
        height: mask.height(),
        spacing: base.spacing(),
        origin: base.origin(),
        element_type: ElementType::UChar,
        samples: mask.as_slice().iter().map(|&v| v as i32).collect(),
    };
    meta.write(path)
}

/// Load a mask from .mha; nonzero samples are normalized to 1.
pub fn load_mask(path: &Path) -> Result<RasterMask> {
    let meta = MetaImage::read(path)?;
    let bytes = meta
        .samples
        .iter()
        .map(|&v| if v != 0 { 1u8 } else { 0u8 })
        .collect();
    RasterMask::from_raw(meta.width, meta.height, bytes)
}

/// Import a grayscale image file (PNG/TIFF/...) as a base image.
///
/// Samples are widened to 16-bit luma. Spacing/origin are supplied by the
/// caller since raster formats do not carry physical geometry; projection
/// geometry, when present, rescales spacing once here.
pub fn import_grayscale(
    path: &Path,
    spacing: (f64, f64),
    origin: (f64, f64),
    geometry: Option<ProjectionGeometry>,
) -> Result<BaseImage> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();

    let mut pixels = Array2::<i32>::zeros((h as usize, w as usize));
    for (x, y, pixel) in gray.enumerate_pixels() {
        pixels[[y as usize, x as usize]] = pixel.0[0] as i32;
    }

    BaseImage::import(pixels, spacing, origin, geometry)
}
