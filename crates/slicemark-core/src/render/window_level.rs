use ndarray::Array2;

use crate::image::BaseImage;

/// Linear window/level contrast mapping to 8-bit display values.
///
/// Samples are clipped to `[level - width/2, level + width/2]` and remapped
/// to 0..255, truncating to integer. Width must be positive; that is
/// enforced at the settings boundary, not here.
pub fn apply_window_level(image: &BaseImage, level: f64, width: f64) -> Array2<u8> {
    let lo = level - width / 2.0;
    let hi = level + width / 2.0;

    image.pixels().mapv(|v| {
        let clamped = (v as f64).clamp(lo, hi);
        (((clamped - lo) / width) * 255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;
    use crate::image::BaseImage;

    #[test]
    fn endpoints_map_to_0_and_255() {
        let mut pixels = Array2::zeros((1, 3));
        pixels[[0, 0]] = -50;
        pixels[[0, 1]] = 0;
        pixels[[0, 2]] = 50;
        let image = BaseImage::new(pixels, (1.0, 1.0), (0.0, 0.0)).unwrap();

        let gray = apply_window_level(&image, 0.0, 100.0);
        assert_eq!(gray[[0, 0]], 0);
        assert_eq!(gray[[0, 1]], 127);
        assert_eq!(gray[[0, 2]], 255);
    }

    #[test]
    fn values_outside_window_are_clipped() {
        let mut pixels = Array2::zeros((1, 2));
        pixels[[0, 0]] = -1000;
        pixels[[0, 1]] = 1000;
        let image = BaseImage::new(pixels, (1.0, 1.0), (0.0, 0.0)).unwrap();

        let gray = apply_window_level(&image, 0.0, 100.0);
        assert_eq!(gray[[0, 0]], 0);
        assert_eq!(gray[[0, 1]], 255);
    }
}
