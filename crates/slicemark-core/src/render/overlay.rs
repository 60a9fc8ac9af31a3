use crate::layer::SegmentationLayer;

use super::RgbFrame;

/// Alpha-blend each visible segmentation layer over the frame in insertion
/// order, so later-added layers paint on top.
pub fn blend_segmentations(frame: &mut RgbFrame, layers: &[SegmentationLayer]) {
    for layer in layers {
        if !layer.visible {
            continue;
        }
        let alpha = layer.alpha();
        let color = layer.color.0;

        for ((y, x), &cell) in layer.mask.data().indexed_iter() {
            if cell == 0 {
                continue;
            }
            let current = frame.get(x, y);
            let mut blended = [0u8; 3];
            for c in 0..3 {
                let v = (1.0 - alpha) * current[c] as f64 + alpha * color[c] as f64;
                blended[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            frame.put(x, y, blended);
        }
    }
}
