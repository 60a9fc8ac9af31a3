use crate::image::BaseImage;
use crate::layer::{LineEntity, PointEntity, RectEntity};
use crate::view::{world_to_index, IndexPoint, WorldPoint};

use super::RgbFrame;

/// Marker radius for point entities, in display pixels.
const POINT_RADIUS: i64 = 5;
/// Ring radius highlighting the active point.
const ACTIVE_RING_RADIUS: i64 = 8;
const ACTIVE_RING_COLOR: [u8; 3] = [255, 255, 255];
/// Extra stroke width for the active line/rect.
const ACTIVE_STROKE_BONUS: f64 = 2.0;

/// Visible points as filled circles; the active point gets a white ring.
pub fn draw_points(
    frame: &mut RgbFrame,
    image: &BaseImage,
    points: &[PointEntity],
    active: Option<&str>,
) {
    for point in points {
        if !point.visible {
            continue;
        }
        let center = world_to_index(point.position, image);
        fill_circle(frame, center, POINT_RADIUS, point.color.0);
        if active == Some(point.name.as_str()) {
            outline_circle(frame, center, ACTIVE_RING_RADIUS, ACTIVE_RING_COLOR);
        }
    }
}

/// Visible lines as strokes of their own width; the active line is thicker.
pub fn draw_lines(
    frame: &mut RgbFrame,
    image: &BaseImage,
    lines: &[LineEntity],
    active: Option<&str>,
) {
    for line in lines {
        if !line.visible {
            continue;
        }
        let mut width = line.width();
        if active == Some(line.name.as_str()) {
            width += ACTIVE_STROKE_BONUS;
        }
        stroke_segment(frame, image, line.point1, line.point2, width, line.color.0);
    }
}

/// Visible rectangles as four edge strokes; the active rect is thicker.
pub fn draw_rects(
    frame: &mut RgbFrame,
    image: &BaseImage,
    rects: &[RectEntity],
    active: Option<&str>,
) {
    for rect in rects {
        if !rect.visible {
            continue;
        }
        let width = if active == Some(rect.name.as_str()) {
            1.0 + ACTIVE_STROKE_BONUS
        } else {
            1.0
        };
        let c1 = rect.corner1();
        let c2 = rect.corner2();
        let bl = WorldPoint::new(c1.x, c2.y);
        let tr = WorldPoint::new(c2.x, c1.y);
        stroke_segment(frame, image, c1, tr, width, rect.color.0);
        stroke_segment(frame, image, tr, c2, width, rect.color.0);
        stroke_segment(frame, image, c2, bl, width, rect.color.0);
        stroke_segment(frame, image, bl, c1, width, rect.color.0);
    }
}

/// Stroke a world-space segment by stamping disks along its Bresenham walk.
pub fn stroke_segment(
    frame: &mut RgbFrame,
    image: &BaseImage,
    p1: WorldPoint,
    p2: WorldPoint,
    width: f64,
    color: [u8; 3],
) {
    let a = world_to_index(p1, image);
    let b = world_to_index(p2, image);
    let radius = ((width / 2.0).round() as i64).max(0);

    for p in bresenham(a, b) {
        if radius == 0 {
            frame.put_clipped(p.x, p.y, color);
        } else {
            fill_circle(frame, p, radius, color);
        }
    }
}

/// Filled disk at an index position, clipped to the frame.
pub fn fill_circle(frame: &mut RgbFrame, center: IndexPoint, radius: i64, color: [u8; 3]) {
    let r2 = radius * radius;
    for j in -radius..=radius {
        for i in -radius..=radius {
            if i * i + j * j <= r2 {
                frame.put_clipped(center.x + i, center.y + j, color);
            }
        }
    }
}

/// Circle outline, drawn as a segment walk around the circumference.
pub fn outline_circle(frame: &mut RgbFrame, center: IndexPoint, radius: i64, color: [u8; 3]) {
    outline_ellipse(frame, center, radius as f64, radius as f64, color);
}

/// Ellipse outline used for circles and for the brush preview under
/// anisotropic spacing.
pub fn outline_ellipse(
    frame: &mut RgbFrame,
    center: IndexPoint,
    radius_x: f64,
    radius_y: f64,
    color: [u8; 3],
) {
    let circumference = 2.0 * std::f64::consts::PI * radius_x.max(radius_y).max(1.0);
    let segments = (circumference * 2.0).ceil().max(16.0) as usize;

    for k in 0..segments {
        let angle = 2.0 * std::f64::consts::PI * k as f64 / segments as f64;
        let x = center.x + (radius_x * angle.cos()).round() as i64;
        let y = center.y + (radius_y * angle.sin()).round() as i64;
        frame.put_clipped(x, y, color);
    }
}

fn bresenham(a: IndexPoint, b: IndexPoint) -> Vec<IndexPoint> {
    let mut points = Vec::new();
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (a.x, a.y);

    loop {
        points.push(IndexPoint { x, y });
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bresenham_connects_endpoints() {
        let pts = bresenham(IndexPoint { x: 0, y: 0 }, IndexPoint { x: 5, y: 3 });
        assert_eq!(pts.first(), Some(&IndexPoint { x: 0, y: 0 }));
        assert_eq!(pts.last(), Some(&IndexPoint { x: 5, y: 3 }));
        // 8-connected: consecutive points differ by at most one per axis
        for pair in pts.windows(2) {
            assert!((pair[1].x - pair[0].x).abs() <= 1);
            assert!((pair[1].y - pair[0].y).abs() <= 1);
        }
    }
}
