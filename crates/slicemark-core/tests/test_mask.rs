use slicemark_core::mask::RasterMask;

/// Number of cells inside the circle of the given radius centered at
/// (cx, cy), clipped to a w x h grid.
fn clipped_disk_cells(w: i64, h: i64, cx: i64, cy: i64, radius: f64) -> usize {
    let mut count = 0;
    for y in 0..h {
        for x in 0..w {
            let dx = (x - cx) as f64 / radius;
            let dy = (y - cy) as f64 / radius;
            if dx * dx + dy * dy <= 1.0 {
                count += 1;
            }
        }
    }
    count
}

#[test]
fn test_stamp_fills_exact_circle() {
    let mut mask = RasterMask::zeros(100, 100);
    mask.set_circle(50, 50, 10.0, 10.0, 1);

    for y in 0..100i64 {
        for x in 0..100i64 {
            let dx = (x - 50) as f64;
            let dy = (y - 50) as f64;
            let inside = dx * dx + dy * dy <= 100.0;
            assert_eq!(mask.get(x, y), if inside { 1 } else { 0 }, "cell ({x}, {y})");
        }
    }
}

#[test]
fn test_stamp_is_idempotent() {
    let mut mask = RasterMask::zeros(64, 64);
    mask.set_circle(30, 30, 8.0, 8.0, 1);
    let first = mask.count_nonzero();
    mask.set_circle(30, 30, 8.0, 8.0, 1);
    assert_eq!(mask.count_nonzero(), first);
}

#[test]
fn test_erase_inverts_paint() {
    let mut mask = RasterMask::zeros(64, 64);
    mask.set_circle(30, 30, 8.0, 8.0, 1);
    assert!(mask.count_nonzero() > 0);
    mask.set_circle(30, 30, 8.0, 8.0, 0);
    assert_eq!(mask.count_nonzero(), 0);
}

#[test]
fn test_stamp_clips_at_borders() {
    let mut mask = RasterMask::zeros(100, 100);
    mask.set_circle(0, 0, 10.0, 10.0, 1);
    assert_eq!(
        mask.count_nonzero(),
        clipped_disk_cells(100, 100, 0, 0, 10.0)
    );

    // Fully outside the grid: nothing changes, nothing panics
    let mut mask = RasterMask::zeros(100, 100);
    mask.set_circle(-200, -200, 10.0, 10.0, 1);
    assert_eq!(mask.count_nonzero(), 0);
}

#[test]
fn test_anisotropic_stamp_is_elliptical() {
    let mut mask = RasterMask::zeros(64, 64);
    // x radius twice the y radius
    mask.set_circle(32, 32, 10.0, 5.0, 1);
    assert_eq!(mask.get(41, 32), 1);
    assert_eq!(mask.get(32, 36), 1);
    assert_eq!(mask.get(32, 38), 0);
    assert_eq!(mask.get(38, 38), 0);
}

#[test]
fn test_from_raw_normalizes_values() {
    let mask = RasterMask::from_raw(2, 2, vec![0, 1, 7, 255]).unwrap();
    assert_eq!(mask.get(0, 0), 0);
    assert_eq!(mask.get(1, 0), 1);
    assert_eq!(mask.get(0, 1), 1);
    assert_eq!(mask.get(1, 1), 1);

    assert!(RasterMask::from_raw(2, 2, vec![0, 1]).is_err());
}

#[test]
fn test_out_of_bounds_reads_background() {
    let mask = RasterMask::zeros(4, 4);
    assert_eq!(mask.get(-1, 0), 0);
    assert_eq!(mask.get(0, -1), 0);
    assert_eq!(mask.get(4, 0), 0);
    assert_eq!(mask.get(0, 100), 0);
}
