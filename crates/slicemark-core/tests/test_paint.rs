use ndarray::Array2;

use slicemark_core::paint::StampOutcome;
use slicemark_core::session::Session;
use slicemark_core::view::{DisplayPoint, ViewTransform};

fn session_100() -> Session {
    let mut session = Session::new();
    session
        .import_image(Array2::zeros((100, 100)), (1.0, 1.0), (0.0, 0.0), None)
        .unwrap();
    session
}

fn at(x: f64, y: f64) -> DisplayPoint {
    DisplayPoint { x, y }
}

fn mask_get(session: &Session, x: i64, y: i64) -> u8 {
    session.store.active_segmentation().unwrap().mask.get(x, y)
}

#[test]
fn test_press_without_tool_is_ignored() {
    let mut session = session_100();
    let view = ViewTransform::default();
    assert!(matches!(
        session.on_press(at(50.0, 50.0), &view),
        StampOutcome::Ignored(_)
    ));
    assert_eq!(
        session.store.active_segmentation().unwrap().mask.count_nonzero(),
        0
    );
}

#[test]
fn test_press_without_active_layer_is_ignored() {
    let mut session = session_100();
    session.paint.toggle_paint();
    session.store.set_active_segmentation(None);
    let view = ViewTransform::default();
    assert!(matches!(
        session.on_press(at(50.0, 50.0), &view),
        StampOutcome::Ignored(_)
    ));
}

#[test]
fn test_single_press_stamps_circle_at_cursor() {
    let mut session = session_100();
    session.paint.toggle_paint();
    let view = ViewTransform::default();

    // Default brush radius is 10 world units; unit spacing makes that 10
    // pixels
    let outcome = session.on_press(at(50.0, 50.0), &view);
    assert_eq!(outcome, StampOutcome::Applied { dabs: 1 });
    session.on_release();

    for y in 0..100i64 {
        for x in 0..100i64 {
            let dx = (x - 50) as f64;
            let dy = (y - 50) as f64;
            let inside = dx * dx + dy * dy <= 100.0;
            assert_eq!(mask_get(&session, x, y), if inside { 1 } else { 0 });
        }
    }
}

#[test]
fn test_stroke_is_continuous_across_sparse_moves() {
    let mut session = session_100();
    session.paint.toggle_paint();
    let view = ViewTransform::default();

    session.on_press(at(20.0, 50.0), &view);
    // One jump spanning far more than the brush diameter
    let outcome = session.on_move(at(80.0, 50.0), &view);
    session.on_release();

    let StampOutcome::Applied { dabs } = outcome else {
        panic!("move should stamp");
    };
    assert!(dabs > 1);

    // No gap anywhere along the swept band
    for x in 10..=90i64 {
        assert_eq!(mask_get(&session, x, 50), 1, "gap at x = {x}");
    }
}

#[test]
fn test_out_of_bounds_press_keeps_stroke_alive() {
    let mut session = session_100();
    session.paint.toggle_paint();
    let view = ViewTransform::default();

    assert!(matches!(
        session.on_press(at(-50.0, 50.0), &view),
        StampOutcome::Ignored(_)
    ));
    assert!(session.paint.is_painting());

    // Re-entry stamps at the new position only; no line is swept in from
    // the border
    let outcome = session.on_move(at(5.0, 50.0), &view);
    assert_eq!(outcome, StampOutcome::Applied { dabs: 1 });
    assert_eq!(mask_get(&session, 5, 50), 1);
    assert_eq!(mask_get(&session, 20, 50), 0);
}

#[test]
fn test_erase_undoes_paint() {
    let mut session = session_100();
    let view = ViewTransform::default();

    session.paint.toggle_paint();
    session.on_press(at(50.0, 50.0), &view);
    session.on_release();
    assert!(session.store.active_segmentation().unwrap().mask.count_nonzero() > 0);

    session.paint.toggle_erase();
    session.on_press(at(50.0, 50.0), &view);
    session.on_release();
    assert_eq!(
        session.store.active_segmentation().unwrap().mask.count_nonzero(),
        0
    );
}

#[test]
fn test_release_terminates_stroke() {
    let mut session = session_100();
    session.paint.toggle_paint();
    let view = ViewTransform::default();

    session.on_press(at(50.0, 50.0), &view);
    session.on_release();
    assert!(!session.paint.is_painting());
    assert!(matches!(
        session.on_move(at(60.0, 50.0), &view),
        StampOutcome::Ignored(_)
    ));
    assert_eq!(mask_get(&session, 60, 50), 0);
}

#[test]
fn test_tools_are_mutually_exclusive() {
    let mut session = session_100();

    assert!(session.paint.toggle_paint());
    assert!(session.paint.enabled());

    // Enabling erase displaces paint
    assert!(session.paint.toggle_erase());
    assert_eq!(session.paint.mode(), slicemark_core::paint::BrushMode::Erase);

    // Toggling the active tool again disables it
    assert!(!session.paint.toggle_erase());
    assert!(!session.paint.enabled());
}

#[test]
fn test_anisotropic_spacing_keeps_brush_circular_in_world_units() {
    let mut session = Session::new();
    session
        .import_image(Array2::zeros((100, 100)), (2.0, 1.0), (0.0, 0.0), None)
        .unwrap();
    session.paint.toggle_paint();
    let view = ViewTransform::default();

    // World (100, 50) maps to index (50, 50); radius 10 world units spans
    // 5 index units in x and 10 in y
    session.on_press(at(100.0, 50.0), &view);
    session.on_release();

    assert_eq!(mask_get(&session, 55, 50), 1);
    assert_eq!(mask_get(&session, 57, 50), 0);
    assert_eq!(mask_get(&session, 50, 60), 1);
    assert_eq!(mask_get(&session, 50, 62), 0);
}

#[test]
fn test_stamp_marks_layer_modified_and_requests_render() {
    let mut session = session_100();
    session.paint.toggle_paint();
    let view = ViewTransform::default();
    session.take_render_request();

    session.on_press(at(50.0, 50.0), &view);
    session.on_release();

    assert!(session.store.active_segmentation().unwrap().modified);
    assert!(session.take_render_request());
}
