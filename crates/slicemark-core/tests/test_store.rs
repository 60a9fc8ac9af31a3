use slicemark_core::error::SlicemarkError;
use slicemark_core::layer::Rgb;
use slicemark_core::store::{LayerStore, PALETTE};
use slicemark_core::view::WorldPoint;

#[test]
fn test_names_use_lowest_unused_number() {
    let mut store = LayerStore::new();
    assert_eq!(store.add_segmentation(8, 8), "Layer 1");
    assert_eq!(store.add_segmentation(8, 8), "Layer 2");
    assert_eq!(store.add_segmentation(8, 8), "Layer 3");

    store.remove_segmentation("Layer 2");
    assert_eq!(store.add_segmentation(8, 8), "Layer 2");
    assert_eq!(store.add_segmentation(8, 8), "Layer 4");
}

#[test]
fn test_each_kind_numbers_independently() {
    let mut store = LayerStore::new();
    assert_eq!(store.add_segmentation(8, 8), "Layer 1");
    assert_eq!(store.add_point(WorldPoint::new(1.0, 1.0)), "Point 1");
    assert_eq!(store.add_line(WorldPoint::new(0.0, 0.0), WorldPoint::new(1.0, 0.0)), "Line 1");
    assert_eq!(store.add_rect(WorldPoint::new(0.0, 0.0), WorldPoint::new(4.0, 4.0)), "Rect 1");
    assert_eq!(store.add_point(WorldPoint::new(2.0, 2.0)), "Point 2");
}

#[test]
fn test_palette_cycles_in_fixed_order() {
    let mut store = LayerStore::new();
    for i in 0..PALETTE.len() + 2 {
        let name = store.add_segmentation(4, 4);
        let layer = store.segmentation(&name).unwrap();
        assert_eq!(layer.color, PALETTE[i % PALETTE.len()]);
    }
}

#[test]
fn test_palette_is_shared_across_kinds() {
    let mut store = LayerStore::new();
    let a = store.add_segmentation(4, 4);
    let b = store.add_point(WorldPoint::new(0.0, 0.0));
    assert_eq!(store.segmentation(&a).unwrap().color, PALETTE[0]);
    assert_eq!(
        store.points().iter().find(|p| p.name == b).unwrap().color,
        PALETTE[1]
    );
}

#[test]
fn test_removal_does_not_rewind_palette() {
    let mut store = LayerStore::new();
    let first = store.add_segmentation(4, 4);
    store.remove_segmentation(&first);
    let second = store.add_segmentation(4, 4);
    assert_eq!(store.segmentation(&second).unwrap().color, PALETTE[1]);
}

#[test]
fn test_new_layer_becomes_active() {
    let mut store = LayerStore::new();
    let a = store.add_segmentation(8, 8);
    assert_eq!(store.active_segmentation().unwrap().name, a);
    let b = store.add_segmentation(8, 8);
    assert_eq!(store.active_segmentation().unwrap().name, b);

    assert!(store.set_active_segmentation(Some(&a)));
    assert_eq!(store.active_segmentation().unwrap().name, a);

    assert!(store.set_active_segmentation(None));
    assert!(store.active_segmentation().is_none());

    assert!(!store.set_active_segmentation(Some("no such layer")));
    assert!(store.active_segmentation().is_none());
}

#[test]
fn test_removing_active_layer_clears_selection() {
    let mut store = LayerStore::new();
    store.add_segmentation(8, 8);
    let b = store.add_segmentation(8, 8);
    assert!(store.remove_segmentation(&b));
    assert!(store.active_segmentation().is_none());
    assert!(!store.remove_segmentation(&b));
}

#[test]
fn test_rename_is_atomic() {
    let mut store = LayerStore::new();
    let a = store.add_segmentation(8, 8);
    let b = store.add_segmentation(8, 8);

    // Collision: nothing changes
    assert!(store.rename_segmentation(&a, &b).is_err());
    assert!(store.segmentation(&a).is_some());

    // Reserved character: nothing changes
    assert!(store.rename_segmentation(&a, "bad/name").is_err());
    assert!(store.segmentation(&a).is_some());

    // Valid rename follows the active selection
    assert!(store.set_active_segmentation(Some(&a)));
    store.rename_segmentation(&a, "tumor").unwrap();
    assert!(store.segmentation(&a).is_none());
    assert_eq!(store.active_segmentation().unwrap().name, "tumor");
}

#[test]
fn test_rename_of_missing_layer_reports_unknown() {
    let mut store = LayerStore::new();
    store.add_segmentation(8, 8);
    assert!(matches!(
        store.rename_segmentation("ghost", "tumor"),
        Err(SlicemarkError::UnknownLayer(_))
    ));
    // Distinct from a name that fails validation
    assert!(matches!(
        store.rename_segmentation("Layer 1", "bad/name"),
        Err(SlicemarkError::InvalidName(_))
    ));
}

#[test]
fn test_reserved_workspace_names_are_refused() {
    let mut store = LayerStore::new();
    let a = store.add_segmentation(8, 8);
    assert!(matches!(
        store.rename_segmentation(&a, "input_image"),
        Err(SlicemarkError::InvalidName(_))
    ));
    assert!(store.segmentation(&a).is_some());
}

#[test]
fn test_rename_to_same_name_is_noop() {
    let mut store = LayerStore::new();
    let a = store.add_segmentation(8, 8);
    store.rename_segmentation(&a, &a).unwrap();
    assert!(store.segmentation(&a).is_some());
}

#[test]
fn test_dirty_tracking() {
    let mut store = LayerStore::new();
    assert!(!store.is_dirty());
    let a = store.add_segmentation(8, 8);
    assert!(store.is_dirty());
    assert!(store.segmentation(&a).unwrap().modified == false);

    store.set_alpha(&a, 0.8);
    assert!(store.segmentation(&a).unwrap().modified);

    store.clear_dirty();
    assert!(!store.is_dirty());
    assert!(!store.segmentation(&a).unwrap().modified);
}

#[test]
fn test_render_request_is_one_shot() {
    let mut store = LayerStore::new();
    assert!(!store.take_render_request());
    store.add_segmentation(8, 8);
    assert!(store.take_render_request());
    assert!(!store.take_render_request());
}

#[test]
fn test_visibility_color_alpha_updates() {
    let mut store = LayerStore::new();
    let a = store.add_segmentation(8, 8);

    assert!(store.set_visible(&a, false));
    assert!(!store.segmentation(&a).unwrap().visible);

    assert!(store.set_color(&a, Rgb([1, 2, 3])));
    assert_eq!(store.segmentation(&a).unwrap().color, Rgb([1, 2, 3]));

    assert!(store.set_alpha(&a, 2.0));
    assert_eq!(store.segmentation(&a).unwrap().alpha(), 1.0);

    assert!(!store.set_visible("missing", true));
}

#[test]
fn test_clear_resets_palette_and_selection() {
    let mut store = LayerStore::new();
    store.add_segmentation(8, 8);
    store.add_point(WorldPoint::new(0.0, 0.0));
    store.clear();
    assert!(store.is_empty());
    assert!(store.active_segmentation().is_none());
    assert_eq!(store.palette_cursor(), 0);
    let name = store.add_segmentation(8, 8);
    assert_eq!(store.segmentation(&name).unwrap().color, PALETTE[0]);
}
