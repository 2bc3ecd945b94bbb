use super::*;
use crate::assets::decode::empty_fontdb;
use crate::edit::brush::Brush;
use crate::edit::stroke::StrokeKind;
use crate::foundation::core::Point;

#[path = "../fixtures.rs"]
mod fixtures;

fn compositor() -> LayerCompositor {
    LayerCompositor::new(
        fixtures::surface(),
        fixtures::DOC,
        CompositorOpts::default(),
        TextRasterizer::new(empty_fontdb(), "sans-serif"),
    )
    .unwrap()
}

fn base_px(c: &LayerCompositor, x: u32, y: u32) -> [u8; 4] {
    c.base_raster().pixel(x, y).unwrap()
}

fn stroke(kind: StrokeKind, pts: &[(f64, f64)]) -> Stroke {
    let brush = Brush::new(Rgb8::new(200, 0, 0), 3.0, 0.8);
    let mut s = Stroke::begin(kind, &brush, Point::new(pts[0].0, pts[0].1));
    for &(x, y) in &pts[1..] {
        s.push(Point::new(x, y));
    }
    s
}

#[test]
fn unloaded_assets_are_skipped_and_recorded() {
    let lib = TemplateLibrary::new(fixtures::catalog(), empty_fontdb());
    let mut c = compositor();
    c.redraw_base(&lib, Some(0));
    assert_eq!(base_px(&c, 4, 8), [255, 255, 255, 255]);
    assert_eq!(c.missing().len(), 2);
    assert!(c.missing().contains(&AssetKey::part(0, Variant::Guide)));
}

#[test]
fn active_part_shows_guide_inactive_shows_faint_default() {
    let lib = fixtures::library();
    let mut c = compositor();

    c.redraw_base(&lib, Some(0));
    assert!(c.missing().is_empty());
    assert_eq!(base_px(&c, 4, 8), [128, 128, 128, 255]);
    // Inactive overlay at default opacity: a tint, not the full fill color.
    let corner = base_px(&c, 14, 2);
    assert_ne!(corner, [255, 170, 0, 255]);
    assert_ne!(corner, [255, 255, 255, 255]);

    c.redraw_base(&lib, Some(1));
    assert_eq!(base_px(&c, 14, 2), [0, 0, 255, 255]);
    assert_ne!(base_px(&c, 4, 8), [128, 128, 128, 255]);
    // Background elsewhere.
    assert_eq!(base_px(&c, 10, 12), [255, 255, 255, 255]);
}

#[test]
fn colored_active_part_is_drawn_over_its_guide() {
    let lib = fixtures::library();
    let mut c = compositor();
    c.apply_fill(&lib, 0, Rgb8::new(255, 0, 0)).unwrap();
    c.redraw_base(&lib, Some(0));
    assert_eq!(base_px(&c, 4, 8), [255, 0, 0, 255]);

    // Inactive but filled: full color, not the faint default.
    c.redraw_base(&lib, Some(1));
    assert_eq!(base_px(&c, 4, 8), [255, 0, 0, 255]);
}

#[test]
fn refill_replaces_the_cached_asset() {
    let lib = fixtures::library();
    let mut c = compositor();
    c.apply_fill(&lib, 0, Rgb8::new(255, 0, 0)).unwrap();
    c.apply_fill(&lib, 0, Rgb8::new(255, 0, 0)).unwrap();
    assert_eq!(c.colored_len(), 1);

    c.apply_fill(&lib, 0, Rgb8::new(0, 0, 255)).unwrap();
    assert_eq!(c.colored_len(), 1);
    assert_eq!(c.colored(0).unwrap().color, Rgb8::new(0, 0, 255));
    c.redraw_base(&lib, Some(0));
    assert_eq!(base_px(&c, 4, 8), [0, 0, 255, 255]);
}

#[test]
fn fill_of_unloaded_part_is_a_recolor_error() {
    let lib = TemplateLibrary::new(fixtures::catalog(), empty_fontdb());
    let mut c = compositor();
    let err = c.apply_fill(&lib, 0, Rgb8::BLACK).unwrap_err();
    assert!(matches!(err, ArborError::Recolor(_)));
    assert_eq!(c.colored_len(), 0);
}

#[test]
fn sync_fills_matches_the_requested_map() {
    let lib = fixtures::library();
    let mut c = compositor();
    c.apply_fill(&lib, 0, Rgb8::new(255, 0, 0)).unwrap();
    c.apply_fill(&lib, 1, Rgb8::new(0, 255, 0)).unwrap();

    let mut fills = BTreeMap::new();
    fills.insert(1, Rgb8::new(0, 0, 255));
    assert!(c.sync_fills(&lib, &fills).is_empty());
    assert!(c.colored(0).is_none());
    assert_eq!(c.colored(1).unwrap().color, Rgb8::new(0, 0, 255));
}

#[test]
fn stroke_replay_is_deterministic() {
    let strokes = vec![
        stroke(StrokeKind::Pen, &[(1.0, 1.0), (14.0, 14.0)]),
        stroke(StrokeKind::Pen, &[(1.0, 14.0), (14.0, 1.0), (8.0, 8.0)]),
        stroke(StrokeKind::Eraser, &[(0.0, 8.0), (16.0, 8.0)]),
        stroke(StrokeKind::Pen, &[(5.0, 5.0)]),
    ];

    let mut incremental = compositor();
    for s in &strokes {
        incremental.redraw_user(&[], Some(s)).unwrap();
        let preview = incremental.user_raster();
        incremental.append_stroke(s);
        incremental.redraw_user(&[], None).unwrap();
        assert_eq!(preview, incremental.user_raster(), "preview must match commit");
    }

    let mut replayed = compositor();
    replayed.redraw_strokes(&strokes);
    replayed.redraw_user(&[], None).unwrap();
    assert_eq!(incremental.user_raster(), replayed.user_raster());
}

#[test]
fn eraser_never_touches_the_base() {
    let lib = fixtures::library();
    let mut c = compositor();
    c.redraw_base(&lib, Some(0));
    let before = c.base_raster();
    c.redraw_strokes(&[stroke(StrokeKind::Eraser, &[(0.0, 0.0), (16.0, 16.0)])]);
    c.redraw_user(&[], None).unwrap();
    assert_eq!(before, c.base_raster());
    assert_eq!(c.combined().unwrap(), before);
}

#[test]
fn combined_is_base_then_user() {
    let lib = fixtures::library();
    let mut c = compositor();
    c.redraw_base(&lib, Some(0));
    let opaque = {
        let brush = Brush::new(Rgb8::new(0, 0, 0), 6.0, 1.0);
        Stroke::begin(StrokeKind::Pen, &brush, Point::new(12.0, 12.0))
    };
    c.redraw_strokes(std::slice::from_ref(&opaque));
    c.redraw_user(&[], None).unwrap();
    let out = c.combined().unwrap();
    assert_eq!(out.pixel(12, 12), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(4, 8), Some([128, 128, 128, 255]));
}

#[test]
fn resize_drops_size_dependent_caches() {
    let lib = fixtures::library();
    let mut c = compositor();
    c.apply_fill(&lib, 0, Rgb8::new(255, 0, 0)).unwrap();
    c.resize(SurfaceSize::new(32, 32).unwrap()).unwrap();
    assert_eq!(c.size(), SurfaceSize::new(32, 32).unwrap());
    assert_eq!(c.colored_len(), 0);
    assert_eq!(c.base_raster().width, 32);
}
