use super::*;
use crate::edit::brush::Brush;
use crate::foundation::color::Rgb8;
use crate::foundation::core::Point;

fn canvas() -> Pixmap {
    Pixmap::new(20, 20).unwrap()
}

fn line(kind: StrokeKind, from: Point, to: Point, width: f64) -> Stroke {
    let brush = Brush::new(Rgb8::new(255, 0, 0), width, 1.0);
    let mut s = Stroke::begin(kind, &brush, from);
    s.push(to);
    s
}

fn alpha(pm: &Pixmap, x: u32, y: u32) -> u8 {
    pm.pixel(x, y).unwrap().alpha()
}

#[test]
fn pen_paints_along_the_line() {
    let mut pm = canvas();
    let s = line(StrokeKind::Pen, Point::new(2.0, 10.0), Point::new(18.0, 10.0), 4.0);
    draw_stroke(&mut pm, &s, Transform::identity());
    let px = pm.pixel(10, 10).unwrap();
    assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 0, 0, 255));
    assert_eq!(alpha(&pm, 10, 2), 0);
}

#[test]
fn dot_is_drawn_for_single_point() {
    let mut pm = canvas();
    let brush = Brush::new(Rgb8::BLACK, 6.0, 1.0);
    let s = Stroke::begin(StrokeKind::Pen, &brush, Point::new(10.0, 10.0));
    draw_stroke(&mut pm, &s, Transform::identity());
    assert_eq!(alpha(&pm, 10, 10), 255);
    assert_eq!(alpha(&pm, 0, 0), 0);
}

#[test]
fn eraser_cuts_a_hole() {
    let mut pm = canvas();
    pm.fill(resvg::tiny_skia::Color::from_rgba8(0, 0, 255, 255));
    let s = line(StrokeKind::Eraser, Point::new(0.0, 10.0), Point::new(20.0, 10.0), 4.0);
    draw_stroke(&mut pm, &s, Transform::identity());
    assert_eq!(alpha(&pm, 10, 10), 0);
    assert_eq!(alpha(&pm, 10, 2), 255);
}

#[test]
fn transform_scales_document_units() {
    let mut pm = canvas();
    let s = line(StrokeKind::Pen, Point::new(1.0, 5.0), Point::new(9.0, 5.0), 2.0);
    draw_stroke(&mut pm, &s, Transform::from_scale(2.0, 2.0));
    assert_eq!(alpha(&pm, 10, 10), 255);
    assert_eq!(alpha(&pm, 10, 2), 0);
}
