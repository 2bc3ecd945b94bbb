use super::*;

#[test]
fn eraser_ignores_brush_color_and_opacity() {
    let brush = Brush::new(Rgb8::new(10, 200, 30), 12.0, 0.3);
    let s = Stroke::begin(StrokeKind::Eraser, &brush, Point::new(1.0, 1.0));
    assert_eq!(s.color, Rgb8::BLACK);
    assert_eq!(s.opacity, 1.0);
    assert_eq!(s.width, 12.0);

    let p = Stroke::begin(StrokeKind::Pen, &brush, Point::new(1.0, 1.0));
    assert_eq!(p.color, Rgb8::new(10, 200, 30));
    assert_eq!(p.opacity, 0.3);
}

#[test]
fn push_drops_repeats_and_non_finite_points() {
    let mut s = Stroke::begin(StrokeKind::Pen, &Brush::default(), Point::new(0.0, 0.0));
    assert!(s.is_dot());
    assert!(!s.push(Point::new(0.0, 0.0)));
    assert!(!s.push(Point::new(f64::NAN, 1.0)));
    assert!(s.push(Point::new(3.0, 4.0)));
    assert!(!s.is_dot());
    assert_eq!(s.points.len(), 2);
}

#[test]
fn bounds_include_half_width() {
    let brush = Brush::new(Rgb8::BLACK, 4.0, 1.0);
    let mut s = Stroke::begin(StrokeKind::Pen, &brush, Point::new(10.0, 10.0));
    s.push(Point::new(20.0, 15.0));
    let b = s.bounds().unwrap();
    assert_eq!((b.x0, b.y0, b.x1, b.y1), (8.0, 8.0, 22.0, 17.0));
}
