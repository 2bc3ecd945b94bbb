use resvg::tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke as LineStyle,
    Transform,
};

use crate::edit::stroke::{Stroke, StrokeKind};

/// Draw `stroke` (document coordinates) onto `pixmap` through `doc_to_px`.
///
/// Pens compose source-over at the stroke opacity; erasers punch destination-out holes. A
/// single-point stroke is drawn as a round dot of the stroke width.
pub(crate) fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke, doc_to_px: Transform) {
    let mut paint = Paint::default();
    paint.anti_alias = true;
    match stroke.kind {
        StrokeKind::Pen => {
            paint.set_color(stroke.color.to_skia(stroke.opacity));
            paint.blend_mode = BlendMode::SourceOver;
        }
        StrokeKind::Eraser => {
            paint.set_color_rgba8(0, 0, 0, 255);
            paint.blend_mode = BlendMode::DestinationOut;
        }
    }

    let Some(first) = stroke.points.first() else {
        return;
    };

    if stroke.is_dot() {
        let r = (stroke.width * 0.5).max(0.5) as f32;
        if let Some(path) = PathBuilder::from_circle(first.x as f32, first.y as f32, r) {
            pixmap.fill_path(&path, &paint, FillRule::Winding, doc_to_px, None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in &stroke.points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let style = LineStyle {
        width: stroke.width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..LineStyle::default()
    };
    pixmap.stroke_path(&path, &paint, &style, doc_to_px, None);
}

#[cfg(test)]
#[path = "../../tests/unit/render/stroke.rs"]
mod tests;
