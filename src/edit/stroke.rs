use serde::{Deserialize, Serialize};

use crate::edit::brush::Brush;
use crate::foundation::color::Rgb8;
use crate::foundation::core::{Point, Rect};

/// How a stroke composes onto the user surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeKind {
    /// Normal source-over painting.
    Pen,
    /// Cuts a hole in the user surface. Color is ignored.
    Eraser,
}

/// One continuous pointer drag, in document coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Composition mode.
    pub kind: StrokeKind,
    /// Ink color (unused by erasers).
    pub color: Rgb8,
    /// Line width in document units.
    pub width: f64,
    /// Opacity in `0..=1` (erasers always use `1`).
    pub opacity: f32,
    /// Recorded points, in order. Never empty for a committed stroke.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Begin a stroke at `start` with the brush settings.
    ///
    /// `start` must be finite; the interaction controller drops non-finite input before this.
    pub fn begin(kind: StrokeKind, brush: &Brush, start: Point) -> Self {
        let (color, opacity) = match kind {
            StrokeKind::Pen => (brush.color(), brush.opacity()),
            StrokeKind::Eraser => (Rgb8::BLACK, 1.0),
        };
        Self {
            kind,
            color,
            width: brush.width(),
            opacity,
            points: vec![start],
        }
    }

    /// Append `p`. Non-finite points and exact repeats of the last point are dropped.
    ///
    /// Returns whether the point was kept.
    pub fn push(&mut self, p: Point) -> bool {
        if !p.is_finite() || self.points.last() == Some(&p) {
            return false;
        }
        self.points.push(p);
        true
    }

    /// A stroke with no recorded movement, drawn as a round dot.
    pub fn is_dot(&self) -> bool {
        self.points.len() < 2
    }

    /// Bounding box of the points, grown by half the line width.
    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.points.first()?;
        let r = self
            .points
            .iter()
            .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p));
        Some(r.inflate(self.width * 0.5, self.width * 0.5))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/stroke.rs"]
mod tests;
