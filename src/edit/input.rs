use serde::{Deserialize, Serialize};

use crate::foundation::core::{DocumentSize, Point, SurfaceSize};

/// Raw pointer input, in display pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Pointer moved.
    Move {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Button released.
    Up {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Pointer left the canvas; ends any drag.
    Leave,
}

impl PointerEvent {
    /// Position of the event, if it has one.
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } | Self::Up { x, y } => Some(Point::new(x, y)),
            Self::Leave => None,
        }
    }
}

/// Pointer input after mapping into document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DocPointer {
    /// Button pressed.
    Down(Point),
    /// Pointer moved.
    Move(Point),
    /// Button released.
    Up(Point),
    /// Pointer left the canvas.
    Leave,
}

/// Mapping between display pixels and document units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewMapping {
    sx: f64,
    sy: f64,
}

impl ViewMapping {
    /// Mapping for a document shown at `display` size.
    pub fn new(document: DocumentSize, display: SurfaceSize) -> Self {
        let (sx, sy) = document.scale_to(display);
        Self { sx, sy }
    }

    /// Display point to document point.
    pub fn to_document(&self, p: Point) -> Point {
        Point::new(p.x / self.sx, p.y / self.sy)
    }

    /// Document point to display point.
    pub fn to_display(&self, p: Point) -> Point {
        Point::new(p.x * self.sx, p.y * self.sy)
    }

    /// Map a display event.
    pub fn map(&self, ev: PointerEvent) -> DocPointer {
        match ev {
            PointerEvent::Down { x, y } => DocPointer::Down(self.to_document(Point::new(x, y))),
            PointerEvent::Move { x, y } => DocPointer::Move(self.to_document(Point::new(x, y))),
            PointerEvent::Up { x, y } => DocPointer::Up(self.to_document(Point::new(x, y))),
            PointerEvent::Leave => DocPointer::Leave,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/input.rs"]
mod tests;
