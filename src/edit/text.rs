use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;
use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::error::{ArborError, ArborResult};

/// Advance width of one glyph relative to the font size, used for hit boxes.
const GLYPH_ADVANCE: f64 = 0.6;
/// Line height relative to the font size.
const LINE_HEIGHT: f64 = 1.25;

/// A placed text annotation, in document coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    /// Placement ordinal, unique within a store.
    pub id: u64,
    /// Text content.
    pub content: String,
    /// Top-left corner of the text box.
    pub position: Point,
    /// Fill color.
    pub color: Rgb8,
    /// Font size in document units.
    pub font_size: f64,
    /// Still being placed; at most one item is pending.
    pub pending: bool,
}

impl TextItem {
    /// Estimated box size for `content` at `font_size`.
    pub fn box_size(content: &str, font_size: f64) -> Vec2 {
        let chars = content.chars().count().max(1) as f64;
        Vec2::new(chars * font_size * GLYPH_ADVANCE, font_size * LINE_HEIGHT)
    }

    /// Hit-test box.
    pub fn bounds(&self) -> Rect {
        let size = Self::box_size(&self.content, self.font_size);
        Rect::from_origin_size(self.position, (size.x, size.y))
    }

    /// Baseline origin used when rendering.
    pub fn baseline(&self) -> Point {
        Point::new(self.position.x, self.position.y + self.font_size)
    }
}

/// Ordered text annotations with a single pending slot.
#[derive(Clone, Debug, Default)]
pub struct TextStore {
    items: Vec<TextItem>,
    pending: Option<usize>,
    placements: u64,
}

impl TextStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every item in draw order, the pending one included.
    pub fn items(&self) -> &[TextItem] {
        &self.items
    }

    /// Number of placements made so far (confirmed, canceled or pending).
    pub fn placements(&self) -> u64 {
        self.placements
    }

    /// The pending item, if any.
    pub fn pending(&self) -> Option<&TextItem> {
        self.pending.and_then(|i| self.items.get(i))
    }

    /// Add a new pending item.
    ///
    /// Rejected when the content is blank or another item is still pending.
    pub fn place(
        &mut self,
        content: &str,
        position: Point,
        color: Rgb8,
        font_size: f64,
    ) -> ArborResult<&TextItem> {
        if self.pending.is_some() {
            return Err(ArborError::validation(
                "confirm or cancel the pending text first",
            ));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(ArborError::validation("text content is empty"));
        }
        if !position.is_finite() || !font_size.is_finite() || font_size <= 0.0 {
            return Err(ArborError::validation("invalid text position or size"));
        }

        let id = self.placements;
        self.placements += 1;
        self.items.push(TextItem {
            id,
            content: content.to_string(),
            position,
            color,
            font_size,
            pending: true,
        });
        let idx = self.items.len() - 1;
        self.pending = Some(idx);
        Ok(&self.items[idx])
    }

    /// Whether `p` falls inside the pending item's box.
    pub fn hit_pending(&self, p: Point) -> bool {
        self.pending().is_some_and(|t| t.bounds().contains(p))
    }

    /// Move the pending item by `delta`. Returns whether anything moved.
    pub fn move_pending(&mut self, delta: Vec2) -> bool {
        let Some(item) = self.pending.and_then(|i| self.items.get_mut(i)) else {
            return false;
        };
        if !delta.is_finite() || delta == Vec2::ZERO {
            return false;
        }
        item.position += delta;
        true
    }

    /// Confirm the pending item and return a copy of it.
    pub fn confirm(&mut self) -> Option<TextItem> {
        let idx = self.pending.take()?;
        let item = self.items.get_mut(idx)?;
        item.pending = false;
        Some(item.clone())
    }

    /// Remove the pending item.
    pub fn cancel(&mut self) -> Option<TextItem> {
        let idx = self.pending.take()?;
        (idx < self.items.len()).then(|| self.items.remove(idx))
    }

    /// Replace the confirmed items, keeping any pending item on top.
    pub fn restore(&mut self, confirmed: &[TextItem]) {
        let pending = self.pending.take().and_then(|i| self.items.get(i).cloned());
        self.items = confirmed.to_vec();
        if let Some(p) = pending {
            self.items.push(p);
            self.pending = Some(self.items.len() - 1);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/text.rs"]
mod tests;
