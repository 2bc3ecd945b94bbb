use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;

/// Pen settings applied to new strokes, text and fills.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    color: Rgb8,
    width: f64,
    opacity: f32,
}

impl Brush {
    /// Thinnest accepted stroke width, in document units.
    pub const MIN_WIDTH: f64 = 1.0;
    /// Thickest accepted stroke width, in document units.
    pub const MAX_WIDTH: f64 = 50.0;
    /// Default ink color.
    pub const DEFAULT_COLOR: Rgb8 = Rgb8::new(0x33, 0x33, 0x33);

    /// Build a brush; width and opacity are clamped into range.
    pub fn new(color: Rgb8, width: f64, opacity: f32) -> Self {
        let mut b = Self::default();
        b.set_color(color);
        b.set_width(width);
        b.set_opacity(opacity);
        b
    }

    /// Current color.
    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// Current width in document units.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Current opacity in `0..=1`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Select a color.
    pub fn set_color(&mut self, color: Rgb8) {
        self.color = color;
    }

    /// Set the width, clamped to `MIN_WIDTH..=MAX_WIDTH`. Non-finite input is ignored.
    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() {
            self.width = width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH);
        }
    }

    /// Set the opacity, clamped to `0..=1`. Non-finite input is ignored.
    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Self::DEFAULT_COLOR,
            width: 5.0,
            opacity: 1.0,
        }
    }
}

/// Most recently used colors, newest first, without duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentColors {
    colors: Vec<Rgb8>,
}

impl RecentColors {
    /// Number of colors retained.
    pub const CAPACITY: usize = 8;

    /// Move `color` to the front, evicting the oldest entry when full.
    pub fn push(&mut self, color: Rgb8) {
        self.colors.retain(|c| *c != color);
        self.colors.insert(0, color);
        self.colors.truncate(Self::CAPACITY);
    }

    /// Colors, newest first.
    pub fn as_slice(&self) -> &[Rgb8] {
        &self.colors
    }
}

impl Default for RecentColors {
    fn default() -> Self {
        Self {
            colors: vec![Brush::DEFAULT_COLOR],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/brush.rs"]
mod tests;
