use crate::foundation::error::{ArborError, ArborResult};

pub use kurbo::{Point, Rect, Vec2};

/// Pixel dimensions of a raster surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Largest accepted edge length. Working-resolution rasters multiply this further.
    pub const MAX_DIM: u32 = 8_192;

    /// Create a validated size with both edges in `1..=MAX_DIM`.
    pub fn new(width: u32, height: u32) -> ArborResult<Self> {
        if width == 0 || height == 0 {
            return Err(ArborError::validation("surface size must be non-zero"));
        }
        if width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(ArborError::validation(format!(
                "surface size too large: {width}x{height} (max {max}x{max})",
                max = Self::MAX_DIM
            )));
        }
        Ok(Self { width, height })
    }

    /// Multiply both edges by `factor` (saturating).
    pub fn scaled(self, factor: u32) -> Self {
        Self {
            width: self.width.saturating_mul(factor.max(1)),
            height: self.height.saturating_mul(factor.max(1)),
        }
    }

    /// Bytes needed for a tightly packed RGBA8 buffer of this size.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Logical size of the template document in which strokes and text are stored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSize {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
}

impl DocumentSize {
    /// Center point of the document.
    pub fn center(self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Scale factors mapping document units onto `surface` pixels.
    pub fn scale_to(self, surface: SurfaceSize) -> (f64, f64) {
        (
            f64::from(surface.width) / self.width.max(1e-6),
            f64::from(surface.height) / self.height.max(1e-6),
        )
    }
}

impl Default for DocumentSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// UI language used for stage text and fallback messages.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    Zh,
}

/// A string available in every supported [`Locale`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LocalizedText {
    /// English text.
    pub en: String,
    /// Chinese text. Empty falls back to English.
    #[serde(default)]
    pub zh: String,
}

impl LocalizedText {
    /// Build from both variants.
    pub fn new(en: impl Into<String>, zh: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh: zh.into(),
        }
    }

    /// Resolve the text for `locale`.
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Zh if self.zh.is_empty() => &self.en,
            Locale::Zh => &self.zh,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
