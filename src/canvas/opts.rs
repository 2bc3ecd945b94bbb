use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;
use crate::foundation::core::{DocumentSize, SurfaceSize};
use crate::foundation::error::{ArborError, ArborResult};
use crate::render::compositor::CompositorOpts;

/// Options controlling a [`crate::CanvasEngine`].
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Display surface width in pixels.
    pub width: u32,
    /// Display surface height in pixels.
    pub height: u32,
    /// Logical template size in which strokes and text are stored.
    pub document: DocumentSize,
    /// Base surface background.
    pub background: Rgb8,
    /// Linear oversampling factor for recolor.
    pub working_scale: u32,
    /// Opacity of unfilled, inactive parts.
    pub default_part_opacity: f32,
    /// Font size of new text items, in document units.
    pub text_font_size: f64,
    /// Preferred font family for text items.
    pub text_font_family: String,
    /// Maximum placement offset of new text items from the document center.
    pub text_jitter: f64,
    /// Seed for placement jitter.
    pub seed: u64,
    /// Retained history entries. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Extra directory scanned for fonts.
    pub font_dir: Option<PathBuf>,
}

impl Default for EngineOpts {
    fn default() -> Self {
        let compositor = CompositorOpts::default();
        Self {
            width: 800,
            height: 600,
            document: DocumentSize::default(),
            background: compositor.background,
            working_scale: compositor.working_scale,
            default_part_opacity: compositor.default_part_opacity,
            text_font_size: 16.0,
            text_font_family: "Avenir".to_string(),
            text_jitter: 20.0,
            seed: 0,
            history_limit: None,
            font_dir: None,
        }
    }
}

impl EngineOpts {
    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> ArborResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read engine options '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse options from JSON text.
    pub fn from_json_str(text: &str) -> ArborResult<Self> {
        let opts: Self = serde_json::from_str(text)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ArborResult<()> {
        self.surface_size()?;
        if !(self.document.width.is_finite() && self.document.width > 0.0)
            || !(self.document.height.is_finite() && self.document.height > 0.0)
        {
            return Err(ArborError::validation("document size must be positive"));
        }
        if !(1..=8).contains(&self.working_scale) {
            return Err(ArborError::validation("working_scale must be in 1..=8"));
        }
        if !(0.0..=1.0).contains(&self.default_part_opacity) {
            return Err(ArborError::validation(
                "default_part_opacity must be in 0..=1",
            ));
        }
        if !(self.text_font_size.is_finite() && self.text_font_size > 0.0) {
            return Err(ArborError::validation("text_font_size must be positive"));
        }
        if !(self.text_jitter.is_finite() && self.text_jitter >= 0.0) {
            return Err(ArborError::validation("text_jitter must be non-negative"));
        }
        if self.history_limit == Some(0) {
            return Err(ArborError::validation("history_limit must be at least 1"));
        }
        Ok(())
    }

    /// Validated display size.
    pub fn surface_size(&self) -> ArborResult<SurfaceSize> {
        SurfaceSize::new(self.width, self.height)
    }

    /// Base surface appearance derived from these options.
    pub fn compositor_opts(&self) -> CompositorOpts {
        CompositorOpts {
            background: self.background,
            default_part_opacity: self.default_part_opacity,
            working_scale: self.working_scale,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/opts.rs"]
mod tests;
