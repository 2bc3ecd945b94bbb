//! Base and user surfaces, and the colored-part cache.
//!
//! The base surface holds template content and is never erasable. The user surface holds
//! strokes and text. A third, strokes-only layer lets the in-progress stroke preview use exactly
//! the pixels a later replay would produce.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use resvg::tiny_skia::{BlendMode, Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::assets::source::{AssetKey, Variant};
use crate::assets::store::TemplateLibrary;
use crate::assets::svg_raster::rasterize_svg;
use crate::edit::stroke::Stroke;
use crate::edit::text::TextItem;
use crate::foundation::color::Rgb8;
use crate::foundation::core::{DocumentSize, SurfaceSize};
use crate::foundation::error::{ArborError, ArborResult};
use crate::foundation::notice::{Notice, NoticeKind};
use crate::render::composite::over_in_place;
use crate::render::raster::Raster;
use crate::render::recolor::{ColoredAsset, recolor};
use crate::render::stroke::draw_stroke;
use crate::render::text::TextRasterizer;

/// Appearance settings for the base surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorOpts {
    /// Static background fill.
    pub background: Rgb8,
    /// Opacity of unfilled, inactive parts.
    pub default_part_opacity: f32,
    /// Linear oversampling factor used by recolor.
    pub working_scale: u32,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            background: Rgb8::WHITE,
            default_part_opacity: 0.35,
            working_scale: 4,
        }
    }
}

/// Owner of every raster surface.
#[derive(Debug)]
pub struct LayerCompositor {
    size: SurfaceSize,
    document: DocumentSize,
    opts: CompositorOpts,
    base: Pixmap,
    strokes: Pixmap,
    user: Pixmap,
    colored: HashMap<usize, ColoredAsset>,
    part_rasters: HashMap<AssetKey, Pixmap>,
    missing: BTreeSet<AssetKey>,
    text: TextRasterizer,
}

impl LayerCompositor {
    /// Allocate transparent surfaces of `size`.
    pub fn new(
        size: SurfaceSize,
        document: DocumentSize,
        opts: CompositorOpts,
        text: TextRasterizer,
    ) -> ArborResult<Self> {
        Ok(Self {
            size,
            document,
            opts,
            base: alloc(size)?,
            strokes: alloc(size)?,
            user: alloc(size)?,
            colored: HashMap::new(),
            part_rasters: HashMap::new(),
            missing: BTreeSet::new(),
            text,
        })
    }

    /// Surface size in pixels.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Appearance settings.
    pub fn opts(&self) -> CompositorOpts {
        self.opts
    }

    /// Document units to surface pixels.
    pub fn doc_transform(&self) -> Transform {
        let (sx, sy) = self.document.scale_to(self.size);
        Transform::from_scale(sx as f32, sy as f32)
    }

    /// Reallocate every surface at `size`.
    ///
    /// Size-dependent caches are dropped; the caller re-derives content afterwards.
    pub fn resize(&mut self, size: SurfaceSize) -> ArborResult<()> {
        self.base = alloc(size)?;
        self.strokes = alloc(size)?;
        self.user = alloc(size)?;
        self.size = size;
        self.colored.clear();
        self.part_rasters.clear();
        tracing::debug!(width = size.width, height = size.height, "surfaces resized");
        Ok(())
    }

    /// Forget rasterized template assets and fills, e.g. after swapping the library.
    pub fn invalidate_assets(&mut self) {
        self.part_rasters.clear();
        self.colored.clear();
    }

    /// Recolor `part` with `color`, replacing any previous fill of that part.
    pub fn apply_fill(
        &mut self,
        library: &TemplateLibrary,
        part: usize,
        color: Rgb8,
    ) -> ArborResult<()> {
        let key = AssetKey::part(part, Variant::Fillable);
        let asset = library
            .get(key)
            .ok_or_else(|| ArborError::recolor(format!("fillable for part {part} is not loaded")))?;
        let colored = recolor(part, &asset.tree, color, self.size, self.opts.working_scale)?;
        self.colored.insert(part, colored);
        Ok(())
    }

    /// Make the colored cache match `fills` exactly.
    ///
    /// Parts whose color already matches are kept. Failures leave the part unfilled and are
    /// returned as notices.
    pub fn sync_fills(
        &mut self,
        library: &TemplateLibrary,
        fills: &BTreeMap<usize, Rgb8>,
    ) -> Vec<Notice> {
        self.colored.retain(|part, c| fills.get(part) == Some(&c.color));
        let mut notices = Vec::new();
        for (&part, &color) in fills {
            if self.colored.contains_key(&part) {
                continue;
            }
            if let Err(e) = self.apply_fill(library, part, color) {
                tracing::warn!(part, error = %e, "fill could not be re-applied");
                notices.push(Notice::new(NoticeKind::FillFailed, e.to_string()));
            }
        }
        notices
    }

    /// Cached fill for `part`.
    pub fn colored(&self, part: usize) -> Option<&ColoredAsset> {
        self.colored.get(&part)
    }

    /// Number of cached fills.
    pub fn colored_len(&self) -> usize {
        self.colored.len()
    }

    /// Assets skipped by the last base redraw because they were not available.
    pub fn missing(&self) -> &BTreeSet<AssetKey> {
        &self.missing
    }

    /// Redraw the base surface with `active` as the part being edited.
    #[tracing::instrument(skip(self, library))]
    pub fn redraw_base(&mut self, library: &TemplateLibrary, active: Option<usize>) {
        self.base.fill(Color::from_rgba8(
            self.opts.background.r,
            self.opts.background.g,
            self.opts.background.b,
            255,
        ));
        self.missing.clear();

        if library.catalog().frame().is_some() {
            self.draw_asset(library, AssetKey::Frame, 1.0);
        }

        let overlay = library.catalog().overlay_part();
        let parts = library.catalog().parts().len();
        for part in (0..parts).filter(|p| Some(*p) != active && Some(*p) != overlay) {
            self.draw_part(library, part, false);
        }
        if let Some(a) = active.filter(|a| Some(*a) != overlay && *a < parts) {
            self.draw_part(library, a, true);
        }
        if let Some(o) = overlay.filter(|o| *o < parts) {
            self.draw_part(library, o, active == Some(o));
        }

        if !self.missing.is_empty() {
            tracing::debug!(missing = self.missing.len(), "base drawn without some assets");
        }
    }

    fn draw_part(&mut self, library: &TemplateLibrary, part: usize, active: bool) {
        if active {
            self.draw_asset(library, AssetKey::part(part, Variant::Guide), 1.0);
            self.draw_colored(part);
        } else if !self.draw_colored(part) {
            let opacity = self.opts.default_part_opacity;
            self.draw_asset(library, AssetKey::part(part, Variant::Fillable), opacity);
        }
    }

    fn draw_colored(&mut self, part: usize) -> bool {
        let Some(c) = self.colored.get(&part) else {
            return false;
        };
        self.base.draw_pixmap(
            0,
            0,
            c.pixmap.as_ref(),
            &paint(1.0),
            Transform::identity(),
            None,
        );
        true
    }

    fn draw_asset(&mut self, library: &TemplateLibrary, key: AssetKey, opacity: f32) {
        if !self.part_rasters.contains_key(&key) {
            let Some(asset) = library.get(key) else {
                self.missing.insert(key);
                return;
            };
            match rasterize_svg(&asset.tree, self.size) {
                Ok(pm) => {
                    self.part_rasters.insert(key, pm);
                }
                Err(e) => {
                    tracing::warn!(?key, error = %e, "template asset could not be rasterized");
                    self.missing.insert(key);
                    return;
                }
            }
        }
        if let Some(pm) = self.part_rasters.get(&key) {
            self.base.draw_pixmap(
                0,
                0,
                pm.as_ref(),
                &paint(opacity),
                Transform::identity(),
                None,
            );
        }
    }

    /// Redraw the strokes layer from scratch.
    pub fn redraw_strokes(&mut self, strokes: &[Stroke]) {
        self.strokes.fill(Color::TRANSPARENT);
        let xf = self.doc_transform();
        for s in strokes {
            draw_stroke(&mut self.strokes, s, xf);
        }
    }

    /// Draw one more committed stroke onto the strokes layer.
    pub fn append_stroke(&mut self, stroke: &Stroke) {
        let xf = self.doc_transform();
        draw_stroke(&mut self.strokes, stroke, xf);
    }

    /// Rebuild the user surface: committed strokes, the optional in-progress stroke, then text.
    pub fn redraw_user(&mut self, texts: &[TextItem], preview: Option<&Stroke>) -> ArborResult<()> {
        self.user.data_mut().copy_from_slice(self.strokes.data());
        if let Some(s) = preview {
            let xf = self.doc_transform();
            draw_stroke(&mut self.user, s, xf);
        }
        self.text.draw(&mut self.user, texts, self.document)
    }

    /// Base surface.
    pub fn base_raster(&self) -> Raster {
        Raster::from_pixmap(&self.base)
    }

    /// User surface.
    pub fn user_raster(&self) -> Raster {
        Raster::from_pixmap(&self.user)
    }

    /// Base then user, flattened.
    pub fn combined(&self) -> ArborResult<Raster> {
        let mut out = Raster::from_pixmap(&self.base);
        over_in_place(&mut out.data, self.user.data(), 1.0)?;
        Ok(out)
    }
}

fn alloc(size: SurfaceSize) -> ArborResult<Pixmap> {
    Pixmap::new(size.width, size.height)
        .ok_or_else(|| ArborError::validation("failed to allocate surface"))
}

fn paint(opacity: f32) -> PixmapPaint {
    PixmapPaint {
        opacity,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Nearest,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
