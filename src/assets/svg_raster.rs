use resvg::tiny_skia::{Pixmap, Transform};

use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{ArborError, ArborResult};

/// Rasterize `tree` stretched onto a transparent pixmap of `size`.
///
/// Template parts share the document's view box, so stretching keeps every part aligned.
pub fn rasterize_svg(tree: &usvg::Tree, size: SurfaceSize) -> ArborResult<Pixmap> {
    let svg = tree.size();
    if !svg.width().is_finite() || !svg.height().is_finite() || svg.width() <= 0.0 {
        return Err(ArborError::validation("svg has invalid width/height"));
    }

    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| ArborError::validation("failed to allocate svg pixmap"))?;

    let sx = (size.width as f32) / svg.width();
    let sy = (size.height as f32) / svg.height();
    resvg::render(tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());
    Ok(pixmap)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
