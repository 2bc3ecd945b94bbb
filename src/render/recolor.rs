//! Paint-bucket recoloring of fillable template parts.
//!
//! The fillable SVG is rasterized at a working resolution above display size, every covered
//! pixel takes the target color at its original coverage, and the result is filtered down to
//! display size. Anti-aliased edges keep exactly the alpha the artwork was authored with.

use rayon::prelude::*;
use resvg::tiny_skia::{IntSize, Pixmap};

use crate::assets::svg_raster::rasterize_svg;
use crate::foundation::color::Rgb8;
use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{ArborError, ArborResult};

/// A recolored part at display resolution.
#[derive(Clone, Debug)]
pub struct ColoredAsset {
    /// Part index.
    pub part: usize,
    /// Fill color.
    pub color: Rgb8,
    /// Resolution the recolor ran at.
    pub working_size: SurfaceSize,
    /// Display-size raster drawn onto the base surface.
    pub pixmap: Pixmap,
}

/// Replace the color of every covered pixel in premultiplied RGBA8 `data`.
///
/// Alpha is never changed; fully transparent pixels are left untouched.
pub fn recolor_pixels(data: &mut [u8], width: u32, color: Rgb8) {
    let row_bytes = (width as usize).max(1) * 4;
    data.par_chunks_mut(row_bytes).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 {
                continue;
            }
            px.copy_from_slice(&color.premul_with_alpha(a));
        }
    });
}

/// Rasterize `fillable` at `working` size and recolor it.
pub fn recolor_working(
    fillable: &usvg::Tree,
    color: Rgb8,
    working: SurfaceSize,
) -> ArborResult<Pixmap> {
    let mut pixmap =
        rasterize_svg(fillable, working).map_err(|e| ArborError::recolor(e.to_string()))?;
    recolor_pixels(pixmap.data_mut(), working.width, color);
    Ok(pixmap)
}

/// Longest edge a working raster may have. Larger displays recolor at a reduced scale.
pub const MAX_WORKING_DIM: u32 = SurfaceSize::MAX_DIM;

/// Working resolution for `display` at `working_scale`×, capped at [`MAX_WORKING_DIM`].
///
/// The scale is reduced (never below 1) until the longest working edge fits.
pub fn working_size(display: SurfaceSize, working_scale: u32) -> SurfaceSize {
    let longest = display.width.max(display.height).max(1);
    let cap = (MAX_WORKING_DIM / longest).max(1);
    let scale = working_scale.clamp(1, cap);
    if scale < working_scale {
        tracing::debug!(requested = working_scale, scale, "working scale capped");
    }
    display.scaled(scale)
}

/// Recolor `fillable` for display at `display_size`, working at up to `working_scale`×.
#[tracing::instrument(skip(fillable))]
pub fn recolor(
    part: usize,
    fillable: &usvg::Tree,
    color: Rgb8,
    display_size: SurfaceSize,
    working_scale: u32,
) -> ArborResult<ColoredAsset> {
    let working_size = working_size(display_size, working_scale);
    let working = recolor_working(fillable, color, working_size)?;
    let pixmap = downscale(working, display_size)?;
    tracing::debug!(part, color = %color, "part recolored");
    Ok(ColoredAsset {
        part,
        color,
        working_size,
        pixmap,
    })
}

/// Triangle-filter a premultiplied pixmap down (or up) to `to`, consuming it.
pub fn downscale(src: Pixmap, to: SurfaceSize) -> ArborResult<Pixmap> {
    if src.width() == to.width && src.height() == to.height {
        return Ok(src);
    }
    let (w, h) = (src.width(), src.height());
    let buf: image::RgbaImage = image::ImageBuffer::from_raw(w, h, src.take())
        .ok_or_else(|| ArborError::recolor("working raster does not match its size"))?;
    let resized = image::imageops::resize(
        &buf,
        to.width,
        to.height,
        image::imageops::FilterType::Triangle,
    );
    drop(buf);

    let mut data = resized.into_raw();
    // Filtering premultiplied values keeps color <= alpha up to rounding; enforce it exactly.
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }

    let size = IntSize::from_wh(to.width, to.height)
        .ok_or_else(|| ArborError::recolor("invalid display size"))?;
    Pixmap::from_vec(data, size).ok_or_else(|| ArborError::recolor("failed to build pixmap"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/recolor.rs"]
mod tests;
