use std::fmt::Write as _;
use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};

use crate::assets::decode::parse_svg_str;
use crate::edit::text::TextItem;
use crate::foundation::core::DocumentSize;
use crate::foundation::error::ArborResult;

/// Renders text annotations through `usvg` text layout.
#[derive(Clone)]
pub struct TextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
    family: String,
}

impl TextRasterizer {
    /// Rasterizer resolving `family` (with `sans-serif` fallback) against `fontdb`.
    pub fn new(fontdb: Arc<usvg::fontdb::Database>, family: impl Into<String>) -> Self {
        Self {
            fontdb,
            family: family.into(),
        }
    }

    /// Font family requested for every item.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// SVG document placing `items` in a `document`-sized view box.
    pub fn svg_document(
        &self,
        items: &[TextItem],
        document: DocumentSize,
        px_w: u32,
        px_h: u32,
    ) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{px_w}" height="{px_h}" viewBox="0 0 {} {}" preserveAspectRatio="none">"#,
            document.width, document.height
        );
        let family = escape_xml(&self.family);
        for item in items {
            let base = item.baseline();
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" font-size="{}" font-family="{family}, sans-serif" fill="{}" xml:space="preserve">{}</text>"#,
                base.x,
                base.y,
                item.font_size,
                item.color.to_hex(),
                escape_xml(&item.content)
            );
        }
        svg.push_str("</svg>");
        svg
    }

    /// Draw `items` on top of `target`.
    pub fn draw(
        &self,
        target: &mut Pixmap,
        items: &[TextItem],
        document: DocumentSize,
    ) -> ArborResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let svg = self.svg_document(items, document, target.width(), target.height());
        let tree = parse_svg_str(&svg, self.fontdb.clone())?;
        resvg::render(&tree, Transform::identity(), &mut target.as_mut());
        Ok(())
    }
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("family", &self.family)
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
