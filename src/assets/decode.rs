use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::ArborResult;

/// Parse SVG bytes into a `usvg` tree, resolving text against `fontdb`.
pub fn parse_svg(bytes: &[u8], fontdb: Arc<usvg::fontdb::Database>) -> ArborResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Parse an SVG document held in a string.
pub fn parse_svg_str(text: &str, fontdb: Arc<usvg::fontdb::Database>) -> ArborResult<usvg::Tree> {
    parse_svg(text.as_bytes(), fontdb)
}

/// Build the font database used for SVG and annotation text.
///
/// System fonts are always loaded; `extra_dir` (if any) is scanned for `ttf`/`otf`/`ttc` files.
pub fn build_fontdb(extra_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = extra_dir {
        load_fonts_from_dir(&mut db, dir);
        load_fonts_from_dir(&mut db, &dir.join("fonts"));
    }
    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

/// An empty font database. Text renders as nothing, which keeps tests font-independent.
pub fn empty_fontdb() -> Arc<usvg::fontdb::Database> {
    Arc::new(usvg::fontdb::Database::new())
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
