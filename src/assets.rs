/// SVG parsing and font database setup.
pub mod decode;
/// Background asset fetching.
pub mod loader;
/// Asset keys and sources.
pub mod source;
/// Template library: loaded trees and per-asset load state.
pub mod store;
/// SVG tree rasterization.
pub mod svg_raster;
