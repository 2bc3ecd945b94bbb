/// Premultiplied source-over.
pub mod composite;
/// Base/user surfaces and the colored-part cache.
pub mod compositor;
/// Owned RGBA rasters and PNG export.
pub mod raster;
/// Flat-color recolor of fillable assets.
pub mod recolor;
pub(crate) mod stroke;
/// Text annotation rendering.
pub mod text;
