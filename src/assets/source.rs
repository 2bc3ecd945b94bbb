use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::foundation::error::{ArborError, ArborResult};

/// Which rendition of a template part an asset holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// Faint outline shown only while the part's stage is active.
    Guide,
    /// Solid silhouette used as the paint target and as the default appearance.
    Fillable,
}

impl Variant {
    fn suffix(self) -> &'static str {
        match self {
            Self::Guide => "guide",
            Self::Fillable => "fill",
        }
    }
}

/// Identity of one loadable template asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKey {
    /// One rendition of a template part.
    Part {
        /// Part index within the catalog.
        part: usize,
        /// Rendition.
        variant: Variant,
    },
    /// The decorative frame drawn under every part.
    Frame,
}

impl AssetKey {
    /// Shorthand for a part key.
    pub fn part(part: usize, variant: Variant) -> Self {
        Self::Part { part, variant }
    }

    /// File name an asset with this key and `stem` is stored under.
    pub fn file_name(&self, stem: &str) -> String {
        match self {
            Self::Part { variant, .. } => format!("{stem}-{}.svg", variant.suffix()),
            Self::Frame => format!("{stem}.svg"),
        }
    }

    /// Human readable label used in errors and logs.
    pub fn label(&self, stem: &str) -> String {
        match self {
            Self::Part { variant, .. } => format!("{stem}/{}", variant.suffix()),
            Self::Frame => format!("frame/{stem}"),
        }
    }
}

/// Content lookup of template SVG bytes.
///
/// Implementations must tolerate partial availability: a missing key is an error for that key
/// only.
pub trait AssetSource: Send + Sync {
    /// Fetch the bytes for `key`, whose catalog stem is `stem`.
    fn fetch(&self, key: &AssetKey, stem: &str) -> ArborResult<Vec<u8>>;
}

/// Reads `<root>/<stem>-guide.svg`, `<root>/<stem>-fill.svg` and `<root>/<frame>.svg`.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    /// Serve assets from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssetSource {
    fn fetch(&self, key: &AssetKey, stem: &str) -> ArborResult<Vec<u8>> {
        if stem.contains("..") || stem.contains('/') || stem.contains('\\') {
            return Err(ArborError::asset_load(
                key.label(stem),
                "asset stems must be plain file names",
            ));
        }
        let path = self.root.join(key.file_name(stem));
        std::fs::read(&path)
            .with_context(|| format!("read template asset '{}'", path.display()))
            .map_err(|e| ArborError::asset_load(key.label(stem), format!("{e:#}")))
    }
}

/// In-memory asset table keyed by file name.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the bytes for `key` under `stem`.
    pub fn insert(&mut self, key: AssetKey, stem: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(key.file_name(stem), bytes.into());
    }

    /// Builder form of [`MemoryAssetSource::insert`].
    pub fn with(mut self, key: AssetKey, stem: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(key, stem, bytes);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, key: &AssetKey, stem: &str) -> ArborResult<Vec<u8>> {
        self.files
            .get(&key.file_name(stem))
            .cloned()
            .ok_or_else(|| ArborError::asset_load(key.label(stem), "not found"))
    }
}
