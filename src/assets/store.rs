use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assets::decode::parse_svg;
use crate::assets::source::{AssetKey, AssetSource, Variant};
use crate::foundation::error::{ArborError, ArborResult};
use crate::foundation::notice::{Notice, NoticeKind};
use crate::stage::StageCatalog;

/// A parsed template SVG. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct TemplateAsset {
    /// Which asset this is.
    pub key: AssetKey,
    /// Parsed vector tree.
    pub tree: Arc<usvg::Tree>,
}

/// Both renditions of the part owned by one stage.
#[derive(Clone, Debug)]
pub struct StageAssets {
    /// Part index.
    pub part: usize,
    /// Outline shown while the stage is active.
    pub guide: Arc<TemplateAsset>,
    /// Paint target.
    pub fillable: Arc<TemplateAsset>,
}

#[derive(Clone, Debug)]
enum Slot {
    Pending,
    Loaded(Arc<TemplateAsset>),
    Failed(String),
}

/// Owner of every loaded [`TemplateAsset`].
///
/// Each asset loads independently: a failure affects only its own slot, and the rest of the
/// library stays usable.
pub struct TemplateLibrary {
    catalog: Arc<StageCatalog>,
    fontdb: Arc<usvg::fontdb::Database>,
    slots: BTreeMap<AssetKey, Slot>,
}

impl TemplateLibrary {
    /// Create a library with one pending slot per part rendition (and the frame, if any).
    pub fn new(catalog: Arc<StageCatalog>, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        let mut slots = BTreeMap::new();
        for part in 0..catalog.parts().len() {
            slots.insert(AssetKey::part(part, Variant::Guide), Slot::Pending);
            slots.insert(AssetKey::part(part, Variant::Fillable), Slot::Pending);
        }
        if catalog.frame().is_some() {
            slots.insert(AssetKey::Frame, Slot::Pending);
        }
        Self {
            catalog,
            fontdb,
            slots,
        }
    }

    /// Catalog stem for `key`.
    pub fn stem(&self, key: &AssetKey) -> Option<&str> {
        match key {
            AssetKey::Part { part, .. } => {
                self.catalog.parts().get(*part).map(|p| p.asset.as_str())
            }
            AssetKey::Frame => self.catalog.frame(),
        }
    }

    /// Every key together with its stem, in a stable order.
    pub fn requests(&self) -> Vec<(AssetKey, String)> {
        self.slots
            .keys()
            .filter_map(|k| self.stem(k).map(|s| (*k, s.to_string())))
            .collect()
    }

    /// Keys that have neither loaded nor failed yet.
    pub fn pending(&self) -> Vec<AssetKey> {
        self.slots
            .iter()
            .filter(|(_, s)| matches!(s, Slot::Pending))
            .map(|(k, _)| *k)
            .collect()
    }

    /// Synchronously fetch and install every asset.
    ///
    /// Returns one notice per asset that failed; the library keeps whatever did load.
    #[tracing::instrument(skip_all)]
    pub fn load_all(&mut self, source: &dyn AssetSource) -> Vec<Notice> {
        let mut notices = Vec::new();
        for (key, stem) in self.requests() {
            let fetched = source.fetch(&key, &stem);
            if let Err(e) = self.install(key, fetched) {
                notices.push(Notice::new(NoticeKind::AssetUnavailable, e.to_string()));
            }
        }
        notices
    }

    /// Install the outcome of fetching `key`.
    ///
    /// A fetch or parse failure marks the slot failed and is returned as
    /// [`ArborError::AssetLoad`].
    pub fn install(&mut self, key: AssetKey, fetched: ArborResult<Vec<u8>>) -> ArborResult<()> {
        let Some(stem) = self.stem(&key).map(str::to_string) else {
            return Err(ArborError::validation(format!("unknown asset key {key:?}")));
        };
        let label = key.label(&stem);

        let parsed = fetched.and_then(|bytes| {
            parse_svg(&bytes, self.fontdb.clone())
                .map_err(|e| ArborError::asset_load(label.clone(), format!("{e:#}")))
        });

        match parsed {
            Ok(tree) => {
                tracing::debug!(asset = %label, "template asset loaded");
                self.slots.insert(
                    key,
                    Slot::Loaded(Arc::new(TemplateAsset {
                        key,
                        tree: Arc::new(tree),
                    })),
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(asset = %label, error = %e, "template asset unavailable");
                self.slots.insert(key, Slot::Failed(e.to_string()));
                Err(match e {
                    e @ ArborError::AssetLoad { .. } => e,
                    other => ArborError::asset_load(label, other),
                })
            }
        }
    }

    /// Loaded asset for `key`, if available.
    pub fn get(&self, key: AssetKey) -> Option<Arc<TemplateAsset>> {
        match self.slots.get(&key) {
            Some(Slot::Loaded(a)) => Some(a.clone()),
            _ => None,
        }
    }

    /// Whether `key` failed permanently.
    pub fn is_failed(&self, key: AssetKey) -> bool {
        matches!(self.slots.get(&key), Some(Slot::Failed(_)))
    }

    /// Both renditions for stage `index`.
    ///
    /// `Ok(None)` for stages without a part (introduction, summary).
    pub fn load_stage(&self, index: usize) -> ArborResult<Option<StageAssets>> {
        let Some(part) = self.catalog.part_of(index) else {
            return Ok(None);
        };
        let stem = self
            .catalog
            .parts()
            .get(part)
            .map(|p| p.asset.clone())
            .unwrap_or_default();

        let fetch = |variant: Variant| {
            let key = AssetKey::part(part, variant);
            match self.slots.get(&key) {
                Some(Slot::Loaded(a)) => Ok(a.clone()),
                Some(Slot::Failed(reason)) => Err(ArborError::asset_load(key.label(&stem), reason)),
                _ => Err(ArborError::asset_load(key.label(&stem), "not loaded yet")),
            }
        };

        Ok(Some(StageAssets {
            part,
            guide: fetch(Variant::Guide)?,
            fillable: fetch(Variant::Fillable)?,
        }))
    }

    /// The catalog this library serves.
    pub fn catalog(&self) -> &Arc<StageCatalog> {
        &self.catalog
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
