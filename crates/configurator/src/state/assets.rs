//! Loaded-asset table keyed by reference

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::assets::{AssetLookup, AssetResult, MeshAsset};

/// Load state of one asset reference
#[derive(Debug, Clone)]
pub enum AssetSlot {
    Loading,
    Ready(Arc<MeshAsset>),
    /// Load failed; the part renders empty and is not retried
    Failed(String),
}

/// All assets requested this session
#[derive(Debug, Default)]
pub struct AssetLibrary {
    slots: HashMap<String, AssetSlot>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a reference as loading. Returns `false` when it was already
    /// requested (loading, ready, or failed), so callers only spawn once.
    pub fn request(&mut self, url: &str) -> bool {
        if self.slots.contains_key(url) {
            return false;
        }
        self.slots.insert(url.to_string(), AssetSlot::Loading);
        true
    }

    /// Record the outcome of a load
    pub fn finish(&mut self, url: &str, result: AssetResult<MeshAsset>) {
        let slot = match result {
            Ok(asset) => AssetSlot::Ready(Arc::new(asset)),
            Err(e) => {
                warn!(url, error = %e, "Asset load failed");
                AssetSlot::Failed(e.to_string())
            }
        };
        self.slots.insert(url.to_string(), slot);
    }

    /// Insert an already decoded asset
    pub fn insert(&mut self, url: &str, asset: MeshAsset) {
        self.slots
            .insert(url.to_string(), AssetSlot::Ready(Arc::new(asset)));
    }

    pub fn slot(&self, url: &str) -> Option<&AssetSlot> {
        self.slots.get(url)
    }

    pub fn is_loading(&self) -> bool {
        self.slots.values().any(|s| matches!(s, AssetSlot::Loading))
    }

    /// Failed references with their error text
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().filter_map(|(url, slot)| match slot {
            AssetSlot::Failed(e) => Some((url.as_str(), e.as_str())),
            _ => None,
        })
    }
}

impl AssetLookup for AssetLibrary {
    fn asset(&self, url: &str) -> Option<Arc<MeshAsset>> {
        match self.slots.get(url)? {
            AssetSlot::Ready(asset) => Some(Arc::clone(asset)),
            AssetSlot::Loading | AssetSlot::Failed(_) => None,
        }
    }
}
