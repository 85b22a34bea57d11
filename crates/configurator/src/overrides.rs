//! Override registry: part id → model override record.
//!
//! The registry is the only place overrides live. Records are created by an
//! admin upload (`set_override`) or by committing a drag on a catalog part
//! (`commit_position`); every other mutation requires an existing record.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use shared::{Axis, CatalogOverrides, ModelOverride, PartId, Position};

/// Display name of a record created by an admin upload before the file name is known
pub const NEW_RECORD_NAME: &str = "New";
/// Display name of a record created by a drag commit
pub const MANUAL_EDIT_NAME: &str = "Manual edit";

/// Precondition violations of registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("no override record for part '{0}'")]
    Missing(PartId),
}

/// Partial override update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverridePatch {
    pub url: Option<String>,
    pub scale: Option<f64>,
    pub position: Option<Position>,
    pub file_name: Option<String>,
    pub texture_url: Option<String>,
}

impl OverridePatch {
    /// Patch applied after an admin model upload
    pub fn model(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            file_name: Some(file_name.into()),
            ..Default::default()
        }
    }

    /// Patch applied after an admin texture upload
    pub fn texture(url: impl Into<String>) -> Self {
        Self {
            texture_url: Some(url.into()),
            ..Default::default()
        }
    }

    fn apply(self, record: &mut ModelOverride) {
        if let Some(url) = self.url {
            record.url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(scale) = self.scale {
            record.scale = scale;
        }
        if let Some(position) = self.position {
            record.position = position;
        }
        if let Some(file_name) = self.file_name {
            record.file_name = file_name;
        }
        if let Some(texture_url) = self.texture_url {
            record.texture_url = Some(texture_url).filter(|u| !u.is_empty());
        }
    }
}

/// Keyed override store with merge-patch updates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideRegistry {
    entries: CatalogOverrides,
}

impl From<CatalogOverrides> for OverrideRegistry {
    fn from(entries: CatalogOverrides) -> Self {
        Self { entries }
    }
}

impl From<OverrideRegistry> for CatalogOverrides {
    fn from(registry: OverrideRegistry) -> Self {
        registry.entries
    }
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for a part, active or not
    pub fn get(&self, id: &str) -> Option<&ModelOverride> {
        self.entries.get(id)
    }

    /// Record for a part only when it carries an asset reference
    pub fn active(&self, id: &str) -> Option<&ModelOverride> {
        self.entries.get(id).filter(|o| o.is_active())
    }

    /// Stored offset for a part (origin when there is no record)
    pub fn position(&self, id: &str) -> Position {
        self.entries.get(id).map(|o| o.position).unwrap_or([0.0; 3])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PartId, &ModelOverride)> {
        self.entries.iter()
    }

    pub fn as_map(&self) -> &CatalogOverrides {
        &self.entries
    }

    /// Replace a whole record
    pub fn insert(&mut self, id: impl Into<PartId>, record: ModelOverride) {
        self.entries.insert(id.into(), record);
    }

    /// Merge a patch into a record, creating `{scale 1, origin, "New"}` first if absent
    pub fn set_override(&mut self, id: &str, patch: OverridePatch) -> &ModelOverride {
        let record = self
            .entries
            .entry(id.to_string())
            .or_insert_with(|| ModelOverride::named(NEW_RECORD_NAME));
        patch.apply(record);
        record
    }

    /// Delete a record. Removing an absent id is a no-op.
    pub fn remove_override(&mut self, id: &str) -> Option<ModelOverride> {
        self.entries.remove(id)
    }

    pub fn update_scale(&mut self, id: &str, scale: f64) -> Result<(), OverrideError> {
        let record = self.record_mut(id)?;
        record.scale = scale;
        Ok(())
    }

    /// Set one axis of a record's offset in place
    pub fn update_position_axis(&mut self, id: &str, axis: Axis, value: f64) -> Result<(), OverrideError> {
        let record = self.record_mut(id)?;
        record.position[axis.index()] = value;
        Ok(())
    }

    /// Store a committed offset, creating a stub record if none exists
    pub fn commit_position(&mut self, id: &str, position: Position) {
        self.entries
            .entry(id.to_string())
            .or_insert_with(|| ModelOverride::named(MANUAL_EDIT_NAME))
            .position = position;
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut ModelOverride, OverrideError> {
        self.entries.get_mut(id).ok_or_else(|| {
            warn!(part = id, "Override update on a part without a record");
            OverrideError::Missing(id.to_string())
        })
    }
}
