//! Override registry mutations routed through the session

use shared::{Axis, ModelOverride};

use super::SessionState;
use crate::overrides::{OverrideError, OverridePatch};

impl SessionState {
    /// Merge a patch into a part's override, creating the record if absent
    pub fn set_override(&mut self, id: &str, patch: OverridePatch) -> &ModelOverride {
        self.version += 1;
        self.overrides.set_override(id, patch)
    }

    /// Remove a part's override. No-op (and no version bump) when absent.
    pub fn remove_override(&mut self, id: &str) -> Option<ModelOverride> {
        let removed = self.overrides.remove_override(id);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    pub fn update_override_scale(&mut self, id: &str, scale: f64) -> Result<(), OverrideError> {
        self.overrides.update_scale(id, scale)?;
        self.version += 1;
        Ok(())
    }

    pub fn update_override_axis(&mut self, id: &str, axis: Axis, value: f64) -> Result<(), OverrideError> {
        self.overrides.update_position_axis(id, axis, value)?;
        self.version += 1;
        Ok(())
    }
}
