//! Session state: the configuration and override registry being edited.
//!
//! There is exactly one session. All mutations go through methods here so
//! the version counter stays in step with the data.

mod config_ops;
mod override_ops;
mod persistence;

pub use persistence::AutosaveTimer;

use glam::DVec3;

use shared::{ConfigurationPayload, DeskConfig};

use crate::overrides::OverrideRegistry;
use crate::placement::{Commit, PlacementController};

/// Configuration + overrides, with a mutation counter
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub config: DeskConfig,
    pub overrides: OverrideRegistry,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded from a stored payload
    pub fn from_payload(payload: ConfigurationPayload) -> Self {
        Self {
            config: payload.config,
            overrides: payload.overrides.into(),
            version: 0,
        }
    }

    /// Current session version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump version after a direct field edit
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }

    /// Snapshot for persistence
    pub fn payload(&self) -> ConfigurationPayload {
        ConfigurationPayload {
            config: self.config.clone(),
            overrides: self.overrides.as_map().clone(),
        }
    }

    /// Replace configuration and overrides wholesale
    pub fn apply_payload(&mut self, payload: ConfigurationPayload) {
        self.config = payload.config;
        self.overrides = payload.overrides.into();
        self.version += 1;
    }

    /// Commit a drag through the placement controller
    pub fn commit_placement(&mut self, placement: &mut PlacementController, absolute: DVec3) -> Option<Commit> {
        let commit = placement.commit(absolute, &mut self.config, &mut self.overrides)?;
        self.version += 1;
        Some(commit)
    }

    /// Commit the controller's tracked drag position on release
    pub fn release_drag(&mut self, placement: &mut PlacementController) -> Option<Commit> {
        let commit = placement.release(&mut self.config, &mut self.overrides)?;
        self.version += 1;
        Some(commit)
    }
}
