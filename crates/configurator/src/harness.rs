//! Headless harness for driving the configurator without a window.
//!
//! Bundles the session, placement controller, measurement cache, and an
//! in-memory asset table. Assets are injected directly instead of loaded.

use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec3;

use shared::catalog::Catalog;
use shared::{ConfigurationPayload, DeskSize};

use crate::anchor::PartRef;
use crate::assets::{AssetLookup, MeshAsset};
use crate::dimensions::{self, DeskDimensions};
use crate::measure::{measurement_source, MeasuredGeometry, MeasurementCache};
use crate::overlay::{DimensionOverlay, Footprint};
use crate::placement::{Commit, PlacementController};
use crate::scene::{self, PlacedPart, SceneLayout};
use crate::state::SessionState;
use crate::viewport::picking::Ray;

/// Headless harness: session + placement + measurement + asset table
pub struct ConfiguratorHarness {
    pub session: SessionState,
    pub placement: PlacementController,
    pub catalog: Catalog,
    measurement: MeasurementCache,
    assets: HashMap<String, Arc<MeshAsset>>,
}

impl Default for ConfiguratorHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfiguratorHarness {
    /// Create a harness with a default session
    pub fn new() -> Self {
        Self {
            session: SessionState::new(),
            placement: PlacementController::new(),
            catalog: Catalog::standard(),
            measurement: MeasurementCache::new(),
            assets: HashMap::new(),
        }
    }

    /// Create a harness seeded from a payload
    pub fn with_payload(payload: ConfigurationPayload) -> Self {
        Self {
            session: SessionState::from_payload(payload),
            ..Self::new()
        }
    }

    // ── Assets ────────────────────────────────────────────────

    /// Make a decoded asset available under a reference
    pub fn insert_asset(&mut self, url: &str, asset: MeshAsset) {
        self.assets.insert(url.to_string(), Arc::new(asset));
    }

    pub fn remove_asset(&mut self, url: &str) {
        self.assets.remove(url);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn dimensions(&self) -> DeskDimensions {
        dimensions::resolve(&self.session.config)
    }

    pub fn layout(&self) -> SceneLayout {
        scene::compose(&self.session.config, &self.session.overrides, &self.catalog)
    }

    /// Placed part by selection id
    pub fn part(&self, selection_id: &str) -> Option<PlacedPart> {
        self.layout().find(selection_id).cloned()
    }

    /// World position of a part, by selection id
    pub fn position_of(&self, selection_id: &str) -> Option<DVec3> {
        self.part(selection_id).map(|p| p.position)
    }

    /// Measured top footprint (memoized)
    pub fn measured(&mut self) -> Option<MeasuredGeometry> {
        let source = measurement_source(&self.session.config, &self.session.overrides);
        let asset = source.as_ref().and_then(|s| self.assets.asset(&s.url));
        self.measurement.update(source.as_ref(), asset.as_deref())
    }

    /// Number of measurements actually computed so far
    pub fn measurement_count(&self) -> u64 {
        self.measurement.compute_count()
    }

    pub fn overlay(&mut self) -> DimensionOverlay {
        let measured = self.measured();
        let dims = self.dimensions();
        let origin = scene::overlay_origin(&self.session.config, &self.session.overrides);
        DimensionOverlay::build(origin, Footprint::resolve(&dims, measured))
    }

    pub fn price(&self) -> i64 {
        self.catalog.total_price(&self.session.config)
    }

    // ── Interaction ───────────────────────────────────────────

    pub fn select_size(&mut self, size: DeskSize) {
        self.session.select_size(size);
        self.sync_selection();
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.placement.set_edit_mode(on);
    }

    /// Click a part by selection id. Returns whether it is now selected.
    pub fn click(&mut self, selection_id: &str) -> bool {
        let Some(part) = self.layout().find(selection_id).map(|p| p.part.clone()) else {
            self.placement.pointer_missed();
            return false;
        };
        self.placement.click_part(&part)
    }

    /// Click through a ray, as the viewport does
    pub fn click_ray(&mut self, ray: &Ray) -> Option<PartRef> {
        let hit = self.layout().pick(ray, &self.assets);
        match &hit {
            Some(part) => {
                self.placement.click_part(part);
            }
            None => self.placement.pointer_missed(),
        }
        hit
    }

    pub fn click_empty(&mut self) {
        self.placement.pointer_missed();
    }

    /// Drag the selected part to an absolute position and release
    pub fn drag_selected_to(&mut self, absolute: DVec3) -> Option<Commit> {
        self.placement.drag_to(absolute);
        self.session.release_drag(&mut self.placement)
    }

    /// Select a part and drag it in one step
    pub fn drag(&mut self, selection_id: &str, absolute: DVec3) -> Option<Commit> {
        if !self.click(selection_id) {
            return None;
        }
        self.drag_selected_to(absolute)
    }

    /// Drop the selection if the selected part left the scene
    pub fn sync_selection(&mut self) {
        let layout = self.layout();
        self.placement.sync(&layout);
    }
}
