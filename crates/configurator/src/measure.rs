//! Geometry measurement of uploaded top assets.
//!
//! Procedural parts have a known symmetric footprint. Uploaded meshes come
//! with arbitrary origins, so their real footprint and center are measured
//! after load and fed to the dimension overlay.

use shared::DeskConfig;

use crate::assets::MeshAsset;
use crate::overrides::OverrideRegistry;

/// Measured horizontal footprint of a scaled asset (cm)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasuredGeometry {
    pub width: f64,
    pub depth: f64,
    /// Bounding-box center relative to the asset's own origin, `[x, z]`
    pub center_offset: [f64; 2],
}

/// Measure an asset at the given uniform scale.
///
/// Width/depth are the X/Z extents of the node-transformed bounding box; a
/// degenerate asset measures as zero.
pub fn measure(asset: &MeshAsset, scale: f64) -> MeasuredGeometry {
    let bounds = asset.bounds();
    let size = bounds.size() * scale;
    let center = bounds.center() * scale;
    MeasuredGeometry {
        width: size.x,
        depth: size.z,
        center_offset: [center.x, center.z],
    }
}

/// The top asset whose geometry the overlay must follow
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSource {
    pub url: String,
    pub scale: f64,
}

/// Pick the active top asset: the user upload first, then an admin override
/// of the current size. `None` means "use nominal dimensions".
pub fn measurement_source(config: &DeskConfig, overrides: &OverrideRegistry) -> Option<MeasurementSource> {
    if let Some(url) = config.custom_desk_url() {
        return Some(MeasurementSource {
            url: url.to_string(),
            scale: config.custom_desk_scale,
        });
    }
    let active = overrides.active(&config.size.id())?;
    Some(MeasurementSource {
        url: active.asset_url()?.to_string(),
        scale: active.scale,
    })
}

/// Memoized measurement keyed by (asset reference, scale)
#[derive(Debug, Default)]
pub struct MeasurementCache {
    key: Option<(String, u64)>,
    value: Option<MeasuredGeometry>,
    compute_count: u64,
}

impl MeasurementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the cached value was computed for this source
    pub fn is_valid(&self, source: &MeasurementSource) -> bool {
        self.key
            .as_ref()
            .is_some_and(|(url, bits)| *url == source.url && *bits == source.scale.to_bits())
    }

    /// Bring the cache in line with the current source.
    ///
    /// With no source, or while the source asset is not loaded yet, the
    /// cache is cleared and `None` is returned.
    pub fn update(
        &mut self,
        source: Option<&MeasurementSource>,
        asset: Option<&MeshAsset>,
    ) -> Option<MeasuredGeometry> {
        let (Some(source), Some(asset)) = (source, asset) else {
            self.clear();
            return None;
        };
        if !self.is_valid(source) {
            self.value = Some(measure(asset, source.scale));
            self.key = Some((source.url.clone(), source.scale.to_bits()));
            self.compute_count += 1;
        }
        self.value
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.value = None;
    }

    /// Last measured geometry, if any
    pub fn current(&self) -> Option<MeasuredGeometry> {
        self.value
    }

    /// Number of measurements actually computed
    pub fn compute_count(&self) -> u64 {
        self.compute_count
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use shared::ModelOverride;

    use super::*;
    use crate::assets::MeshNode;

    fn off_center_asset() -> MeshAsset {
        // 100 x 4 x 60 box centered at (30, 2, -10)
        let min = DVec3::new(-20.0, 0.0, -40.0);
        let max = DVec3::new(80.0, 4.0, 20.0);
        MeshAsset::new(vec![MeshNode::new("slab", vec![min, max, DVec3::new(0.0, 0.0, 0.0)])])
    }

    #[test]
    fn test_measure_unit_scale() {
        let m = measure(&off_center_asset(), 1.0);
        assert_eq!(m.width, 100.0);
        assert_eq!(m.depth, 60.0);
        assert_eq!(m.center_offset, [30.0, -10.0]);
    }

    #[test]
    fn test_measure_scaled() {
        let m = measure(&off_center_asset(), 2.0);
        assert_eq!(m.width, 200.0);
        assert_eq!(m.depth, 120.0);
        assert_eq!(m.center_offset, [60.0, -20.0]);
    }

    #[test]
    fn test_measure_empty_is_zero() {
        let m = measure(&MeshAsset::default(), 3.0);
        assert_eq!(m, MeasuredGeometry::default());
    }

    #[test]
    fn test_source_prefers_user_upload() {
        let mut registry = OverrideRegistry::default();
        registry.insert("140x70", ModelOverride {
            url: Some("admin.stl".into()),
            ..ModelOverride::named("admin.stl")
        });
        let mut config = DeskConfig::default();
        assert_eq!(measurement_source(&config, &registry).unwrap().url, "admin.stl");

        config.custom_desk_model_url = Some("mine.obj".into());
        config.custom_desk_scale = 0.5;
        let source = measurement_source(&config, &registry).unwrap();
        assert_eq!(source, MeasurementSource { url: "mine.obj".into(), scale: 0.5 });
    }

    #[test]
    fn test_source_none_for_inactive_override() {
        let mut registry = OverrideRegistry::default();
        registry.insert("140x70", ModelOverride::named("Manual edit"));
        assert!(measurement_source(&DeskConfig::default(), &registry).is_none());
    }

    #[test]
    fn test_cache_recomputes_only_on_key_change() {
        let asset = off_center_asset();
        let mut cache = MeasurementCache::new();
        let source = MeasurementSource { url: "a.stl".into(), scale: 1.0 };

        cache.update(Some(&source), Some(&asset));
        cache.update(Some(&source), Some(&asset));
        assert_eq!(cache.compute_count(), 1);

        let rescaled = MeasurementSource { scale: 2.0, ..source.clone() };
        let m = cache.update(Some(&rescaled), Some(&asset)).unwrap();
        assert_eq!(m.center_offset, [60.0, -20.0]);
        assert_eq!(cache.compute_count(), 2);
    }

    #[test]
    fn test_cache_clears_without_source_or_asset() {
        let asset = off_center_asset();
        let mut cache = MeasurementCache::new();
        let source = MeasurementSource { url: "a.stl".into(), scale: 1.0 };
        cache.update(Some(&source), Some(&asset));
        assert!(cache.current().is_some());

        assert!(cache.update(Some(&source), None).is_none());
        assert!(cache.current().is_none());

        cache.update(Some(&source), Some(&asset));
        assert!(cache.update(None, Some(&asset)).is_none());
        assert_eq!(cache.compute_count(), 2);
    }
}
