//! Scene composition: configuration + overrides → placed parts.
//!
//! `compose` is a pure function of one snapshot of the session. Each part is
//! resolved once into a tagged source (standard mock, admin override model,
//! or user upload) and a world position from the anchor rules.

pub mod primitives;

use glam::DVec3;

use shared::catalog::{Catalog, Category};
use shared::DeskConfig;

use crate::anchor::{self, PartRef};
use crate::assets::AssetLookup;
use crate::dimensions::{self, DeskDimensions};
use crate::overrides::OverrideRegistry;
use crate::viewport::picking::{pick_nearest, Aabb, Ray};

pub use primitives::Primitive;

/// Uniform scale of free decorative elements
pub const ELEMENT_SCALE: f64 = 0.05;

const FALLBACK_TOP_COLOR: [u8; 3] = [0xC2, 0x9A, 0x6E];
const FALLBACK_FRAME_COLOR: [u8; 3] = [0x1F, 0x29, 0x37];
const ACCESSORY_COLOR: [u8; 3] = [0x22, 0x22, 0x22];
const ADDON_COLOR: [u8; 3] = [0x33, 0x33, 0x33];

/// A loaded-model reference with its transform
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRef {
    pub url: String,
    pub scale: f64,
}

/// What a part is drawn from
#[derive(Debug, Clone, PartialEq)]
pub enum PartSource {
    /// Procedural mock geometry
    Standard(Vec<Primitive>),
    /// Catalog-keyed model from the override registry
    AdminOverride(AssetRef),
    /// Model uploaded by the user for this session's desk
    UserUpload(AssetRef),
}

impl PartSource {
    pub fn asset(&self) -> Option<&AssetRef> {
        match self {
            PartSource::Standard(_) => None,
            PartSource::AdminOverride(a) | PartSource::UserUpload(a) => Some(a),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            PartSource::Standard(_) => "standard",
            PartSource::AdminOverride(_) => "admin_override",
            PartSource::UserUpload(_) => "user_upload",
        }
    }
}

/// One part of the composed scene
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPart {
    pub part: PartRef,
    pub label: String,
    pub source: PartSource,
    pub anchor: DVec3,
    pub offset: DVec3,
    /// `anchor + offset`
    pub position: DVec3,
    pub color: [u8; 3],
    pub texture_url: Option<String>,
}

impl PlacedPart {
    pub fn is_selectable(&self) -> bool {
        self.part.is_selectable()
    }

    /// Bounds relative to the part's position; `None` while its model is not loaded
    pub fn local_bounds(&self, assets: &dyn AssetLookup) -> Option<Aabb> {
        match &self.source {
            PartSource::Standard(prims) => Some(
                prims
                    .iter()
                    .fold(Aabb::EMPTY, |acc, p| acc.union(&p.aabb())),
            ),
            PartSource::AdminOverride(a) | PartSource::UserUpload(a) => {
                let asset = assets.asset(&a.url)?;
                let b = asset.bounds();
                if b.is_empty() {
                    return Some(b);
                }
                Some(Aabb::new(b.min * a.scale, b.max * a.scale))
            }
        }
    }

    /// World-space bounds
    pub fn world_bounds(&self, assets: &dyn AssetLookup) -> Option<Aabb> {
        self.local_bounds(assets)
            .filter(|b| !b.is_empty())
            .map(|b| b.translated(self.position))
    }
}

/// The composed scene for one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub dimensions: DeskDimensions,
    pub parts: Vec<PlacedPart>,
    /// Top-surface placement the dimension overlay hangs from
    pub overlay_origin: DVec3,
}

impl SceneLayout {
    pub fn get(&self, part: &PartRef) -> Option<&PlacedPart> {
        self.parts.iter().find(|p| p.part == *part)
    }

    /// Look a part up by its selection id (`"140x70"`, `"user-desk"`, ...)
    pub fn find(&self, selection_id: &str) -> Option<&PlacedPart> {
        self.parts
            .iter()
            .find(|p| p.part.selection_id() == selection_id)
    }

    /// The part currently standing in for the desk top
    pub fn top(&self) -> Option<&PlacedPart> {
        self.parts
            .iter()
            .find(|p| matches!(p.part, PartRef::Top(_) | PartRef::UserTop))
    }

    /// URLs of every model the layout needs loaded
    pub fn asset_urls(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter_map(|p| p.source.asset())
            .map(|a| a.url.as_str())
    }

    /// Nearest selectable part under a ray
    pub fn pick(&self, ray: &Ray, assets: &dyn AssetLookup) -> Option<PartRef> {
        let candidates: Vec<(&PartRef, Aabb)> = self
            .parts
            .iter()
            .filter(|p| p.is_selectable())
            .filter_map(|p| Some((&p.part, p.world_bounds(assets)?)))
            .collect();
        pick_nearest(ray, candidates).cloned()
    }
}

/// Where the dimension overlay is anchored: the user top's world position
/// when one is uploaded, otherwise the frame top at the origin.
///
/// An admin top override does not move the overlay.
pub fn overlay_origin(config: &DeskConfig, overrides: &OverrideRegistry) -> DVec3 {
    if config.custom_desk_url().is_some() {
        anchor::world_position(&PartRef::UserTop, config, overrides)
    } else {
        DVec3::new(0.0, dimensions::resolve(config).height, 0.0)
    }
}

/// Compose the scene for a configuration snapshot
pub fn compose(config: &DeskConfig, overrides: &OverrideRegistry, catalog: &Catalog) -> SceneLayout {
    let dims = dimensions::resolve(config);
    let top_color = catalog
        .find(Category::TopColor, &config.top_color)
        .and_then(|o| o.rgb())
        .unwrap_or(FALLBACK_TOP_COLOR);
    let frame_color = catalog
        .find(Category::FrameColor, &config.frame_color)
        .and_then(|o| o.rgb())
        .unwrap_or(FALLBACK_FRAME_COLOR);

    let place = |part: PartRef, label: String, source: PartSource, color: [u8; 3], texture_url: Option<String>| {
        let anchor = anchor::anchor_with(&part, config, overrides, &dims);
        let offset = anchor::offset(&part, config, overrides);
        PlacedPart {
            part,
            label,
            source,
            anchor,
            offset,
            position: anchor + offset,
            color,
            texture_url,
        }
    };

    // Resolve a catalog part against the registry
    let catalog_source = |id: &str, standard: Vec<Primitive>| match overrides.active(id) {
        Some(o) => PartSource::AdminOverride(AssetRef {
            url: o.asset_url().unwrap_or_default().to_string(),
            scale: o.scale,
        }),
        None => PartSource::Standard(standard),
    };

    let mut parts = Vec::new();

    // Top
    if let Some(url) = config.custom_desk_url() {
        parts.push(place(
            PartRef::UserTop,
            "Custom top".to_string(),
            PartSource::UserUpload(AssetRef {
                url: url.to_string(),
                scale: config.custom_desk_scale,
            }),
            top_color,
            config.custom_texture_url.clone(),
        ));
    } else {
        let id = config.size.id();
        let texture = overrides
            .active(&id)
            .and_then(|o| o.texture_url.clone())
            .or_else(|| config.custom_texture_url.clone());
        parts.push(place(
            PartRef::Top(id.clone()),
            catalog.label(Category::Size, &id).to_string(),
            catalog_source(&id, primitives::top(&dims)),
            top_color,
            texture,
        ));
    }

    // Frame
    if let Some(url) = config.custom_frame_model_url() {
        parts.push(place(
            PartRef::UserFrame,
            "Custom frame".to_string(),
            PartSource::UserUpload(AssetRef {
                url: url.to_string(),
                scale: config.custom_frame_scale,
            }),
            frame_color,
            None,
        ));
    } else {
        let id = &config.frame_type;
        parts.push(place(
            PartRef::Frame(id.clone()),
            catalog.label(Category::FrameType, id).to_string(),
            catalog_source(id, primitives::frame(&dims)),
            frame_color,
            None,
        ));
    }

    for id in &config.accessories {
        parts.push(place(
            PartRef::Accessory(id.clone()),
            catalog.label(Category::Accessory, id).to_string(),
            catalog_source(id, primitives::accessory(id, &dims)),
            ACCESSORY_COLOR,
            overrides.active(id).and_then(|o| o.texture_url.clone()),
        ));
    }

    for id in &config.addons {
        parts.push(place(
            PartRef::Addon(id.clone()),
            catalog.label(Category::Addon, id).to_string(),
            catalog_source(id, primitives::addon(id, &dims)),
            ADDON_COLOR,
            overrides.active(id).and_then(|o| o.texture_url.clone()),
        ));
    }

    for element in &config.custom_elements {
        parts.push(place(
            PartRef::Element(element.id.clone()),
            element.name.clone(),
            PartSource::UserUpload(AssetRef {
                url: element.url.clone(),
                scale: ELEMENT_SCALE,
            }),
            ACCESSORY_COLOR,
            None,
        ));
    }

    SceneLayout {
        dimensions: dims,
        parts,
        overlay_origin: overlay_origin(config, overrides),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use shared::{CustomElement, DeskSize, ModelOverride};

    use super::*;
    use crate::assets::{MeshAsset, MeshNode};

    fn admin(url: &str) -> ModelOverride {
        ModelOverride {
            url: Some(url.into()),
            ..ModelOverride::named(url)
        }
    }

    #[test]
    fn test_default_layout() {
        let layout = compose(&DeskConfig::default(), &OverrideRegistry::new(), &Catalog::standard());
        let ids: Vec<_> = layout.parts.iter().map(|p| p.part.selection_id()).collect();
        assert_eq!(ids, ["140x70", "electric"]);
        let top = layout.top().unwrap();
        assert_eq!(top.position, DVec3::new(0.0, 75.0, 0.0));
        assert_eq!(top.label, "140 x 70 cm");
        assert_eq!(top.color, [0xC2, 0x9A, 0x6E]);
        assert_eq!(layout.overlay_origin, DVec3::new(0.0, 75.0, 0.0));
    }

    #[test]
    fn test_grommet_geometry_height() {
        let config = DeskConfig {
            accessories: vec!["grommet".into()],
            ..Default::default()
        };
        let layout = compose(&config, &OverrideRegistry::new(), &Catalog::standard());
        let grommet = layout.find("grommet").unwrap();
        assert_eq!(grommet.anchor.y, 77.5);
        let PartSource::Standard(prims) = &grommet.source else {
            panic!("expected standard source");
        };
        assert_eq!(grommet.position.y + prims[0].center().y, 76.25);
    }

    #[test]
    fn test_admin_override_replaces_mock() {
        let mut reg = OverrideRegistry::new();
        reg.insert("electric", admin("https://cdn/frame.stl"));
        let layout = compose(&DeskConfig::default(), &reg, &Catalog::standard());
        let frame = layout.find("electric").unwrap();
        assert_eq!(
            frame.source,
            PartSource::AdminOverride(AssetRef {
                url: "https://cdn/frame.stl".into(),
                scale: 1.0
            })
        );
        assert_eq!(frame.anchor, DVec3::ZERO);
    }

    #[test]
    fn test_user_uploads_replace_catalog_parts() {
        let config = DeskConfig {
            custom_desk_model_url: Some("top.obj".into()),
            custom_desk_on_frame: true,
            custom_desk_position: [2.0, 1.0, 0.0],
            custom_frame_url: Some("frame.obj".into()),
            ..Default::default()
        };
        let layout = compose(&config, &OverrideRegistry::new(), &Catalog::standard());
        assert!(layout.find("140x70").is_none());
        assert!(layout.find("electric").is_none());
        let top = layout.find("user-desk").unwrap();
        assert_eq!(top.position, DVec3::new(2.0, 76.0, 0.0));
        assert_eq!(layout.overlay_origin, top.position);
        assert!(layout.find("user-frame").is_some());
    }

    #[test]
    fn test_admin_top_does_not_move_overlay() {
        let mut reg = OverrideRegistry::new();
        reg.insert("140x70", ModelOverride {
            position: [10.0, 70.0, 0.0],
            ..admin("top.stl")
        });
        let layout = compose(&DeskConfig::default(), &reg, &Catalog::standard());
        assert_eq!(layout.top().unwrap().position, DVec3::new(10.0, 70.0, 0.0));
        assert_eq!(layout.overlay_origin, DVec3::new(0.0, 75.0, 0.0));
    }

    #[test]
    fn test_elements_placed_and_not_pickable() {
        let config = DeskConfig {
            size: DeskSize::nominal(120, 60),
            custom_elements: vec![CustomElement {
                id: "e1".into(),
                name: "plant.stl".into(),
                url: "plant.stl".into(),
            }],
            ..Default::default()
        };
        let layout = compose(&config, &OverrideRegistry::new(), &Catalog::standard());
        let el = layout.get(&PartRef::Element("e1".into())).unwrap();
        assert_eq!(el.position, DVec3::new(30.0, 0.0, 30.0));
        assert_eq!(el.source.asset().unwrap().scale, ELEMENT_SCALE);

        let mut assets: HashMap<String, Arc<MeshAsset>> = HashMap::new();
        assets.insert(
            "plant.stl".into(),
            Arc::new(MeshAsset::new(vec![MeshNode::new(
                "p",
                vec![DVec3::splat(-100.0), DVec3::splat(100.0), DVec3::ZERO],
            )])),
        );
        let ray = Ray {
            origin: DVec3::new(30.0, 500.0, 33.0),
            direction: DVec3::NEG_Y,
        };
        assert!(el.world_bounds(&assets).is_some());
        assert_eq!(layout.pick(&ray, &assets), None);
    }

    #[test]
    fn test_pick_top_from_above() {
        let layout = compose(&DeskConfig::default(), &OverrideRegistry::new(), &Catalog::standard());
        let assets: HashMap<String, Arc<MeshAsset>> = HashMap::new();
        let ray = Ray {
            origin: DVec3::new(0.0, 500.0, 0.0),
            direction: DVec3::NEG_Y,
        };
        assert_eq!(layout.pick(&ray, &assets), Some(PartRef::Top("140x70".into())));
    }

    #[test]
    fn test_unloaded_asset_has_no_bounds() {
        let mut reg = OverrideRegistry::new();
        reg.insert("140x70", admin("top.stl"));
        let layout = compose(&DeskConfig::default(), &reg, &Catalog::standard());
        let assets: HashMap<String, Arc<MeshAsset>> = HashMap::new();
        assert!(layout.top().unwrap().world_bounds(&assets).is_none());
        assert_eq!(layout.asset_urls().collect::<Vec<_>>(), ["top.stl"]);
    }
}
