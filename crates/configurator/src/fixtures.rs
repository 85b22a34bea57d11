//! Factory functions for test data.
//!
//! Builds configurations, override records, payloads, and synthetic mesh
//! assets used by unit tests, integration tests, and the command interface.

use glam::DVec3;

use shared::*;

use crate::assets::{MeshAsset, MeshNode};

// ── Configuration factories ─────────────────────────────────────

/// Default configuration (140x70, oak, electric frame)
pub fn default_config() -> DeskConfig {
    DeskConfig::default()
}

/// Configuration with a nominal size
pub fn sized_config(width: u32, depth: u32) -> DeskConfig {
    DeskConfig {
        size: DeskSize::nominal(width, depth),
        ..DeskConfig::default()
    }
}

/// Configuration with the custom size selected
pub fn custom_size_config(width: f64, depth: f64) -> DeskConfig {
    DeskConfig {
        size: DeskSize::Custom,
        custom_width: width,
        custom_depth: depth,
        ..DeskConfig::default()
    }
}

/// Configuration with the given accessories and add-ons selected
pub fn equipped_config(accessories: &[&str], addons: &[&str]) -> DeskConfig {
    DeskConfig {
        accessories: accessories.iter().map(|s| s.to_string()).collect(),
        addons: addons.iter().map(|s| s.to_string()).collect(),
        ..DeskConfig::default()
    }
}

/// Configuration with a user-uploaded top
pub fn user_top_config(url: &str, scale: f64, on_frame: bool) -> DeskConfig {
    DeskConfig {
        custom_desk_model_url: Some(url.to_string()),
        custom_desk_scale: scale,
        custom_desk_on_frame: on_frame,
        ..DeskConfig::default()
    }
}

/// Configuration with a user-uploaded frame
pub fn user_frame_config(url: &str, scale: f64) -> DeskConfig {
    DeskConfig {
        custom_frame_url: Some(url.to_string()),
        custom_frame_scale: scale,
        ..DeskConfig::default()
    }
}

// ── Override factories ──────────────────────────────────────────

/// Active override with a model at unit scale and origin
pub fn model_override(url: &str) -> ModelOverride {
    let file_name = url.rsplit('/').next().unwrap_or(url);
    ModelOverride {
        url: Some(url.to_string()),
        ..ModelOverride::named(file_name)
    }
}

/// Active override with an explicit transform
pub fn placed_override(url: &str, scale: f64, position: Position) -> ModelOverride {
    ModelOverride {
        scale,
        position,
        ..model_override(url)
    }
}

/// Inactive record carrying only a position
pub fn position_stub(position: Position) -> ModelOverride {
    ModelOverride {
        position,
        ..ModelOverride::named("Manual edit")
    }
}

/// Payload from a configuration and `(id, record)` pairs
pub fn payload(config: DeskConfig, overrides: Vec<(&str, ModelOverride)>) -> ConfigurationPayload {
    ConfigurationPayload {
        config,
        overrides: overrides
            .into_iter()
            .map(|(id, rec)| (id.to_string(), rec))
            .collect(),
    }
}

/// Stored record as the configuration service returns it
pub fn saved_record(id: &str, name: &str, data: ConfigurationPayload) -> SavedConfiguration {
    SavedConfiguration {
        id: id.to_string(),
        name: name.to_string(),
        created_at: "2024-05-01T10:00:00Z".to_string(),
        data: Some(data),
    }
}

// ── Mesh factories ──────────────────────────────────────────────

/// Triangulated axis-aligned box between two corners
pub fn box_mesh(min: DVec3, max: DVec3) -> MeshAsset {
    let c = |x: bool, y: bool, z: bool| {
        DVec3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    // Quads as corner index triples, two triangles each
    let quads: [[(bool, bool, bool); 4]; 6] = [
        [(false, false, false), (true, false, false), (true, false, true), (false, false, true)],
        [(false, true, false), (false, true, true), (true, true, true), (true, true, false)],
        [(false, false, false), (false, true, false), (true, true, false), (true, false, false)],
        [(false, false, true), (true, false, true), (true, true, true), (false, true, true)],
        [(false, false, false), (false, false, true), (false, true, true), (false, true, false)],
        [(true, false, false), (true, true, false), (true, true, true), (true, false, true)],
    ];
    let mut positions = Vec::with_capacity(36);
    for q in quads {
        let [a, b, cc, d] = q.map(|(x, y, z)| c(x, y, z));
        positions.extend_from_slice(&[a, b, cc, a, cc, d]);
    }
    MeshAsset::new(vec![MeshNode::new("box", positions)])
}

/// Box of the given size centered on the origin, resting on y = 0
pub fn slab_mesh(width: f64, height: f64, depth: f64) -> MeshAsset {
    box_mesh(
        DVec3::new(-width / 2.0, 0.0, -depth / 2.0),
        DVec3::new(width / 2.0, height, depth / 2.0),
    )
}

/// 100 x 4 x 60 slab whose bounds center sits at x = 30, z = -10
pub fn off_center_slab() -> MeshAsset {
    box_mesh(DVec3::new(-20.0, 0.0, -40.0), DVec3::new(80.0, 4.0, 20.0))
}

/// Binary STL bytes for a mesh (first node's triangles, normals zeroed)
pub fn binary_stl(asset: &MeshAsset) -> Vec<u8> {
    let triangles: Vec<[DVec3; 3]> = asset.triangles().collect();
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for tri in triangles {
        bytes.extend_from_slice(&[0u8; 12]);
        for v in tri {
            for c in [v.x, v.y, v.z] {
                bytes.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        bytes.extend_from_slice(&[0u8; 2]);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetFormat;

    #[test]
    fn test_box_mesh_bounds() {
        let asset = off_center_slab();
        assert_eq!(asset.triangle_count(), 12);
        let b = asset.bounds();
        assert_eq!(b.center(), DVec3::new(30.0, 2.0, -10.0));
        assert_eq!(b.size(), DVec3::new(100.0, 4.0, 60.0));
    }

    #[test]
    fn test_binary_stl_decodes_back() {
        let bytes = binary_stl(&slab_mesh(120.0, 3.0, 60.0));
        assert_eq!(bytes.len(), 84 + 12 * 50);
        let decoded = AssetFormat::Stl.decode(&bytes).unwrap();
        assert_eq!(decoded.bounds().size(), DVec3::new(120.0, 3.0, 60.0));
    }

    #[test]
    fn test_payload_keys() {
        let p = payload(default_config(), vec![("electric", model_override("https://cdn/f.stl"))]);
        assert_eq!(p.overrides["electric"].file_name, "f.stl");
        assert!(p.overrides["electric"].is_active());
    }
}
