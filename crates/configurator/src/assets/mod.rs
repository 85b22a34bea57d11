//! Mesh assets: the decoded scene graph of an uploaded model (STL, OBJ or
//! binary FBX).
//!
//! An asset is a flat list of nodes, each carrying a local transform and
//! triangle soup positions. Only geometry is kept; materials and textures
//! are resolved by reference at draw time.

pub mod error;
mod fbx;
pub mod loader;
mod obj;
mod stl;

use std::collections::HashMap;
use std::sync::Arc;

use glam::{DMat4, DVec3};

pub use error::{AssetError, AssetResult};

use crate::viewport::picking::Aabb;

/// Mesh file formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Stl,
    Obj,
    Fbx,
}

impl AssetFormat {
    /// Detect the format from an asset reference's extension.
    ///
    /// Query strings and fragments are ignored, so signed storage URLs work.
    pub fn from_reference(reference: &str) -> Option<Self> {
        let path = reference
            .split(['?', '#'])
            .next()
            .unwrap_or(reference);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "fbx" => Some(Self::Fbx),
            _ => None,
        }
    }

    /// File extension (without the dot)
    pub fn extension(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::Fbx => "fbx",
        }
    }

    /// Decode raw file contents
    pub fn decode(self, bytes: &[u8]) -> AssetResult<MeshAsset> {
        match self {
            Self::Stl => stl::decode(bytes),
            Self::Obj => obj::decode(bytes),
            Self::Fbx => fbx::decode(bytes),
        }
    }
}

/// One mesh node of a loaded asset
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub name: String,
    /// Node-to-asset transform
    pub transform: DMat4,
    /// Triangle soup, three positions per triangle
    pub positions: Vec<DVec3>,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, positions: Vec<DVec3>) -> Self {
        Self {
            name: name.into(),
            transform: DMat4::IDENTITY,
            positions,
        }
    }

    pub fn with_transform(mut self, transform: DMat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Positions in asset space (node transform applied)
    pub fn asset_positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.positions
            .iter()
            .map(move |p| self.transform.transform_point3(*p))
    }
}

/// A decoded model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshAsset {
    pub nodes: Vec<MeshNode>,
}

impl MeshAsset {
    pub fn new(nodes: Vec<MeshNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.positions.is_empty())
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(MeshNode::triangle_count).sum()
    }

    /// Unscaled bounding box in asset space; empty for a degenerate asset
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.nodes.iter().flat_map(MeshNode::asset_positions))
    }

    /// Triangles in asset space
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.nodes.iter().flat_map(|node| {
            let m = node.transform;
            node.positions.chunks_exact(3).map(move |t| {
                [
                    m.transform_point3(t[0]),
                    m.transform_point3(t[1]),
                    m.transform_point3(t[2]),
                ]
            })
        })
    }
}

/// Read access to loaded assets by reference
pub trait AssetLookup {
    fn asset(&self, url: &str) -> Option<Arc<MeshAsset>>;
}

impl AssetLookup for HashMap<String, Arc<MeshAsset>> {
    fn asset(&self, url: &str) -> Option<Arc<MeshAsset>> {
        self.get(url).cloned()
    }
}
