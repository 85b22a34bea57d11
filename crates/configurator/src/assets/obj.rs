//! Wavefront OBJ decoding.
//!
//! Only geometry statements matter here: `v` positions, `f` faces (fan
//! triangulated, `v/vt/vn` forms accepted, negative indices relative to the
//! vertices seen so far) and `o`/`g` statements, each of which starts a new
//! node. Materials, normals and texture coordinates are skipped.

use glam::DVec3;

use super::error::{AssetError, AssetResult};
use super::{MeshAsset, MeshNode};

const DEFAULT_NODE: &str = "default";

pub(super) fn decode(bytes: &[u8]) -> AssetResult<MeshAsset> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AssetError::invalid_content(format!("OBJ is not UTF-8: {e}")))?;

    let mut vertices: Vec<DVec3> = Vec::new();
    let mut nodes: Vec<MeshNode> = Vec::new();
    let mut current = MeshNode::new(DEFAULT_NODE, Vec::new());

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let line_no = line_no + 1;

        match keyword {
            "v" => {
                let coords = parts
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| AssetError::invalid_content(format!("line {line_no}: {e}")))?;
                if coords.len() != 3 {
                    return Err(AssetError::invalid_content(format!(
                        "line {line_no}: vertex needs 3 coordinates"
                    )));
                }
                vertices.push(DVec3::new(coords[0], coords[1], coords[2]));
            }
            "f" => {
                let corners = parts
                    .map(|token| resolve_index(token, vertices.len(), line_no))
                    .collect::<AssetResult<Vec<_>>>()?;
                if corners.len() < 3 {
                    return Err(AssetError::invalid_content(format!(
                        "line {line_no}: face needs at least 3 vertices"
                    )));
                }
                for i in 1..corners.len() - 1 {
                    for idx in [corners[0], corners[i], corners[i + 1]] {
                        current.positions.push(vertices[idx]);
                    }
                }
            }
            "o" | "g" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                let finished = std::mem::replace(
                    &mut current,
                    MeshNode::new(if name.is_empty() { DEFAULT_NODE.to_string() } else { name }, Vec::new()),
                );
                if !finished.positions.is_empty() {
                    nodes.push(finished);
                }
            }
            _ => {}
        }
    }

    if !current.positions.is_empty() {
        nodes.push(current);
    }

    Ok(MeshAsset::new(nodes))
}

/// Resolve a face corner token (`7`, `7/1`, `7//3`, `-1/...`) to a 0-based index
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> AssetResult<usize> {
    let raw = token.split('/').next().unwrap_or(token);
    let index: i64 = raw
        .parse()
        .map_err(|_| AssetError::invalid_content(format!("line {line_no}: bad face index '{token}'")))?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i as usize - 1),
        i => (vertex_count as i64 + i).try_into().ok(),
    };

    resolved
        .filter(|&i| i < vertex_count)
        .ok_or_else(|| {
            AssetError::invalid_content(format!(
                "line {line_no}: face index {index} out of range ({vertex_count} vertices)"
            ))
        })
}
