//! STL decoding (binary and ASCII).
//!
//! Binary layout: 80-byte header, little-endian `u32` triangle count, then
//! 50 bytes per triangle (normal, three vertices, attribute word). ASCII
//! files start with `solid`; some exporters also write `solid` into binary
//! headers, so the declared size is checked first.

use glam::DVec3;

use super::error::{AssetError, AssetResult};
use super::{MeshAsset, MeshNode};

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

pub(super) fn decode(bytes: &[u8]) -> AssetResult<MeshAsset> {
    let positions = if is_binary(bytes) {
        decode_binary(bytes)?
    } else if looks_ascii(bytes) {
        decode_ascii(bytes)?
    } else {
        decode_binary(bytes)?
    };
    Ok(MeshAsset::new(vec![MeshNode::new("stl", positions)]))
}

fn declared_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Binary when the declared triangle count matches the payload size exactly
fn is_binary(bytes: &[u8]) -> bool {
    declared_count(bytes)
        .is_some_and(|n| HEADER_SIZE + 4 + n as usize * TRIANGLE_SIZE == bytes.len())
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    String::from_utf8_lossy(head).trim_start().starts_with("solid")
}

fn decode_binary(bytes: &[u8]) -> AssetResult<Vec<DVec3>> {
    let expected = declared_count(bytes)
        .ok_or_else(|| AssetError::invalid_content("file too small to be a binary STL"))?;

    let body = &bytes[HEADER_SIZE + 4..];
    let available = (body.len() / TRIANGLE_SIZE) as u32;
    if available < expected {
        return Err(AssetError::Truncated {
            expected,
            got: available,
        });
    }

    let mut positions = Vec::with_capacity(expected as usize * 3);
    for tri in body.chunks_exact(TRIANGLE_SIZE).take(expected as usize) {
        // skip the 12-byte normal
        for v in 0..3 {
            let start = 12 + v * 12;
            positions.push(read_vertex(&tri[start..start + 12]));
        }
    }
    Ok(positions)
}

fn read_vertex(buf: &[u8]) -> DVec3 {
    let f = |i: usize| f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
    DVec3::new(f64::from(f(0)), f64::from(f(4)), f64::from(f(8)))
}

fn decode_ascii(bytes: &[u8]) -> AssetResult<Vec<DVec3>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AssetError::invalid_content(format!("ASCII STL is not UTF-8: {e}")))?;

    let mut positions = Vec::new();
    let mut facet: Vec<DVec3> = Vec::with_capacity(3);

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("facet") => facet.clear(),
            Some("vertex") => {
                let coords: Vec<f64> = parts
                    .map(str::parse::<f64>)
                    .collect::<Result<_, _>>()
                    .map_err(|e| {
                        AssetError::invalid_content(format!("line {}: {e}", line_no + 1))
                    })?;
                if coords.len() != 3 {
                    return Err(AssetError::invalid_content(format!(
                        "line {}: vertex needs 3 coordinates",
                        line_no + 1
                    )));
                }
                facet.push(DVec3::new(coords[0], coords[1], coords[2]));
            }
            Some("endfacet") => {
                if facet.len() != 3 {
                    return Err(AssetError::invalid_content(format!(
                        "line {}: facet has {} vertices",
                        line_no + 1,
                        facet.len()
                    )));
                }
                positions.append(&mut facet);
            }
            _ => {}
        }
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_stl(triangles: &[[[f32; 3]; 3]], header: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..header.len()].copy_from_slice(header);
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            bytes.extend_from_slice(&[0u8; 12]);
            for v in tri {
                for c in v {
                    bytes.extend_from_slice(&c.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&[0u8; 2]);
        }
        bytes
    }

    #[test]
    fn test_binary() {
        let bytes = binary_stl(&[[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 3.0]]], b"export");
        let asset = decode(&bytes).unwrap();
        assert_eq!(asset.triangle_count(), 1);
        assert_eq!(asset.bounds().max, DVec3::new(2.0, 1.0, 3.0));
    }

    #[test]
    fn test_binary_with_solid_header() {
        let bytes = binary_stl(&[[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]], b"solid exported");
        let asset = decode(&bytes).unwrap();
        assert_eq!(asset.triangle_count(), 1);
    }

    #[test]
    fn test_binary_truncated() {
        let mut bytes = binary_stl(&[[[0.0; 3]; 3], [[1.0; 3]; 3]], b"x");
        bytes.truncate(bytes.len() - 10);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, AssetError::Truncated { expected: 2, got: 1 }));
    }

    #[test]
    fn test_ascii() {
        let text = "solid cube\n\
            facet normal 0 0 1\n\
              outer loop\n\
                vertex 0 0 0\n\
                vertex 10 0 0\n\
                vertex 10 0 -4\n\
              endloop\n\
            endfacet\n\
            endsolid cube\n";
        let asset = decode(text.as_bytes()).unwrap();
        assert_eq!(asset.triangle_count(), 1);
        let b = asset.bounds();
        assert_eq!(b.min, DVec3::new(0.0, 0.0, -4.0));
        assert_eq!(b.max, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_ascii_bad_vertex() {
        let text = "solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\n";
        assert!(matches!(
            decode(text.as_bytes()),
            Err(AssetError::InvalidContent { .. })
        ));
    }

    #[test]
    fn test_ascii_empty_solid_is_empty_asset() {
        let asset = decode(b"solid nothing\nendsolid nothing\n").unwrap();
        assert!(asset.is_empty());
    }

    #[test]
    fn test_too_small() {
        assert!(decode(b"abc").is_err());
    }
}
