//! Binary FBX decoding (7.x).
//!
//! After the 27-byte header the file is a tree of node records. Each record
//! holds its end offset, property count and property list length (`u32`
//! before version 7500, `u64` from then on), a name and typed properties,
//! followed by nested records closed by an all-zero record. Array
//! properties may be zlib compressed.
//!
//! Geometry comes from `Objects/Geometry` (`Vertices` and
//! `PolygonVertexIndex`, where a negative index `!i` closes a polygon).
//! `Model` nodes carry `Lcl Translation`/`Lcl Rotation`/`Lcl Scaling` in
//! `Properties70`; `Connections` attach geometry to models and models to
//! their parents.

use std::collections::HashMap;
use std::io::Read;

use flate2::read::ZlibDecoder;
use glam::{DMat4, DVec3};

use super::error::{AssetError, AssetResult};
use super::{MeshAsset, MeshNode};

const MAGIC: &[u8] = b"Kaydara FBX Binary  \0";
const HEADER_SIZE: usize = 27;
const WIDE_RECORDS_FROM: u32 = 7500;
/// Parent chains deeper than this are treated as cyclic
const MAX_DEPTH: usize = 64;

pub(super) fn decode(bytes: &[u8]) -> AssetResult<MeshAsset> {
    if !bytes.starts_with(MAGIC) {
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
        return Err(if head.contains("FBXHeaderExtension") {
            AssetError::invalid_content("ASCII FBX is not supported, export as binary")
        } else {
            AssetError::invalid_content("missing binary FBX header")
        });
    }
    let version = bytes
        .get(23..HEADER_SIZE)
        .map(|raw| u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
        .ok_or_else(|| AssetError::invalid_content("truncated FBX header"))?;

    let mut reader = Reader {
        bytes,
        pos: HEADER_SIZE,
        wide: version >= WIDE_RECORDS_FROM,
    };
    let roots = reader.read_list(bytes.len())?;
    Scene::collect(&roots)?.into_asset()
}

#[derive(Debug)]
enum Property {
    Int(i64),
    Float(f64),
    Str(String),
    Floats(Vec<f64>),
    Ints(Vec<i64>),
    Skipped,
}

impl Property {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Node {
    name: String,
    props: Vec<Property>,
    children: Vec<Node>,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn id(&self) -> Option<i64> {
        self.props.first().and_then(Property::as_i64)
    }

    /// Object names are stored as `name\0\x01Class`
    fn object_name(&self) -> String {
        self.props
            .get(1)
            .and_then(Property::as_str)
            .map(|s| s.split('\0').next().unwrap_or(s).to_string())
            .unwrap_or_default()
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    wide: bool,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> AssetResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| AssetError::invalid_content(format!("FBX truncated at byte {}", self.pos)))?;
        let bytes = self.bytes;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> AssetResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u32(&mut self) -> AssetResult<u32> {
        self.array().map(u32::from_le_bytes)
    }

    fn offset(&mut self) -> AssetResult<u64> {
        if self.wide {
            self.array().map(u64::from_le_bytes)
        } else {
            self.u32().map(u64::from)
        }
    }

    fn len(&mut self) -> AssetResult<usize> {
        let n = self.u32()?;
        usize::try_from(n).map_err(|_| AssetError::invalid_content("FBX length overflow"))
    }

    /// Records up to `end` or the closing null record
    fn read_list(&mut self, end: usize) -> AssetResult<Vec<Node>> {
        let mut nodes = Vec::new();
        while self.pos < end {
            match self.read_node()? {
                Some(node) => nodes.push(node),
                None => break,
            }
        }
        Ok(nodes)
    }

    fn read_node(&mut self) -> AssetResult<Option<Node>> {
        let start = self.pos;
        let end = self.offset()?;
        let num_props = self.offset()?;
        let _list_len = self.offset()?;
        let name_len = self.take(1)?[0] as usize;
        if end == 0 {
            return Ok(None);
        }

        let end = usize::try_from(end)
            .ok()
            .filter(|e| *e > start && *e <= self.bytes.len())
            .ok_or_else(|| AssetError::invalid_content(format!("bad FBX record end at byte {start}")))?;
        let name = String::from_utf8_lossy(self.take(name_len)?).into_owned();

        let mut props = Vec::new();
        for _ in 0..num_props {
            props.push(self.read_property()?);
        }
        let children = self.read_list(end)?;
        self.pos = end;

        Ok(Some(Node {
            name,
            props,
            children,
        }))
    }

    fn read_property(&mut self) -> AssetResult<Property> {
        let code = self.take(1)?[0];
        let prop = match code {
            b'Y' => Property::Int(i64::from(i16::from_le_bytes(self.array()?))),
            b'C' => {
                self.take(1)?;
                Property::Skipped
            }
            b'I' => Property::Int(i64::from(i32::from_le_bytes(self.array()?))),
            b'F' => Property::Float(f64::from(f32::from_le_bytes(self.array()?))),
            b'D' => Property::Float(f64::from_le_bytes(self.array()?)),
            b'L' => Property::Int(i64::from_le_bytes(self.array()?)),
            b'S' => {
                let len = self.len()?;
                Property::Str(String::from_utf8_lossy(self.take(len)?).into_owned())
            }
            b'R' => {
                let len = self.len()?;
                self.take(len)?;
                Property::Skipped
            }
            b'f' | b'd' | b'l' | b'i' | b'b' => self.read_array(code)?,
            other => {
                return Err(AssetError::invalid_content(format!(
                    "unknown FBX property type {:?} at byte {}",
                    other as char,
                    self.pos - 1
                )))
            }
        };
        Ok(prop)
    }

    fn read_array(&mut self, code: u8) -> AssetResult<Property> {
        let count = self.len()?;
        let encoding = self.u32()?;
        let stored = self.len()?;
        let raw = self.take(stored)?;

        let elem = match code {
            b'd' | b'l' => 8,
            b'f' | b'i' => 4,
            _ => 1,
        };
        let expected = count
            .checked_mul(elem)
            .ok_or_else(|| AssetError::invalid_content("FBX array too large"))?;
        let data = match encoding {
            0 => raw.to_vec(),
            1 => inflate(raw, expected)?,
            other => {
                return Err(AssetError::invalid_content(format!(
                    "unknown FBX array encoding {other}"
                )))
            }
        };
        if data.len() < expected {
            return Err(AssetError::invalid_content(format!(
                "FBX array holds {} bytes, expected {expected}",
                data.len()
            )));
        }
        let data = &data[..expected];

        Ok(match code {
            b'd' => Property::Floats(
                data.chunks_exact(8)
                    .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
            b'f' => Property::Floats(
                data.chunks_exact(4)
                    .map(|c| f64::from(f32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                    .collect(),
            ),
            b'l' => Property::Ints(
                data.chunks_exact(8)
                    .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
            b'i' => Property::Ints(
                data.chunks_exact(4)
                    .map(|c| i64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                    .collect(),
            ),
            _ => Property::Skipped,
        })
    }
}

fn inflate(raw: &[u8], expected: usize) -> AssetResult<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    ZlibDecoder::new(raw)
        .take(expected as u64)
        .read_to_end(&mut out)
        .map_err(|e| AssetError::invalid_content(format!("corrupt FBX array: {e}")))?;
    Ok(out)
}

struct Geometry {
    id: i64,
    name: String,
    positions: Vec<DVec3>,
}

struct Model {
    name: String,
    local: DMat4,
}

#[derive(Default)]
struct Scene {
    geometries: Vec<Geometry>,
    models: HashMap<i64, Model>,
    /// Object-to-object links in file order: (child, parent)
    links: Vec<(i64, i64)>,
}

impl Scene {
    fn collect(roots: &[Node]) -> AssetResult<Self> {
        let objects = roots
            .iter()
            .find(|n| n.name == "Objects")
            .ok_or_else(|| AssetError::invalid_content("FBX has no Objects section"))?;

        let mut scene = Self::default();
        for geometry in objects.children_named("Geometry") {
            let Some(id) = geometry.id() else { continue };
            let positions = triangulate(geometry)?;
            if positions.is_empty() {
                continue;
            }
            scene.geometries.push(Geometry {
                id,
                name: geometry.object_name(),
                positions,
            });
        }
        for model in objects.children_named("Model") {
            let Some(id) = model.id() else { continue };
            scene.models.insert(
                id,
                Model {
                    name: model.object_name(),
                    local: local_transform(model),
                },
            );
        }
        if let Some(connections) = roots.iter().find(|n| n.name == "Connections") {
            for c in connections.children_named("C") {
                if c.props.first().and_then(Property::as_str) != Some("OO") {
                    continue;
                }
                if let (Some(child), Some(parent)) = (
                    c.props.get(1).and_then(Property::as_i64),
                    c.props.get(2).and_then(Property::as_i64),
                ) {
                    scene.links.push((child, parent));
                }
            }
        }
        Ok(scene)
    }

    fn world_transform(&self, model_id: i64) -> DMat4 {
        let mut world = DMat4::IDENTITY;
        let mut current = Some(model_id);
        for _ in 0..MAX_DEPTH {
            let Some(id) = current else { break };
            let Some(model) = self.models.get(&id) else { break };
            world = model.local * world;
            current = self.parent_model(id);
        }
        world
    }

    fn parent_model(&self, child: i64) -> Option<i64> {
        self.links
            .iter()
            .find(|(c, p)| *c == child && self.models.contains_key(p))
            .map(|(_, p)| *p)
    }

    fn into_asset(self) -> AssetResult<MeshAsset> {
        let mut nodes = Vec::new();
        for geometry in &self.geometries {
            let owners: Vec<i64> = self
                .links
                .iter()
                .filter(|(c, p)| *c == geometry.id && self.models.contains_key(p))
                .map(|(_, p)| *p)
                .collect();
            if owners.is_empty() {
                nodes.push(MeshNode::new(geometry.name.clone(), geometry.positions.clone()));
            }
            for owner in owners {
                let name = self
                    .models
                    .get(&owner)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| geometry.name.clone());
                nodes.push(
                    MeshNode::new(name, geometry.positions.clone())
                        .with_transform(self.world_transform(owner)),
                );
            }
        }
        if nodes.is_empty() {
            return Err(AssetError::invalid_content("FBX contains no mesh geometry"));
        }
        Ok(MeshAsset::new(nodes))
    }
}

/// Fan-triangulate a `Geometry` node into triangle soup
fn triangulate(geometry: &Node) -> AssetResult<Vec<DVec3>> {
    let vertices: Vec<DVec3> = match geometry.child("Vertices").and_then(|v| v.props.first()) {
        Some(Property::Floats(coords)) => coords
            .chunks_exact(3)
            .map(|c| DVec3::new(c[0], c[1], c[2]))
            .collect(),
        _ => return Ok(Vec::new()),
    };
    let indices = match geometry
        .child("PolygonVertexIndex")
        .and_then(|v| v.props.first())
    {
        Some(Property::Ints(indices)) => indices,
        _ => return Ok(Vec::new()),
    };

    let lookup = |raw: i64| -> AssetResult<DVec3> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| vertices.get(i).copied())
            .ok_or_else(|| AssetError::invalid_content(format!("FBX polygon index {raw} out of range")))
    };

    let mut positions = Vec::new();
    let mut polygon: Vec<DVec3> = Vec::new();
    for &raw in indices {
        let last = raw < 0;
        polygon.push(lookup(if last { !raw } else { raw })?);
        if last {
            for i in 1..polygon.len().saturating_sub(1) {
                positions.extend([polygon[0], polygon[i], polygon[i + 1]]);
            }
            polygon.clear();
        }
    }
    Ok(positions)
}

fn property70<'a>(model: &'a Node, name: &str) -> Option<&'a [Property]> {
    model
        .child("Properties70")?
        .children_named("P")
        .find(|p| p.props.first().and_then(Property::as_str) == Some(name))
        .map(|p| p.props.get(4..).unwrap_or(&[]))
}

fn vector70(model: &Node, name: &str, default: DVec3) -> DVec3 {
    let Some(values) = property70(model, name) else {
        return default;
    };
    let coords: Vec<f64> = values.iter().filter_map(Property::as_f64).take(3).collect();
    match coords[..] {
        [x, y, z] => DVec3::new(x, y, z),
        _ => default,
    }
}

/// Euler XYZ in degrees, X applied first
fn rotation(degrees: DVec3) -> DMat4 {
    let r = degrees * (std::f64::consts::PI / 180.0);
    DMat4::from_rotation_z(r.z) * DMat4::from_rotation_y(r.y) * DMat4::from_rotation_x(r.x)
}

fn local_transform(model: &Node) -> DMat4 {
    let translation = vector70(model, "Lcl Translation", DVec3::ZERO);
    let pre_rotation = vector70(model, "PreRotation", DVec3::ZERO);
    let lcl_rotation = vector70(model, "Lcl Rotation", DVec3::ZERO);
    let scaling = vector70(model, "Lcl Scaling", DVec3::ONE);
    DMat4::from_translation(translation)
        * rotation(pre_rotation)
        * rotation(lcl_rotation)
        * DMat4::from_scale(scaling)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    use super::*;

    struct Record {
        name: &'static str,
        props: Vec<Vec<u8>>,
        children: Vec<Record>,
    }

    fn record(name: &'static str, props: Vec<Vec<u8>>, children: Vec<Record>) -> Record {
        Record {
            name,
            props,
            children,
        }
    }

    fn long(v: i64) -> Vec<u8> {
        let mut out = vec![b'L'];
        out.extend(v.to_le_bytes());
        out
    }

    fn double(v: f64) -> Vec<u8> {
        let mut out = vec![b'D'];
        out.extend(v.to_le_bytes());
        out
    }

    fn string(s: &str) -> Vec<u8> {
        let mut out = vec![b'S'];
        out.extend((s.len() as u32).to_le_bytes());
        out.extend(s.as_bytes());
        out
    }

    fn array(code: u8, count: usize, data: Vec<u8>, compressed: bool) -> Vec<u8> {
        let (encoding, payload) = if compressed {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(&data).unwrap();
            (1u32, enc.finish().unwrap())
        } else {
            (0u32, data)
        };
        let mut out = vec![code];
        out.extend((count as u32).to_le_bytes());
        out.extend(encoding.to_le_bytes());
        out.extend((payload.len() as u32).to_le_bytes());
        out.extend(payload);
        out
    }

    fn doubles(values: &[f64], compressed: bool) -> Vec<u8> {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        array(b'd', values.len(), data, compressed)
    }

    fn ints(values: &[i32]) -> Vec<u8> {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        array(b'i', values.len(), data, false)
    }

    fn write_record(out: &mut Vec<u8>, rec: &Record, wide: bool) {
        let field = if wide { 8 } else { 4 };
        let start = out.len();
        out.extend(vec![0u8; field * 3]);
        out.push(rec.name.len() as u8);
        out.extend(rec.name.as_bytes());
        let props_start = out.len();
        for p in &rec.props {
            out.extend(p);
        }
        let list_len = out.len() - props_start;
        if !rec.children.is_empty() {
            for child in &rec.children {
                write_record(out, child, wide);
            }
            out.extend(vec![0u8; field * 3 + 1]);
        }
        let fields = [out.len(), rec.props.len(), list_len];
        for (i, value) in fields.into_iter().enumerate() {
            let at = start + i * field;
            if wide {
                out[at..at + 8].copy_from_slice(&(value as u64).to_le_bytes());
            } else {
                out[at..at + 4].copy_from_slice(&(value as u32).to_le_bytes());
            }
        }
    }

    fn fbx_file(version: u32, roots: &[Record]) -> Vec<u8> {
        let wide = version >= WIDE_RECORDS_FROM;
        let mut out = MAGIC.to_vec();
        out.extend([0x1A, 0x00]);
        out.extend(version.to_le_bytes());
        for root in roots {
            write_record(&mut out, root, wide);
        }
        out.extend(vec![0u8; if wide { 25 } else { 13 }]);
        out
    }

    /// Unit quad in the XZ plane as one polygon
    fn quad_geometry(id: i64, compressed: bool) -> Record {
        record(
            "Geometry",
            vec![long(id), string("Quad\0\x01Geometry"), string("Mesh")],
            vec![
                record(
                    "Vertices",
                    vec![doubles(
                        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0],
                        compressed,
                    )],
                    vec![],
                ),
                record("PolygonVertexIndex", vec![ints(&[0, 1, 2, !3])], vec![]),
            ],
        )
    }

    fn vector_prop(name: &str, v: [f64; 3]) -> Record {
        record(
            "P",
            vec![
                string(name),
                string(name),
                string(""),
                string("A"),
                double(v[0]),
                double(v[1]),
                double(v[2]),
            ],
            vec![],
        )
    }

    fn model(id: i64, name: &str, props: Vec<Record>) -> Record {
        record(
            "Model",
            vec![long(id), string(&format!("{name}\0\x01Model")), string("Mesh")],
            vec![record("Properties70", vec![], props)],
        )
    }

    fn link(child: i64, parent: i64) -> Record {
        record("C", vec![string("OO"), long(child), long(parent)], vec![])
    }

    #[test]
    fn test_model_transform_applies_to_geometry() {
        let bytes = fbx_file(
            7400,
            &[
                record("FBXHeaderExtension", vec![], vec![]),
                record(
                    "Objects",
                    vec![],
                    vec![
                        quad_geometry(10, false),
                        model(
                            20,
                            "Desk",
                            vec![
                                vector_prop("Lcl Translation", [10.0, 0.0, 0.0]),
                                vector_prop("Lcl Scaling", [2.0, 2.0, 2.0]),
                            ],
                        ),
                    ],
                ),
                record("Connections", vec![], vec![link(10, 20), link(20, 0)]),
            ],
        );
        let asset = decode(&bytes).unwrap();
        assert_eq!(asset.nodes.len(), 1);
        assert_eq!(asset.nodes[0].name, "Desk");
        assert_eq!(asset.triangle_count(), 2);
        let bounds = asset.bounds();
        assert_eq!(bounds.min, DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(12.0, 0.0, 2.0));
    }

    #[test]
    fn test_parent_model_chain_wide_records() {
        let bytes = fbx_file(
            7500,
            &[
                record(
                    "Objects",
                    vec![],
                    vec![
                        quad_geometry(1, false),
                        model(2, "Leg", vec![vector_prop("Lcl Translation", [0.0, 5.0, 0.0])]),
                        model(3, "Frame", vec![vector_prop("Lcl Translation", [1.0, 0.0, 0.0])]),
                    ],
                ),
                record("Connections", vec![], vec![link(1, 2), link(2, 3), link(3, 0)]),
            ],
        );
        let asset = decode(&bytes).unwrap();
        let bounds = asset.bounds();
        assert_eq!(bounds.min, DVec3::new(1.0, 5.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(2.0, 5.0, 1.0));
    }

    #[test]
    fn test_compressed_arrays_without_model() {
        let bytes = fbx_file(
            7400,
            &[record("Objects", vec![], vec![quad_geometry(1, true)])],
        );
        let asset = decode(&bytes).unwrap();
        assert_eq!(asset.nodes[0].name, "Quad");
        assert_eq!(asset.nodes[0].transform, DMat4::IDENTITY);
        assert_eq!(asset.bounds().max, DVec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_is_degrees() {
        let m = rotation(DVec3::new(0.0, 90.0, 0.0));
        let p = m.transform_point3(DVec3::X);
        assert!((p - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_rejects_ascii_and_garbage() {
        let ascii = b"; FBX 7.4.0 project file\nFBXHeaderExtension:  {\n}";
        let err = decode(ascii).unwrap_err();
        assert!(err.to_string().contains("ASCII"));
        assert!(decode(b"solid nothing").is_err());
    }

    #[test]
    fn test_rejects_truncated_and_empty() {
        let bytes = fbx_file(
            7400,
            &[record("Objects", vec![], vec![quad_geometry(1, false)])],
        );
        assert!(decode(&bytes[..bytes.len() / 2]).is_err());

        let empty = fbx_file(7400, &[record("Objects", vec![], vec![])]);
        assert!(decode(&empty).is_err());
    }

    #[test]
    fn test_out_of_range_index() {
        let geometry = record(
            "Geometry",
            vec![long(1), string("Bad\0\x01Geometry"), string("Mesh")],
            vec![
                record("Vertices", vec![doubles(&[0.0; 9], false)], vec![]),
                record("PolygonVertexIndex", vec![ints(&[0, 1, !7])], vec![]),
            ],
        );
        let bytes = fbx_file(7400, &[record("Objects", vec![], vec![geometry])]);
        assert!(decode(&bytes).unwrap_err().to_string().contains("out of range"));
    }
}
