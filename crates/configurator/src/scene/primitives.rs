//! Procedural stand-in geometry for parts without an active override.
//!
//! Every primitive is expressed relative to its part's anchor.

use glam::DVec3;

use crate::dimensions::DeskDimensions;
use crate::viewport::picking::Aabb;

/// A solid drawn in place of a loaded model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Box { center: DVec3, size: DVec3 },
    /// Upright cylinder (axis along Y)
    Cylinder { center: DVec3, radius: f64, height: f64 },
}

impl Primitive {
    fn cuboid(center: [f64; 3], size: [f64; 3]) -> Self {
        Primitive::Box {
            center: DVec3::from_array(center),
            size: DVec3::from_array(size),
        }
    }

    fn cylinder(center: [f64; 3], radius: f64, height: f64) -> Self {
        Primitive::Cylinder {
            center: DVec3::from_array(center),
            radius,
            height,
        }
    }

    pub fn center(&self) -> DVec3 {
        match *self {
            Primitive::Box { center, .. } | Primitive::Cylinder { center, .. } => center,
        }
    }

    /// Local-space bounding box
    pub fn aabb(&self) -> Aabb {
        match *self {
            Primitive::Box { center, size } => Aabb::from_center_size(center, size),
            Primitive::Cylinder {
                center,
                radius,
                height,
            } => Aabb::from_center_size(center, DVec3::new(2.0 * radius, height, 2.0 * radius)),
        }
    }
}

/// Desk top slab, built on top of its local origin
pub fn top(dims: &DeskDimensions) -> Vec<Primitive> {
    let t = dims.top_thickness;
    vec![Primitive::cuboid([0.0, t / 2.0, 0.0], [dims.width, t, dims.depth])]
}

/// Two legs and a crossbar standing on the floor
pub fn frame(dims: &DeskDimensions) -> Vec<Primitive> {
    let DeskDimensions {
        width,
        depth,
        height,
        ..
    } = *dims;
    let leg = [6.0, height, depth * 0.7];
    vec![
        Primitive::cuboid([-width / 2.0 + 10.0, height / 2.0, 0.0], leg),
        Primitive::cuboid([width / 2.0 - 10.0, height / 2.0, 0.0], leg),
        Primitive::cuboid([0.0, height - 2.5, 0.0], [width - 20.0, 5.0, 5.0]),
    ]
}

/// Accessory mock embedded in the top, hanging down from the top surface.
/// Unknown ids have no stand-in.
pub fn accessory(id: &str, dims: &DeskDimensions) -> Vec<Primitive> {
    let DeskDimensions {
        width,
        depth,
        top_thickness: t,
        ..
    } = *dims;
    let h = t * 1.1;
    match id {
        "grommet" => vec![
            Primitive::cylinder([-width / 2.0 + 20.0, -t / 2.0, -depth / 2.0 + 10.0], 3.0, h),
            Primitive::cylinder([width / 2.0 - 20.0, -t / 2.0, -depth / 2.0 + 10.0], 3.0, h),
        ],
        "mediaport" => vec![Primitive::cuboid([0.0, -t / 2.0, -depth / 2.0 + 10.0], [16.0, h, 6.0])],
        "wireless_charger" => vec![Primitive::cylinder(
            [width / 2.0 - 20.0, -t / 2.0, depth / 2.0 - 20.0],
            4.0,
            h,
        )],
        _ => Vec::new(),
    }
}

/// Add-on mock hanging under the top. Unknown ids have no stand-in.
pub fn addon(id: &str, dims: &DeskDimensions) -> Vec<Primitive> {
    let DeskDimensions { width, depth, .. } = *dims;
    match id {
        "drawer" => vec![Primitive::cuboid([width / 3.0, -5.0, 0.0], [30.0, 8.0, 40.0])],
        "cable_tray" => vec![Primitive::cuboid([0.0, -5.0, -depth / 3.0], [width * 0.6, 5.0, 10.0])],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::resolve;
    use shared::DeskConfig;

    #[test]
    fn test_top_rests_on_origin() {
        let prims = top(&resolve(&DeskConfig::default()));
        let aabb = prims[0].aabb();
        assert_eq!(aabb.min.y, 0.0);
        assert_eq!(aabb.max.y, 2.5);
        assert_eq!(aabb.size().x, 140.0);
    }

    #[test]
    fn test_frame_legs_reach_floor_and_top() {
        let dims = resolve(&DeskConfig::default());
        let prims = frame(&dims);
        assert_eq!(prims.len(), 3);
        let leg = prims[0].aabb();
        assert_eq!(leg.min.y, 0.0);
        assert_eq!(leg.max.y, 75.0);
        assert_eq!(prims[0].center().x, -60.0);
        assert_eq!(prims[1].center().x, 60.0);
    }

    #[test]
    fn test_grommet_embedded_in_top() {
        let dims = resolve(&DeskConfig::default());
        let prims = accessory("grommet", &dims);
        assert_eq!(prims.len(), 2);
        assert_eq!(prims[0].center().y, -1.25);
    }

    #[test]
    fn test_unknown_ids_have_no_mock() {
        let dims = resolve(&DeskConfig::default());
        assert!(accessory("laser", &dims).is_empty());
        assert!(addon("hammock", &dims).is_empty());
    }
}
