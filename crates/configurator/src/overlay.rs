//! Dimension overlay geometry.
//!
//! Two measurement guides float just above the top surface: the width guide
//! runs along X in front of the footprint, the depth guide along Z to its
//! right. Everything here is recomputed from its inputs on demand.

use glam::DVec3;

use crate::dimensions::DeskDimensions;
use crate::measure::MeasuredGeometry;

/// Height of the guides above the overlay origin
pub const GUIDE_LIFT: f64 = 5.0;
/// Clearance between the footprint edge and a guide
pub const GUIDE_CLEARANCE: f64 = 35.0;
/// Half-length of the perpendicular end caps
pub const CAP_HALF_LENGTH: f64 = 5.0;
/// Distance from a guide to its label
pub const LABEL_OFFSET: f64 = 15.0;

/// Horizontal footprint the overlay measures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub depth: f64,
    /// Center relative to the overlay origin, `[x, z]`
    pub center_offset: [f64; 2],
}

impl Footprint {
    /// Measured geometry when a custom top is active, nominal size otherwise
    pub fn resolve(dims: &DeskDimensions, measured: Option<MeasuredGeometry>) -> Self {
        match measured {
            Some(m) => Self {
                width: m.width,
                depth: m.depth,
                center_offset: m.center_offset,
            },
            None => Self {
                width: dims.width,
                depth: dims.depth,
                center_offset: [0.0, 0.0],
            },
        }
    }
}

/// A line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: DVec3,
    pub end: DVec3,
}

impl Segment {
    fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }
}

/// One measurement guide with its caps and label
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub line: Segment,
    pub caps: [Segment; 2],
    pub label_position: DVec3,
    pub label: String,
    pub value: f64,
}

/// The complete overlay: width guide then depth guide
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionOverlay {
    pub width: Guide,
    pub depth: Guide,
}

impl DimensionOverlay {
    pub fn build(origin: DVec3, footprint: Footprint) -> Self {
        let Footprint {
            width,
            depth,
            center_offset: [cx, cz],
        } = footprint;
        let center = DVec3::new(origin.x + cx, origin.y + GUIDE_LIFT, origin.z + cz);

        // Width guide: along X, in front of the footprint
        let wz = -depth / 2.0 - GUIDE_CLEARANCE;
        let w_start = center + DVec3::new(-width / 2.0, 0.0, wz);
        let w_end = center + DVec3::new(width / 2.0, 0.0, wz);
        let w_cap = DVec3::new(0.0, 0.0, CAP_HALF_LENGTH);
        let width_guide = Guide {
            line: Segment::new(w_start, w_end),
            caps: [
                Segment::new(w_start - w_cap, w_start + w_cap),
                Segment::new(w_end - w_cap, w_end + w_cap),
            ],
            label_position: center + DVec3::new(0.0, 0.0, wz - LABEL_OFFSET),
            label: format_length(width),
            value: width,
        };

        // Depth guide: along Z, right of the footprint
        let dx = width / 2.0 + GUIDE_CLEARANCE;
        let d_start = center + DVec3::new(dx, 0.0, -depth / 2.0);
        let d_end = center + DVec3::new(dx, 0.0, depth / 2.0);
        let d_cap = DVec3::new(CAP_HALF_LENGTH, 0.0, 0.0);
        let depth_guide = Guide {
            line: Segment::new(d_start, d_end),
            caps: [
                Segment::new(d_start - d_cap, d_start + d_cap),
                Segment::new(d_end - d_cap, d_end + d_cap),
            ],
            label_position: center + DVec3::new(dx + LABEL_OFFSET, 0.0, 0.0),
            label: format_length(depth),
            value: depth,
        };

        Self {
            width: width_guide,
            depth: depth_guide,
        }
    }

    /// Every segment to draw
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        [&self.width, &self.depth]
            .into_iter()
            .flat_map(|g| std::iter::once(g.line).chain(g.caps))
    }
}

/// `"<value> cm"`, one decimal, trailing `.0` dropped
pub fn format_length(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0} cm")
    } else {
        format!("{rounded:.1} cm")
    }
}
