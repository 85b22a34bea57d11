//! Physical desk dimensions derived from the size selection

use shared::{DeskConfig, DeskSize};

/// Frame height of this product line (cm)
pub const FRAME_HEIGHT: f64 = 75.0;
/// Desk top thickness of this product line (cm)
pub const TOP_THICKNESS: f64 = 2.5;

/// Nominal desk dimensions in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeskDimensions {
    pub width: f64,
    pub depth: f64,
    /// Frame height, i.e. the underside of the top
    pub height: f64,
    pub top_thickness: f64,
}

impl DeskDimensions {
    /// Height of the visible top surface
    pub fn top_surface(&self) -> f64 {
        self.height + self.top_thickness
    }
}

/// Resolve width/depth/height/thickness for a configuration.
///
/// Nominal sizes carry their footprint in the id; the custom size reads the
/// clamped custom fields. Overrides never influence the result.
pub fn resolve(config: &DeskConfig) -> DeskDimensions {
    let (width, depth) = match config.size {
        DeskSize::Nominal { width, depth } => (f64::from(width), f64::from(depth)),
        DeskSize::Custom => (config.clamped_custom_width(), config.clamped_custom_depth()),
    };
    DeskDimensions {
        width,
        depth,
        height: FRAME_HEIGHT,
        top_thickness: TOP_THICKNESS,
    }
}
