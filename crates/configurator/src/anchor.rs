//! Anchor rules: where each part category's base sits in world space.
//!
//! A part's world position is always `anchor + offset`. Stored offsets are
//! relative to the anchor, so switching frame or size re-derives every
//! dependent part without rewriting what was persisted.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use shared::{DeskConfig, PartId, Position};

use crate::dimensions::{self, DeskDimensions};
use crate::overrides::OverrideRegistry;

/// Selection id of the user-uploaded top
pub const USER_TOP_ID: &str = "user-desk";
/// Selection id of the user-uploaded frame
pub const USER_FRAME_ID: &str = "user-frame";
const ELEMENT_PREFIX: &str = "element:";

/// Row spacing of free decorative elements (cm)
pub const ELEMENT_SPACING: f64 = 30.0;

/// Identity of one visual part of the scene
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PartRef {
    /// Catalog top; keyed by the size id
    Top(PartId),
    /// Catalog frame; keyed by the frame type id
    Frame(PartId),
    Accessory(PartId),
    Addon(PartId),
    /// User-uploaded top
    UserTop,
    /// User-uploaded frame
    UserFrame,
    /// Free decorative element, by element id
    Element(String),
}

impl PartRef {
    /// Override registry key for catalog parts
    pub fn registry_key(&self) -> Option<&str> {
        match self {
            PartRef::Top(id) | PartRef::Frame(id) | PartRef::Accessory(id) | PartRef::Addon(id) => {
                Some(id)
            }
            PartRef::UserTop | PartRef::UserFrame | PartRef::Element(_) => None,
        }
    }

    /// Decorative elements float free and cannot be picked
    pub fn is_selectable(&self) -> bool {
        !matches!(self, PartRef::Element(_))
    }

    /// String id used by the command protocol and the UI
    pub fn selection_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartRef::Top(id) | PartRef::Frame(id) | PartRef::Accessory(id) | PartRef::Addon(id) => {
                f.write_str(id)
            }
            PartRef::UserTop => f.write_str(USER_TOP_ID),
            PartRef::UserFrame => f.write_str(USER_FRAME_ID),
            PartRef::Element(id) => write!(f, "{ELEMENT_PREFIX}{id}"),
        }
    }
}

/// Base position of a part's category for the current state.
///
/// | part | anchor |
/// |---|---|
/// | catalog top | frame height, or 0 when an admin override model is active |
/// | user top | frame height when resting on the frame, else 0 |
/// | frames | floor |
/// | accessories | top surface (frame height + thickness) |
/// | add-ons | underside of the top (frame height) |
/// | decorative element `i` | `(30(i+1), 0, 30)` |
pub fn anchor(part: &PartRef, config: &DeskConfig, overrides: &OverrideRegistry) -> DVec3 {
    anchor_with(part, config, overrides, &dimensions::resolve(config))
}

/// [`anchor`] with already resolved dimensions
pub fn anchor_with(
    part: &PartRef,
    config: &DeskConfig,
    overrides: &OverrideRegistry,
    dims: &DeskDimensions,
) -> DVec3 {
    match part {
        PartRef::Top(id) => {
            // admin models are trusted to encode their own base-to-top height
            if overrides.active(id).is_some() {
                DVec3::ZERO
            } else {
                DVec3::new(0.0, dims.height, 0.0)
            }
        }
        PartRef::UserTop => {
            let y = if config.custom_desk_on_frame { dims.height } else { 0.0 };
            DVec3::new(0.0, y, 0.0)
        }
        PartRef::Frame(_) | PartRef::UserFrame => DVec3::ZERO,
        PartRef::Accessory(_) => DVec3::new(0.0, dims.top_surface(), 0.0),
        PartRef::Addon(_) => DVec3::new(0.0, dims.height, 0.0),
        PartRef::Element(id) => {
            let index = config
                .custom_elements
                .iter()
                .position(|e| e.id == *id)
                .unwrap_or(0);
            element_base(index)
        }
    }
}

/// Fixed row slot of the `index`-th decorative element
pub fn element_base(index: usize) -> DVec3 {
    DVec3::new(ELEMENT_SPACING * (index as f64 + 1.0), 0.0, ELEMENT_SPACING)
}

/// Stored offset of a part relative to its anchor
pub fn offset(part: &PartRef, config: &DeskConfig, overrides: &OverrideRegistry) -> DVec3 {
    match part {
        PartRef::UserTop => DVec3::from_array(config.custom_desk_position),
        PartRef::UserFrame => DVec3::from_array(config.custom_frame_position),
        PartRef::Element(_) => DVec3::ZERO,
        catalog => catalog
            .registry_key()
            .map(|id| DVec3::from_array(overrides.position(id)))
            .unwrap_or(DVec3::ZERO),
    }
}

/// Absolute world position: anchor plus stored offset
pub fn world_position(part: &PartRef, config: &DeskConfig, overrides: &OverrideRegistry) -> DVec3 {
    anchor(part, config, overrides) + offset(part, config, overrides)
}

/// Inverse of [`world_position`]: offset to store for an observed absolute
/// position, rounded to whole centimeters.
pub fn offset_for(
    part: &PartRef,
    absolute: DVec3,
    config: &DeskConfig,
    overrides: &OverrideRegistry,
) -> Position {
    let relative = absolute - anchor(part, config, overrides);
    relative.round().to_array()
}
