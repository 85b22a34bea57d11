//! Shared data model for the desk configurator.
//!
//! Everything in here is plain serde data: it is what gets persisted to the
//! configuration service, written to the local autosave file and exchanged
//! through the JSON command protocol. Field names follow the camelCase keys
//! of the stored payloads.

pub mod catalog;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a catalog option (size id, frame type id, accessory id, add-on id)
pub type PartId = String;

/// Position / offset vector `[x, y, z]` in centimeters
pub type Position = [f64; 3];

/// Allowed custom width range (cm)
pub const CUSTOM_WIDTH_RANGE: (f64, f64) = (100.0, 200.0);
/// Allowed custom depth range (cm)
pub const CUSTOM_DEPTH_RANGE: (f64, f64) = (50.0, 100.0);

/// One of the three world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into a `[x, y, z]` array
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

// ============================================================================
// Nominal size selector
// ============================================================================

/// Error for a size id that is neither `"custom"` nor `"<W>x<D>"`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed desk size id '{0}'")]
pub struct SizeParseError(pub String);

/// Nominal desk size: a catalog footprint encoded as `"WxD"`, or custom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeskSize {
    Nominal { width: u32, depth: u32 },
    Custom,
}

impl DeskSize {
    pub const CUSTOM_ID: &'static str = "custom";

    pub fn nominal(width: u32, depth: u32) -> Self {
        DeskSize::Nominal { width, depth }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, DeskSize::Custom)
    }

    /// Catalog / registry id of this size
    pub fn id(&self) -> PartId {
        self.to_string()
    }
}

impl Default for DeskSize {
    fn default() -> Self {
        DeskSize::Nominal {
            width: 140,
            depth: 70,
        }
    }
}

impl fmt::Display for DeskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeskSize::Nominal { width, depth } => write!(f, "{width}x{depth}"),
            DeskSize::Custom => f.write_str(Self::CUSTOM_ID),
        }
    }
}

impl FromStr for DeskSize {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::CUSTOM_ID {
            return Ok(DeskSize::Custom);
        }
        let (w, d) = s.split_once('x').ok_or_else(|| SizeParseError(s.to_string()))?;
        let width = w.trim().parse().map_err(|_| SizeParseError(s.to_string()))?;
        let depth = d.trim().parse().map_err(|_| SizeParseError(s.to_string()))?;
        Ok(DeskSize::Nominal { width, depth })
    }
}

impl TryFrom<String> for DeskSize {
    type Error = SizeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeskSize> for String {
    fn from(value: DeskSize) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Free-floating decorative prop uploaded by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomElement {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// The configuration root: everything the user picked for their desk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeskConfig {
    pub size: DeskSize,
    /// Only meaningful when `size` is [`DeskSize::Custom`]
    pub custom_width: f64,
    /// Only meaningful when `size` is [`DeskSize::Custom`]
    pub custom_depth: f64,
    pub top_color: PartId,
    pub frame_type: PartId,
    pub frame_color: PartId,
    /// Selected accessory ids, in selection order, no duplicates
    pub accessories: Vec<PartId>,
    /// Selected add-on ids, in selection order, no duplicates
    pub addons: Vec<PartId>,

    // ── User-uploaded desk top ──
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_desk_model_url: Option<String>,
    pub custom_desk_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_texture_url: Option<String>,
    /// Offset relative to the top anchor
    pub custom_desk_position: Position,
    /// Lift the uploaded top onto the frame
    pub custom_desk_on_frame: bool,

    // ── User-uploaded frame ──
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_frame_url: Option<String>,
    pub custom_frame_scale: f64,
    /// Offset relative to the floor
    pub custom_frame_position: Position,

    pub custom_elements: Vec<CustomElement>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            size: DeskSize::default(),
            custom_width: 140.0,
            custom_depth: 70.0,
            top_color: "oak".to_string(),
            frame_type: "electric".to_string(),
            frame_color: "black".to_string(),
            accessories: Vec::new(),
            addons: Vec::new(),
            custom_desk_model_url: None,
            custom_desk_scale: 1.0,
            custom_texture_url: None,
            custom_desk_position: [0.0; 3],
            custom_desk_on_frame: false,
            custom_frame_url: None,
            custom_frame_scale: 1.0,
            custom_frame_position: [0.0; 3],
            custom_elements: Vec::new(),
        }
    }
}

impl DeskConfig {
    /// Custom width clamped to the allowed range
    pub fn clamped_custom_width(&self) -> f64 {
        clamp_or_min(self.custom_width, CUSTOM_WIDTH_RANGE)
    }

    /// Custom depth clamped to the allowed range
    pub fn clamped_custom_depth(&self) -> f64 {
        clamp_or_min(self.custom_depth, CUSTOM_DEPTH_RANGE)
    }

    /// Active user-uploaded top model, if any
    pub fn custom_desk_url(&self) -> Option<&str> {
        non_empty(self.custom_desk_model_url.as_deref())
    }

    /// Active user-uploaded frame model, if any
    pub fn custom_frame_model_url(&self) -> Option<&str> {
        non_empty(self.custom_frame_url.as_deref())
    }
}

fn clamp_or_min(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// ============================================================================
// Overrides
// ============================================================================

fn default_scale() -> f64 {
    1.0
}

/// A 3D asset (plus transform/texture) replacing a part's procedural geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOverride {
    /// Asset reference; a record without one is treated as absent
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub url: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Offset relative to the part's category anchor
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_url: Option<String>,
}

impl ModelOverride {
    /// Fresh record with default transform and the given display name
    pub fn named(file_name: impl Into<String>) -> Self {
        Self {
            url: None,
            scale: 1.0,
            position: [0.0; 3],
            file_name: file_name.into(),
            texture_url: None,
        }
    }

    /// Asset reference when the override is active
    pub fn asset_url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }

    pub fn is_active(&self) -> bool {
        self.asset_url().is_some()
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Serialized form of the override registry: part id → override record
pub type CatalogOverrides = BTreeMap<PartId, ModelOverride>;

// ============================================================================
// Persistence payloads
// ============================================================================

/// What gets stored for a named configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigurationPayload {
    #[serde(default)]
    pub config: DeskConfig,
    #[serde(default)]
    pub overrides: CatalogOverrides,
}

/// A persisted configuration record as returned by the configuration service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConfiguration {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    /// Missing when the stored record predates payloads
    #[serde(default)]
    pub data: Option<ConfigurationPayload>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
