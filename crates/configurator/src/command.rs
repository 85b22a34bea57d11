//! JSON command protocol for scripted control of a headless configurator.

use serde::{Deserialize, Serialize};
use serde_json::json;

use shared::{ConfigurationPayload, DeskSize, Position};

use crate::harness::ConfiguratorHarness;
use crate::overrides::OverridePatch;

/// A command accepted by [`execute_json`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ConfiguratorCommand {
    /// Select a size by id (`"140x70"`, `"custom"`, ...)
    SetSize {
        size: String,
    },
    /// Set custom width/depth (clamped)
    SetCustomSize {
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        depth: Option<f64>,
    },
    ToggleAccessory {
        id: String,
    },
    ToggleAddon {
        id: String,
    },
    /// Merge fields into a part's override, creating it if absent
    SetOverride {
        id: String,
        #[serde(flatten)]
        patch: OverridePatch,
    },
    RemoveOverride {
        id: String,
    },
    SetEditMode {
        enabled: bool,
    },
    /// Select a part by selection id
    SelectPart {
        id: String,
    },
    Deselect,
    /// Commit the selected part at an absolute position
    CommitDrag {
        position: Position,
    },
    /// List every placed part
    Inspect,
    Price,
    ExportConfig,
    ImportConfig {
        payload: ConfigurationPayload,
    },
    /// Reset the configuration; overrides are kept
    Reset,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut ConfiguratorHarness, cmd: ConfiguratorCommand) -> CommandResponse {
    match cmd {
        ConfiguratorCommand::SetSize { size } => match size.parse::<DeskSize>() {
            Ok(size) => {
                harness.select_size(size);
                CommandResponse::ok_with_data(json!({ "dimensions": dimensions_json(harness) }))
            }
            Err(e) => CommandResponse::err(e.to_string()),
        },

        ConfiguratorCommand::SetCustomSize { width, depth } => {
            if !harness.session.config.size.is_custom() {
                return CommandResponse::err("custom dimensions need the custom size selected");
            }
            if let Some(w) = width {
                harness.session.set_custom_width(w);
            }
            if let Some(d) = depth {
                harness.session.set_custom_depth(d);
            }
            let config = &harness.session.config;
            CommandResponse::ok_with_data(json!({
                "custom_width": config.custom_width,
                "custom_depth": config.custom_depth,
            }))
        }

        ConfiguratorCommand::ToggleAccessory { id } => {
            let selected = harness.session.toggle_accessory(&id);
            harness.sync_selection();
            CommandResponse::ok_with_data(json!({ "id": id, "selected": selected }))
        }

        ConfiguratorCommand::ToggleAddon { id } => {
            let selected = harness.session.toggle_addon(&id);
            harness.sync_selection();
            CommandResponse::ok_with_data(json!({ "id": id, "selected": selected }))
        }

        ConfiguratorCommand::SetOverride { id, patch } => {
            let record = harness.session.set_override(&id, patch).clone();
            CommandResponse::ok_with_data(json!({ "id": id, "override": record }))
        }

        ConfiguratorCommand::RemoveOverride { id } => {
            let removed = harness.session.remove_override(&id).is_some();
            CommandResponse::ok_with_data(json!({ "id": id, "removed": removed }))
        }

        ConfiguratorCommand::SetEditMode { enabled } => {
            harness.set_edit_mode(enabled);
            CommandResponse::ok_with_data(json!({
                "edit_mode": enabled,
                "orbit_enabled": harness.placement.orbit_enabled(),
            }))
        }

        ConfiguratorCommand::SelectPart { id } => {
            if !harness.placement.edit_mode() {
                return CommandResponse::err("Edit mode is off");
            }
            if harness.click(&id) {
                CommandResponse::ok_with_data(json!({ "selected": id }))
            } else {
                CommandResponse::err(format!("Part '{id}' is not selectable"))
            }
        }

        ConfiguratorCommand::Deselect => {
            harness.placement.deselect();
            CommandResponse::ok()
        }

        ConfiguratorCommand::CommitDrag { position } => {
            let Some(part) = harness.placement.selected().cloned() else {
                return CommandResponse::err("No part selected");
            };
            match harness.drag_selected_to(glam::DVec3::from_array(position)) {
                Some(commit) => CommandResponse::ok_with_data(json!({
                    "part": part.selection_id(),
                    "offset": commit.offset,
                    "position": harness.position_of(&part.selection_id()).map(|p| p.to_array()),
                })),
                None => CommandResponse::err(format!("Part '{part}' cannot be moved")),
            }
        }

        ConfiguratorCommand::Inspect => {
            let layout = harness.layout();
            let parts: Vec<serde_json::Value> = layout
                .parts
                .iter()
                .map(|p| {
                    json!({
                        "id": p.part.selection_id(),
                        "label": p.label,
                        "source": p.source.kind_name(),
                        "anchor": p.anchor.to_array(),
                        "offset": p.offset.to_array(),
                        "position": p.position.to_array(),
                        "selectable": p.is_selectable(),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(json!({
                "dimensions": dimensions_json(harness),
                "part_count": parts.len(),
                "parts": parts,
                "selected": harness.placement.selected().map(|p| p.selection_id()),
                "edit_mode": harness.placement.edit_mode(),
            }))
        }

        ConfiguratorCommand::Price => CommandResponse::ok_with_data(json!({
            "total": harness.price(),
            "size": harness.catalog.size_price(&harness.session.config),
        })),

        ConfiguratorCommand::ExportConfig => {
            CommandResponse::ok_with_data(json!({ "payload": harness.session.payload() }))
        }

        ConfiguratorCommand::ImportConfig { payload } => {
            harness.placement.deselect();
            harness.session.apply_payload(payload);
            CommandResponse::ok()
        }

        ConfiguratorCommand::Reset => {
            harness.placement.deselect();
            harness.session.reset();
            CommandResponse::ok()
        }
    }
}

fn dimensions_json(harness: &ConfiguratorHarness) -> serde_json::Value {
    let d = harness.dimensions();
    json!({
        "width": d.width,
        "depth": d.depth,
        "height": d.height,
        "top_thickness": d.top_thickness,
    })
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut ConfiguratorHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: ConfiguratorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut ConfiguratorHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<ConfiguratorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
