//! Integration tests for the configurator JSON command protocol.
//!
//! JSON string -> parse -> execute on the harness -> response.

use desk_configurator_lib::command::{execute_json, execute_json_batch};
use desk_configurator_lib::harness::ConfiguratorHarness;

#[test]
fn test_command_set_size() {
    let mut h = ConfiguratorHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "set_size", "size": "160x80"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["dimensions"]["width"], 160.0);
    assert_eq!(data["dimensions"]["height"], 75.0);
}

#[test]
fn test_command_set_size_rejects_unknown_id() {
    let mut h = ConfiguratorHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "set_size", "size": "huge"}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.error.is_some());
}

#[test]
fn test_command_custom_size_price() {
    let mut h = ConfiguratorHarness::new();
    let json = r#"[
        {"command": "set_size", "size": "custom"},
        {"command": "set_custom_size", "width": 180, "depth": 90},
        {"command": "price"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses.iter().all(|r| r.success));
    let price = responses[2].data.as_ref().unwrap();
    assert_eq!(price["size"], 1460);
}

#[test]
fn test_command_custom_size_clamped() {
    let mut h = ConfiguratorHarness::new();
    execute_json(&mut h, r#"{"command": "set_size", "size": "custom"}"#).unwrap();
    let resp = execute_json(&mut h, r#"{"command": "set_custom_size", "width": 999}"#).unwrap();
    assert_eq!(resp.data.unwrap()["custom_width"], 200.0);
}

#[test]
fn test_command_toggle_accessory() {
    let mut h = ConfiguratorHarness::new();
    let on = execute_json(&mut h, r#"{"command": "toggle_accessory", "id": "grommet"}"#).unwrap();
    assert_eq!(on.data.unwrap()["selected"], true);
    let off = execute_json(&mut h, r#"{"command": "toggle_accessory", "id": "grommet"}"#).unwrap();
    assert_eq!(off.data.unwrap()["selected"], false);
    assert!(h.session.config.accessories.is_empty());
}

#[test]
fn test_command_inspect() {
    let mut h = ConfiguratorHarness::new();
    execute_json(&mut h, r#"{"command": "toggle_addon", "id": "drawer"}"#).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["part_count"], 3);
    let parts = data["parts"].as_array().unwrap();
    let drawer = parts.iter().find(|p| p["id"] == "drawer").unwrap();
    assert_eq!(drawer["source"], "standard");
    assert_eq!(drawer["anchor"][1], 75.0);
    assert_eq!(data["edit_mode"], false);
}

#[test]
fn test_command_set_override_uses_model() {
    let mut h = ConfiguratorHarness::new();
    let resp = execute_json(
        &mut h,
        r#"{"command": "set_override", "id": "electric", "url": "https://cdn/e.stl", "fileName": "e.stl"}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["override"]["fileName"], "e.stl");

    let data = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap().data.unwrap();
    let frame = data["parts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == "electric")
        .cloned()
        .unwrap();
    assert_eq!(frame["source"], "admin_override");
}

#[test]
fn test_command_remove_override_twice() {
    let mut h = ConfiguratorHarness::new();
    execute_json(&mut h, r#"{"command": "set_override", "id": "electric", "scale": 2.0}"#).unwrap();
    let first = execute_json(&mut h, r#"{"command": "remove_override", "id": "electric"}"#).unwrap();
    assert_eq!(first.data.unwrap()["removed"], true);
    let second = execute_json(&mut h, r#"{"command": "remove_override", "id": "electric"}"#).unwrap();
    assert!(second.success);
    assert_eq!(second.data.unwrap()["removed"], false);
}

#[test]
fn test_command_select_requires_edit_mode() {
    let mut h = ConfiguratorHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "select_part", "id": "140x70"}"#).unwrap();
    assert!(!resp.success);

    let resp = execute_json(&mut h, r#"{"command": "set_edit_mode", "enabled": true}"#).unwrap();
    assert_eq!(resp.data.unwrap()["orbit_enabled"], false);
    let resp = execute_json(&mut h, r#"{"command": "select_part", "id": "140x70"}"#).unwrap();
    assert!(resp.success);
}

#[test]
fn test_command_commit_drag_workflow() {
    let mut h = ConfiguratorHarness::new();
    let json = r#"[
        {"command": "set_edit_mode", "enabled": true},
        {"command": "select_part", "id": "140x70"},
        {"command": "commit_drag", "position": [0.0, 80.0, 0.0]}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses.iter().all(|r| r.success));
    let commit = responses[2].data.as_ref().unwrap();
    assert_eq!(commit["offset"][1], 5.0);
    assert_eq!(commit["position"][1], 80.0);
}

#[test]
fn test_command_commit_without_selection() {
    let mut h = ConfiguratorHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "commit_drag", "position": [0, 0, 0]}"#).unwrap();
    assert!(!resp.success);
}

#[test]
fn test_command_export_import() {
    let mut h = ConfiguratorHarness::new();
    execute_json(&mut h, r#"{"command": "set_size", "size": "120x60"}"#).unwrap();
    execute_json(&mut h, r#"{"command": "set_override", "id": "120x60", "position": [0, 2, 0]}"#).unwrap();
    let payload = execute_json(&mut h, r#"{"command": "export_config"}"#)
        .unwrap()
        .data
        .unwrap()["payload"]
        .clone();

    let mut other = ConfiguratorHarness::new();
    let cmd = serde_json::json!({ "command": "import_config", "payload": payload }).to_string();
    assert!(execute_json(&mut other, &cmd).unwrap().success);
    assert_eq!(other.session.config.size.id(), "120x60");
    assert_eq!(other.position_of("120x60").unwrap().y, 77.0);
}

#[test]
fn test_command_reset_keeps_overrides() {
    let mut h = ConfiguratorHarness::new();
    execute_json(&mut h, r#"{"command": "toggle_accessory", "id": "grommet"}"#).unwrap();
    execute_json(&mut h, r#"{"command": "set_override", "id": "grommet", "scale": 1.5}"#).unwrap();
    assert!(execute_json(&mut h, r#"{"command": "reset"}"#).unwrap().success);
    assert!(h.session.config.accessories.is_empty());
    assert!(h.session.overrides.contains("grommet"));
}

#[test]
fn test_command_invalid_json() {
    let mut h = ConfiguratorHarness::new();
    assert!(execute_json(&mut h, r#"{"command": "fly"}"#).is_err());
    assert!(execute_json_batch(&mut h, "not json").is_err());
}
