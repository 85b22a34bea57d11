//! Property tests for placement, measurement and the override registry.

use glam::DVec3;
use proptest::prelude::*;

use desk_configurator_lib::fixtures;
use desk_configurator_lib::harness::ConfiguratorHarness;
use desk_configurator_lib::measure::measure;
use desk_configurator_lib::overrides::{OverridePatch, OverrideRegistry};
use shared::{ConfigurationPayload, DeskConfig, DeskSize, ModelOverride};

/// Every selectable category in one scene: catalog top/frame plus an
/// accessory and an add-on, optionally with an admin model on the top.
fn catalog_scene(admin_top: bool) -> ConfigurationPayload {
    let overrides = if admin_top {
        vec![("140x70", fixtures::model_override("https://cdn/top.stl"))]
    } else {
        vec![]
    };
    fixtures::payload(fixtures::equipped_config(&["grommet"], &["drawer"]), overrides)
}

fn upload_scene(on_frame: bool) -> ConfigurationPayload {
    let config = DeskConfig {
        custom_frame_url: Some("mem://frame.stl".into()),
        ..fixtures::user_top_config("mem://top.stl", 1.0, on_frame)
    };
    fixtures::payload(config, vec![])
}

fn scene_and_part() -> impl Strategy<Value = (ConfigurationPayload, &'static str)> {
    prop_oneof![
        any::<bool>().prop_map(|admin| (catalog_scene(admin), "140x70")),
        Just((catalog_scene(false), "electric")),
        Just((catalog_scene(false), "grommet")),
        Just((catalog_scene(false), "drawer")),
        any::<bool>().prop_map(|on| (upload_scene(on), "user-desk")),
        Just((upload_scene(false), "user-frame")),
    ]
}

/// No record, an active model record, or an inactive position-only stub
fn registry_entry() -> impl Strategy<Value = Option<ModelOverride>> {
    prop_oneof![
        Just(None),
        (0.1f64..5.0, -50.0f64..50.0).prop_map(|(scale, y)| {
            Some(fixtures::placed_override("https://cdn/part.stl", scale, [0.0, y, 0.0]))
        }),
        (-50.0f64..50.0).prop_map(|x| Some(fixtures::position_stub([x, 3.0, 0.0]))),
    ]
}

fn coordinate() -> impl Strategy<Value = f64> {
    -150.0f64..150.0
}

proptest! {
    #[test]
    fn prop_commit_reproduces_dragged_position(
        (payload, part) in scene_and_part(),
        x in coordinate(),
        y in coordinate(),
        z in coordinate(),
    ) {
        let mut h = ConfiguratorHarness::with_payload(payload);
        h.set_edit_mode(true);
        let target = DVec3::new(x, y, z);

        let commit = h.drag(part, target);
        prop_assert!(commit.is_some());

        let placed = h.part(part).unwrap();
        prop_assert_eq!(placed.position, placed.anchor + placed.offset);
        for axis in 0..3 {
            prop_assert!((placed.position[axis] - target[axis]).abs() <= 0.5);
        }

        // A reload from the persisted payload lands in the same spot
        let reloaded = ConfiguratorHarness::with_payload(h.session.payload());
        prop_assert_eq!(reloaded.position_of(part), Some(placed.position));
    }

    #[test]
    fn prop_measurement_scales_linearly(scale in 0.01f64..10.0) {
        let m = measure(&fixtures::off_center_slab(), scale);
        prop_assert!((m.width - 100.0 * scale).abs() < 1e-9);
        prop_assert!((m.depth - 60.0 * scale).abs() < 1e-9);
        prop_assert!((m.center_offset[0] - 30.0 * scale).abs() < 1e-9);
        prop_assert!((m.center_offset[1] + 10.0 * scale).abs() < 1e-9);
    }

    #[test]
    fn prop_remove_override_idempotent(
        ids in proptest::collection::vec(prop_oneof![
            Just("140x70"), Just("electric"), Just("grommet"), Just("drawer"),
        ], 1..6),
        target in prop_oneof![Just("140x70"), Just("electric"), Just("missing")],
    ) {
        let mut reg = OverrideRegistry::new();
        for id in &ids {
            reg.set_override(id, OverridePatch::model(format!("https://cdn/{id}.stl"), *id));
        }
        reg.remove_override(target);
        let once = reg.clone();
        prop_assert!(reg.remove_override(target).is_none());
        prop_assert_eq!(reg, once);
    }

    #[test]
    fn prop_dimensions_ignore_overrides(
        width in 100.0f64..200.0,
        depth in 50.0f64..100.0,
    ) {
        let plain = ConfiguratorHarness::with_payload(fixtures::payload(
            fixtures::custom_size_config(width, depth),
            vec![],
        ));
        let overridden = ConfiguratorHarness::with_payload(fixtures::payload(
            fixtures::custom_size_config(width, depth),
            vec![("custom", fixtures::placed_override("https://cdn/top.stl", 3.0, [1.0, 2.0, 3.0]))],
        ));
        prop_assert_eq!(plain.dimensions(), overridden.dimensions());
    }

    #[test]
    fn prop_nominal_dimensions_ignore_registry(
        width in 60u32..300,
        depth in 40u32..150,
        size_entry in registry_entry(),
        frame_entry in registry_entry(),
        accessory_entry in registry_entry(),
    ) {
        let size = DeskSize::nominal(width, depth);
        let size_id = size.id();
        let config = DeskConfig {
            size,
            ..fixtures::equipped_config(&["grommet"], &["drawer"])
        };
        let mut overrides = Vec::new();
        for (id, entry) in [
            (size_id.as_str(), size_entry),
            ("electric", frame_entry),
            ("grommet", accessory_entry),
        ] {
            if let Some(rec) = entry {
                overrides.push((id, rec));
            }
        }
        let h = ConfiguratorHarness::with_payload(fixtures::payload(config, overrides));

        let dims = h.dimensions();
        prop_assert_eq!(dims.width, width as f64);
        prop_assert_eq!(dims.depth, depth as f64);
        prop_assert_eq!(dims.height, 75.0);
        prop_assert_eq!(dims.top_thickness, 2.5);
    }
}
